//! Declarative catalog of the backend endpoints.
//!
//! Each endpoint is a path template plus the name of the envelope field that
//! holds its payload. Services pick an endpoint and a result type; nothing
//! else about the wire shape lives in the service code.

use crate::error::{ApiError, Result};

/// Placeholder replaced by the subject id in a path template.
pub const SUBJECT_PLACEHOLDER: &str = "{id}";

/// One backend resource: `GET <base><path>`, payload under `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub path: &'static str,
    /// Envelope field holding the payload. `None` means the whole body is
    /// the payload.
    pub field: Option<&'static str>,
}

impl Endpoint {
    pub const fn new(name: &'static str, path: &'static str, field: Option<&'static str>) -> Self {
        Self { name, path, field }
    }

    /// True when the path template needs a subject id.
    pub fn requires_subject(&self) -> bool {
        self.path.contains(SUBJECT_PLACEHOLDER)
    }

    /// Build the request path, percent-encoding the subject id into it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when a subject is required but
    /// missing or empty, or given to an endpoint that takes none.
    pub fn resolve(&self, subject: Option<&str>) -> Result<String> {
        match (self.requires_subject(), subject) {
            (true, Some(id)) if !id.trim().is_empty() => Ok(self
                .path
                .replace(SUBJECT_PLACEHOLDER, &urlencoding::encode(id))),
            (true, _) => Err(ApiError::invalid_request(format!(
                "{} requires a non-empty subject id",
                self.name
            ))),
            (false, None) => Ok(self.path.to_string()),
            (false, Some(_)) => Err(ApiError::invalid_request(format!(
                "{} does not take a subject id",
                self.name
            ))),
        }
    }
}

pub const LIST_USERS: Endpoint = Endpoint::new("list users", "/api/users", Some("users"));

pub const USER_POSITIONS: Endpoint = Endpoint::new(
    "positions for user",
    "/api/users/{id}/positions",
    Some("positions"),
);

pub const USER_POSITIONS_BY_ACCOUNT: Endpoint = Endpoint::new(
    "positions by account",
    "/api/users/{id}/positions/by_account",
    None,
);

pub const PORTFOLIO_SUMMARY: Endpoint = Endpoint::new(
    "portfolio summary",
    "/api/users/{id}/portfolio/summary",
    Some("portfolio"),
);

pub const ROLLING_RETURNS: Endpoint = Endpoint::new(
    "rolling returns",
    "/api/users/{id}/portfolio/rolling-returns",
    Some("returns"),
);

pub const REALIZED_PNL: Endpoint = Endpoint::new(
    "realized pnl",
    "/api/users/{id}/realized_pnl",
    Some("realized_pnl"),
);

pub const UNREALIZED_PNL: Endpoint = Endpoint::new(
    "unrealized pnl",
    "/api/users/{id}/unrealized_pnl",
    Some("unrealized_pnl"),
);

pub const PORTFOLIO_METRICS: Endpoint = Endpoint::new(
    "portfolio metrics",
    "/api/users/{id}/portfolio/metrics",
    Some("metrics"),
);

pub const PRICES: Endpoint = Endpoint::new("prices", "/api/prices", Some("prices"));

pub const LIST_ACCOUNTS: Endpoint = Endpoint::new("list accounts", "/api/accounts", Some("accounts"));

pub const ACCOUNT_POSITIONS: Endpoint = Endpoint::new(
    "account positions",
    "/api/accounts/{id}/positions",
    None,
);

pub const ALL_POSITIONS: Endpoint = Endpoint::new("all positions", "/api/positions", None);

/// Every endpoint the façade exposes.
pub const CATALOG: &[Endpoint] = &[
    LIST_USERS,
    USER_POSITIONS,
    USER_POSITIONS_BY_ACCOUNT,
    PORTFOLIO_SUMMARY,
    ROLLING_RETURNS,
    REALIZED_PNL,
    UNREALIZED_PNL,
    PORTFOLIO_METRICS,
    PRICES,
    LIST_ACCOUNTS,
    ACCOUNT_POSITIONS,
    ALL_POSITIONS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_table() {
        let expected: &[(&str, Option<&str>, bool)] = &[
            ("/api/users", Some("users"), false),
            ("/api/users/{id}/positions", Some("positions"), true),
            ("/api/users/{id}/positions/by_account", None, true),
            ("/api/users/{id}/portfolio/summary", Some("portfolio"), true),
            ("/api/users/{id}/portfolio/rolling-returns", Some("returns"), true),
            ("/api/users/{id}/realized_pnl", Some("realized_pnl"), true),
            ("/api/users/{id}/unrealized_pnl", Some("unrealized_pnl"), true),
            ("/api/users/{id}/portfolio/metrics", Some("metrics"), true),
            ("/api/prices", Some("prices"), false),
            ("/api/accounts", Some("accounts"), false),
            ("/api/accounts/{id}/positions", None, true),
            ("/api/positions", None, false),
        ];

        assert_eq!(CATALOG.len(), expected.len());
        for (endpoint, (path, field, needs_subject)) in CATALOG.iter().zip(expected) {
            assert_eq!(endpoint.path, *path);
            assert_eq!(endpoint.field, *field, "{}", endpoint.name);
            assert_eq!(endpoint.requires_subject(), *needs_subject, "{}", endpoint.name);
        }
    }

    #[test]
    fn catalog_names_and_paths_are_unique() {
        let names: HashSet<_> = CATALOG.iter().map(|e| e.name).collect();
        let paths: HashSet<_> = CATALOG.iter().map(|e| e.path).collect();
        assert_eq!(names.len(), CATALOG.len());
        assert_eq!(paths.len(), CATALOG.len());
    }

    #[test]
    fn resolves_subject_into_path() {
        assert_eq!(
            USER_POSITIONS.resolve(Some("42")).unwrap(),
            "/api/users/42/positions"
        );
        assert_eq!(PRICES.resolve(None).unwrap(), "/api/prices");
    }

    #[test]
    fn subject_mismatches_are_rejected() {
        for bad in [None, Some(""), Some("  ")] {
            assert!(matches!(
                PORTFOLIO_SUMMARY.resolve(bad),
                Err(ApiError::InvalidRequest(_))
            ));
        }
        assert!(matches!(
            LIST_USERS.resolve(Some("42")),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn subject_is_percent_encoded() {
        assert_eq!(
            REALIZED_PNL.resolve(Some("a/b c")).unwrap(),
            "/api/users/a%2Fb%20c/realized_pnl"
        );
    }

    proptest! {
        #[test]
        fn resolved_paths_keep_the_template_shape(id in "[A-Za-z0-9 /?#%-]{1,24}") {
            prop_assume!(!id.trim().is_empty());
            for endpoint in CATALOG.iter().filter(|e| e.requires_subject()) {
                let path = endpoint.resolve(Some(&id)).unwrap();
                let template_segments = endpoint.path.split('/').count();
                prop_assert_eq!(path.split('/').count(), template_segments);
                prop_assert!(!path.contains(SUBJECT_PLACEHOLDER));
                prop_assert!(!path.contains('?') && !path.contains('#') && !path.contains(' '));
            }
        }
    }
}
