use std::fmt;
use std::sync::Arc;

use log::warn;
use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::credentials::CredentialStore;

/// Hook run on every outgoing request before it is dispatched.
///
/// Interceptors enrich a request; they cannot fail it.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut reqwest::Request);
}

/// Attaches `Authorization: Bearer <token>` when the store has a token.
///
/// The token is read on every request, so signing in or out takes effect on
/// the next call without rebuilding the client.
pub struct BearerAuthInterceptor {
    store: Arc<dyn CredentialStore>,
}

impl BearerAuthInterceptor {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }
}

impl fmt::Debug for BearerAuthInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuthInterceptor").finish_non_exhaustive()
    }
}

impl RequestInterceptor for BearerAuthInterceptor {
    fn intercept(&self, request: &mut reqwest::Request) {
        let token = match self.store.current_token() {
            Ok(Some(token)) => token,
            Ok(None) => return,
            Err(e) => {
                warn!(
                    "[ApiClient] Credential store unavailable, sending {} anonymously: {}",
                    request.url().path(),
                    e
                );
                return;
            }
        };

        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(_) => warn!(
                "[ApiClient] Stored token is not a valid header value, sending {} anonymously",
                request.url().path()
            ),
        }
    }
}
