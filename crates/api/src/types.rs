//! Backend resource types.
//!
//! These are plain value records. The access layer only transports them; it
//! never reorders, deduplicates or fills them in.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Users & Positions
// ─────────────────────────────────────────────────────────────────────────────

/// A backend user. `token` is only present for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Aggregated holding of one symbol across all of a user's accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSummary {
    pub symbol: String,
    pub quantity: f64,
    pub total_cost: f64,
}

/// Positions grouped by account id.
///
/// Returned as the whole response body, not unwrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionsByAccount {
    pub positions_by_account: BTreeMap<String, Vec<PositionSummary>>,
}

/// A brokerage account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    #[serde(default)]
    pub account_number: Option<String>,
}

/// A raw position row as stored for an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountPosition {
    pub position_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub symbol: String,
    pub quantity: f64,
    #[serde(default)]
    pub avg_cost: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Time Series
// ─────────────────────────────────────────────────────────────────────────────

/// Total portfolio value on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioPoint {
    pub as_of_date: NaiveDate,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedPnlPoint {
    pub date: NaiveDate,
    pub pnl: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnrealizedPnlPoint {
    pub date: NaiveDate,
    pub pnl: Decimal,
}

/// Return over a trailing window ending on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingReturnPoint {
    pub date: NaiveDate,
    #[serde(alias = "window")]
    pub window_days: u32,
    /// `None` while the window is not yet filled.
    #[serde(default, alias = "return_value", alias = "rolling_return")]
    pub value: Option<Decimal>,
}

/// Daily analytics snapshot computed by the backend for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPortfolioMetric {
    pub snapshot_date: NaiveDate,
    #[serde(default)]
    pub portfolio_value: Option<Decimal>,
    #[serde(default)]
    pub cash_balance: Option<Decimal>,
    #[serde(default, alias = "portfolio_daily_return")]
    pub daily_return: Option<Decimal>,
    #[serde(default)]
    pub twr_to_date: Option<Decimal>,
    #[serde(default)]
    pub rolling_return_7d: Option<Decimal>,
    #[serde(default)]
    pub rolling_return_30d: Option<Decimal>,
    #[serde(default)]
    pub sharpe_to_date: Option<Decimal>,
    #[serde(default)]
    pub drawdown_to_date: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark_daily_return: Option<Decimal>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Market Data
// ─────────────────────────────────────────────────────────────────────────────

/// Latest known price of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub symbol: String,
    pub price_date: NaiveDate,
    pub price: Decimal,
}
