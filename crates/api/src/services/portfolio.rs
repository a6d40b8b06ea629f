use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ClientProvider;
use crate::endpoints;
use crate::error::Result;
use crate::types::{PortfolioPoint, RollingReturnPoint, UserPortfolioMetric};

/// Portfolio valuation series and analytics of a user.
///
/// Series are returned in the order the backend sends them.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    /// Daily total portfolio value.
    async fn get_portfolio_summaries(&self, user_id: &str) -> Result<Vec<PortfolioPoint>>;

    /// Trailing-window returns.
    async fn get_rolling_returns(&self, user_id: &str) -> Result<Vec<RollingReturnPoint>>;

    /// Daily analytics snapshots (TWR, Sharpe, drawdown, ...).
    async fn get_portfolio_metrics(&self, user_id: &str) -> Result<Vec<UserPortfolioMetric>>;
}

#[derive(Debug, Clone)]
pub struct PortfolioService {
    provider: Arc<ClientProvider>,
}

impl PortfolioService {
    pub fn new(provider: Arc<ClientProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn get_portfolio_summaries(&self, user_id: &str) -> Result<Vec<PortfolioPoint>> {
        super::fetch(&self.provider, &endpoints::PORTFOLIO_SUMMARY, Some(user_id)).await
    }

    async fn get_rolling_returns(&self, user_id: &str) -> Result<Vec<RollingReturnPoint>> {
        super::fetch(&self.provider, &endpoints::ROLLING_RETURNS, Some(user_id)).await
    }

    async fn get_portfolio_metrics(&self, user_id: &str) -> Result<Vec<UserPortfolioMetric>> {
        super::fetch(&self.provider, &endpoints::PORTFOLIO_METRICS, Some(user_id)).await
    }
}
