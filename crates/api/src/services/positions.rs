use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ClientProvider;
use crate::endpoints;
use crate::error::Result;
use crate::types::{PositionSummary, PositionsByAccount};

/// Holdings of a user.
#[async_trait]
pub trait PositionServiceTrait: Send + Sync {
    /// Positions aggregated per symbol across all of the user's accounts.
    async fn get_position_summaries(&self, user_id: &str) -> Result<Vec<PositionSummary>>;

    /// Positions grouped by account.
    ///
    /// Unlike the other accessors this returns the whole response body,
    /// `{"positions_by_account": {...}}`, not just the inner map.
    async fn get_positions_by_account(&self, user_id: &str) -> Result<PositionsByAccount>;
}

#[derive(Debug, Clone)]
pub struct PositionService {
    provider: Arc<ClientProvider>,
}

impl PositionService {
    pub fn new(provider: Arc<ClientProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PositionServiceTrait for PositionService {
    async fn get_position_summaries(&self, user_id: &str) -> Result<Vec<PositionSummary>> {
        super::fetch(&self.provider, &endpoints::USER_POSITIONS, Some(user_id)).await
    }

    async fn get_positions_by_account(&self, user_id: &str) -> Result<PositionsByAccount> {
        super::fetch(
            &self.provider,
            &endpoints::USER_POSITIONS_BY_ACCOUNT,
            Some(user_id),
        )
        .await
    }
}
