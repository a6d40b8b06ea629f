use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ClientProvider;
use crate::endpoints;
use crate::error::Result;
use crate::types::{RealizedPnlPoint, UnrealizedPnlPoint};

#[async_trait]
pub trait PnlServiceTrait: Send + Sync {
    async fn get_realized_pnl(&self, user_id: &str) -> Result<Vec<RealizedPnlPoint>>;

    async fn get_unrealized_pnl(&self, user_id: &str) -> Result<Vec<UnrealizedPnlPoint>>;
}

#[derive(Debug, Clone)]
pub struct PnlService {
    provider: Arc<ClientProvider>,
}

impl PnlService {
    pub fn new(provider: Arc<ClientProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PnlServiceTrait for PnlService {
    async fn get_realized_pnl(&self, user_id: &str) -> Result<Vec<RealizedPnlPoint>> {
        super::fetch(&self.provider, &endpoints::REALIZED_PNL, Some(user_id)).await
    }

    async fn get_unrealized_pnl(&self, user_id: &str) -> Result<Vec<UnrealizedPnlPoint>> {
        super::fetch(&self.provider, &endpoints::UNREALIZED_PNL, Some(user_id)).await
    }
}
