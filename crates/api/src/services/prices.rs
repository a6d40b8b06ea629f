use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ClientProvider;
use crate::endpoints;
use crate::error::Result;
use crate::types::Price;

#[async_trait]
pub trait PriceServiceTrait: Send + Sync {
    /// Latest price of every tracked symbol.
    async fn get_prices(&self) -> Result<Vec<Price>>;
}

#[derive(Debug, Clone)]
pub struct PriceService {
    provider: Arc<ClientProvider>,
}

impl PriceService {
    pub fn new(provider: Arc<ClientProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl PriceServiceTrait for PriceService {
    async fn get_prices(&self) -> Result<Vec<Price>> {
        super::fetch(&self.provider, &endpoints::PRICES, None).await
    }
}
