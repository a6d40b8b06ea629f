//! Typed service façade over the backend endpoints.
//!
//! Each resource module defines a service trait and an implementation backed
//! by a shared [`ClientProvider`]. Every accessor issues exactly one GET and
//! returns the unwrapped payload; failures are returned as-is, never replaced
//! by an empty value.

mod accounts;
mod pnl;
mod portfolio;
mod positions;
mod prices;
mod users;

use std::sync::Arc;

pub use accounts::{AccountService, AccountServiceTrait};
pub use pnl::{PnlService, PnlServiceTrait};
pub use portfolio::{PortfolioService, PortfolioServiceTrait};
pub use positions::{PositionService, PositionServiceTrait};
pub use prices::{PriceService, PriceServiceTrait};
pub use users::{UserService, UserServiceTrait};

use serde::de::DeserializeOwned;

use crate::client::{global_provider, ClientProvider};
use crate::endpoints::Endpoint;
use crate::error::Result;

/// Obtain the provider's client and fetch one endpoint.
async fn fetch<T: DeserializeOwned>(
    provider: &ClientProvider,
    endpoint: &Endpoint,
    subject: Option<&str>,
) -> Result<T> {
    let client = provider.client().await?;
    client.fetch(endpoint, subject).await
}

/// All services over one provider.
#[derive(Debug, Clone)]
pub struct PortanaServices {
    pub users: Arc<UserService>,
    pub positions: Arc<PositionService>,
    pub portfolio: Arc<PortfolioService>,
    pub pnl: Arc<PnlService>,
    pub prices: Arc<PriceService>,
    pub accounts: Arc<AccountService>,
}

impl PortanaServices {
    pub fn new(provider: Arc<ClientProvider>) -> Self {
        Self {
            users: Arc::new(UserService::new(provider.clone())),
            positions: Arc::new(PositionService::new(provider.clone())),
            portfolio: Arc::new(PortfolioService::new(provider.clone())),
            pnl: Arc::new(PnlService::new(provider.clone())),
            prices: Arc::new(PriceService::new(provider.clone())),
            accounts: Arc::new(AccountService::new(provider)),
        }
    }

    /// Services over the process-wide provider.
    pub fn global() -> Self {
        Self::new(global_provider())
    }
}
