use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ClientProvider;
use crate::endpoints;
use crate::error::Result;
use crate::types::{Account, AccountPosition};

/// Brokerage accounts and their raw position rows.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn get_accounts(&self) -> Result<Vec<Account>>;

    /// Positions held in one account. The backend returns a bare array.
    async fn get_account_positions(&self, account_id: &str) -> Result<Vec<AccountPosition>>;

    /// Every position row across all accounts.
    async fn get_all_positions(&self) -> Result<Vec<AccountPosition>>;
}

#[derive(Debug, Clone)]
pub struct AccountService {
    provider: Arc<ClientProvider>,
}

impl AccountService {
    pub fn new(provider: Arc<ClientProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    async fn get_accounts(&self) -> Result<Vec<Account>> {
        super::fetch(&self.provider, &endpoints::LIST_ACCOUNTS, None).await
    }

    async fn get_account_positions(&self, account_id: &str) -> Result<Vec<AccountPosition>> {
        super::fetch(&self.provider, &endpoints::ACCOUNT_POSITIONS, Some(account_id)).await
    }

    async fn get_all_positions(&self) -> Result<Vec<AccountPosition>> {
        super::fetch(&self.provider, &endpoints::ALL_POSITIONS, None).await
    }
}
