use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ClientProvider;
use crate::endpoints;
use crate::error::Result;
use crate::types::User;

#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Lists all users.
    async fn get_all_users(&self) -> Result<Vec<User>>;
}

#[derive(Debug, Clone)]
pub struct UserService {
    provider: Arc<ClientProvider>,
}

impl UserService {
    pub fn new(provider: Arc<ClientProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn get_all_users(&self) -> Result<Vec<User>> {
        super::fetch(&self.provider, &endpoints::LIST_USERS, None).await
    }
}
