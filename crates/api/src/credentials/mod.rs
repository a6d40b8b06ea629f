//! Credential store abstraction.
//!
//! The access layer only ever reads from a store. Setting and clearing the
//! signed-in user belongs to whoever owns the store (login flows, the CLI).

mod file_store;

use std::sync::RwLock;

pub use file_store::FileCredentialStore;

use crate::error::{ApiError, Result};
use crate::types::User;

/// Read access to the signed-in user and their bearer token.
pub trait CredentialStore: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Result<Option<User>>;

    /// The bearer token of the signed-in user, if any.
    fn current_token(&self) -> Result<Option<String>> {
        Ok(self
            .current_user()?
            .and_then(|user| user.token)
            .filter(|token| !token.is_empty()))
    }

    /// The id of the signed-in user, if any.
    fn current_user_id(&self) -> Result<Option<String>> {
        Ok(self.current_user()?.map(|user| user.id))
    }
}

/// Process-local store that forgets the user on exit.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    user: RwLock<Option<User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: User) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn set_user(&self, user: User) -> Result<()> {
        let mut guard = self
            .user
            .write()
            .map_err(|_| ApiError::credentials("Credential store lock poisoned"))?;
        *guard = Some(user);
        Ok(())
    }

    pub fn clear_user(&self) -> Result<()> {
        let mut guard = self
            .user
            .write()
            .map_err(|_| ApiError::credentials("Credential store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn current_user(&self) -> Result<Option<User>> {
        let guard = self
            .user
            .read()
            .map_err(|_| ApiError::credentials("Credential store lock poisoned"))?;
        Ok(guard.clone())
    }
}
