use std::fmt;
use std::sync::{Arc, OnceLock};

use log::info;
use tokio::sync::OnceCell;

use super::{ApiClient, BearerAuthInterceptor};
use crate::config::{ApiConfig, ConfigSource, EnvConfig};
use crate::credentials::CredentialStore;
use crate::error::{ApiError, Result};

static GLOBAL_PROVIDER: OnceLock<Arc<ClientProvider>> = OnceLock::new();

/// Owns one lazily-built [`ApiClient`].
///
/// A provider is a lifecycle scope: every call to [`ClientProvider::client`]
/// on the same provider returns the same instance. Use the global provider
/// for a process-wide client, or create one provider per session when
/// credentials must not be shared between users.
///
/// Bearer authentication is installed only when the provider was given a
/// credential store. Contexts without one (server-side rendering, batch
/// jobs) get an identical client that sends anonymous requests.
pub struct ClientProvider {
    config: Arc<dyn ConfigSource>,
    credentials: Option<Arc<dyn CredentialStore>>,
    client: OnceCell<Arc<ApiClient>>,
}

impl fmt::Debug for ClientProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientProvider")
            .field("has_credential_store", &self.has_credential_store())
            .field("client", &self.client.get())
            .finish()
    }
}

impl ClientProvider {
    /// Provider without a credential store.
    pub fn new(config: Arc<dyn ConfigSource>) -> Self {
        Self {
            config,
            credentials: None,
            client: OnceCell::new(),
        }
    }

    /// Provider whose client attaches the store's bearer token.
    pub fn with_credentials(
        config: Arc<dyn ConfigSource>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            config,
            credentials: Some(credentials),
            client: OnceCell::new(),
        }
    }

    /// Provider reading `PORTANA_API_URL` from the environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(EnvConfig))
    }

    pub fn has_credential_store(&self) -> bool {
        self.credentials.is_some()
    }

    /// True once the client has been built.
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    /// Return the shared client, building it on first use.
    ///
    /// Concurrent first callers wait for a single construction. A failed
    /// construction stores nothing, so the next call tries again.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the base URL is missing or invalid.
    pub async fn client(&self) -> Result<Arc<ApiClient>> {
        self.client
            .get_or_try_init(|| async { self.build().map(Arc::new) })
            .await
            .cloned()
    }

    fn build(&self) -> Result<ApiClient> {
        let config = ApiConfig::resolve(self.config.as_ref())?;
        let mut client = ApiClient::new(&config)?;

        if let Some(store) = &self.credentials {
            client = client.with_interceptor(Arc::new(BearerAuthInterceptor::new(store.clone())));
        }

        info!(
            "[ApiClient] Created client for {} (timeout {} ms, bearer auth {})",
            client.base_url(),
            client.timeout().as_millis(),
            if self.has_credential_store() { "on" } else { "off" }
        );
        Ok(client)
    }
}

/// Install the process-wide provider.
///
/// # Errors
///
/// Fails if a global provider is already in place, including the default one
/// created by an earlier call to [`global_provider`].
pub fn install_global_provider(provider: Arc<ClientProvider>) -> Result<()> {
    GLOBAL_PROVIDER
        .set(provider)
        .map_err(|_| ApiError::config("A global client provider is already installed"))
}

/// The process-wide provider. Defaults to environment configuration without
/// a credential store when none was installed.
pub fn global_provider() -> Arc<ClientProvider> {
    GLOBAL_PROVIDER
        .get_or_init(|| Arc::new(ClientProvider::from_env()))
        .clone()
}

/// The process-wide client.
pub async fn shared_client() -> Result<Arc<ApiClient>> {
    global_provider().client().await
}
