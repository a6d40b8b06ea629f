//! Portana API - authenticated access to the Portana portfolio backend.
//!
//! This crate provides a lazily-built, shared HTTP client that attaches the
//! signed-in user's bearer token, and a typed service façade mapping backend
//! resources (users, positions, portfolio series, P&L, metrics, prices,
//! accounts) to async accessors.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use portana_api::{ClientProvider, EnvConfig, MemoryCredentialStore, PortanaServices};
//! use portana_api::services::PositionServiceTrait;
//!
//! let store = Arc::new(MemoryCredentialStore::new());
//! let provider = Arc::new(ClientProvider::with_credentials(Arc::new(EnvConfig), store));
//! let services = PortanaServices::new(provider);
//! let positions = services.positions.get_position_summaries("42").await?;
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod services;
pub mod types;

pub use client::{
    global_provider, install_global_provider, shared_client, ApiClient, BearerAuthInterceptor,
    ClientProvider, RequestInterceptor,
};
pub use config::{ApiConfig, ConfigSource, EnvConfig, StaticConfig, REQUEST_TIMEOUT};
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use endpoints::{Endpoint, CATALOG};
pub use error::{ApiError, Result};
pub use services::PortanaServices;
pub use types::*;
