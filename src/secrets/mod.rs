//! Remote secret resolution
//!
//! Secrets are fetched from a key-value store over HTTPS and registered
//! with the pipeline client so plugins only ever see [`Secret`] handles.
//!
//! [`Secret`]: crate::engine::Secret

mod infisical;
mod store;

use crate::plugins::PluginError;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub use infisical::{
    DEFAULT_API_URL, InfisicalClient, InfisicalSettings, normalize_secret_path,
    parse_secret_list, parse_secret_value,
};
pub use store::SecretStore;

/// A remote key-value secret store
#[allow(clippy::missing_errors_doc)]
#[async_trait]
pub trait SecretBackend: Send + Sync {
    /// Fetches the plaintext of one secret
    async fn get_secret(&self, name: &str, secret_path: &str) -> Result<String, PluginError>;

    /// Fetches every secret under a path
    async fn list_secrets(&self, secret_path: &str) -> Result<BTreeMap<String, String>, PluginError>;
}
