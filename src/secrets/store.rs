//! Binding of fetched secrets into a pipeline client

use super::SecretBackend;
use crate::engine::{PipelineClient, Secret};
use crate::plugins::PluginError;
use std::collections::BTreeMap;

/// Fetches secrets from a backend and registers them with a client
#[derive(Debug, Clone)]
pub struct SecretStore<B> {
    backend: B,
    default_secret_path: String,
}

impl<B: SecretBackend> SecretStore<B> {
    /// Creates a store over `backend`
    #[must_use]
    pub fn new(backend: B, default_secret_path: impl Into<String>) -> Self {
        Self {
            backend,
            default_secret_path: default_secret_path.into(),
        }
    }

    fn path<'a>(&'a self, secret_path: Option<&'a str>) -> &'a str {
        secret_path.unwrap_or(&self.default_secret_path)
    }

    /// Fetches the plaintext of one secret without registering it
    ///
    /// # Errors
    ///
    /// Propagates backend errors, including [`PluginError::MissingSecret`].
    pub async fn plaintext(
        &self,
        name: &str,
        secret_path: Option<&str>,
    ) -> Result<String, PluginError> {
        self.backend.get_secret(name, self.path(secret_path)).await
    }

    /// Fetches secret `name` and registers it with the client as `secret_name`
    ///
    /// # Errors
    ///
    /// Propagates backend and client errors.
    pub async fn get(
        &self,
        client: &dyn PipelineClient,
        name: &str,
        secret_name: &str,
        secret_path: Option<&str>,
    ) -> Result<Secret, PluginError> {
        let value = self.plaintext(name, secret_path).await?;
        client.set_secret(secret_name, &value).await
    }

    /// Fetches every secret under a path and registers each as `{prefix}{key}`
    ///
    /// The returned map is keyed by the key as stored in the backend.
    ///
    /// # Errors
    ///
    /// Propagates backend and client errors.
    pub async fn list(
        &self,
        client: &dyn PipelineClient,
        secret_path: Option<&str>,
        prefix: &str,
    ) -> Result<BTreeMap<String, Secret>, PluginError> {
        let path = self.path(secret_path);
        let values = self.backend.list_secrets(path).await?;
        tracing::info!(path, count = values.len(), "Binding secrets");

        let mut secrets = BTreeMap::new();
        for (key, value) in values {
            let secret = client.set_secret(&format!("{prefix}{key}"), &value).await?;
            secrets.insert(key, secret);
        }
        Ok(secrets)
    }
}
