//! Credential lookup for CLI commands
//!
//! A credential is taken from the process environment first and from
//! Infisical second, then registered with the pipeline client so adapters
//! only receive [`Secret`] handles.

use rigging::engine::{PipelineClient, Secret};
use rigging::infrastructure::EnvContext;
use rigging::plugins::PluginError;
use rigging::secrets::{InfisicalClient, InfisicalSettings, SecretStore};

pub struct Credentials<'a> {
    env: &'a EnvContext,
    client: &'a dyn PipelineClient,
    store: Option<SecretStore<InfisicalClient>>,
}

impl<'a> Credentials<'a> {
    /// Uses Infisical only when it is fully configured
    pub fn new(
        env: &'a EnvContext,
        client: &'a dyn PipelineClient,
        infisical: &InfisicalSettings,
    ) -> Result<Self, PluginError> {
        let store = if infisical.is_configured() {
            let backend = InfisicalClient::new(infisical)?;
            let path = backend.default_secret_path().to_string();
            Some(SecretStore::new(backend, path))
        } else {
            None
        };
        Ok(Self { env, client, store })
    }

    /// Looks up a credential without the secret store
    #[cfg(test)]
    pub fn env_only(env: &'a EnvContext, client: &'a dyn PipelineClient) -> Self {
        Self {
            env,
            client,
            store: None,
        }
    }

    pub async fn require(&self, name: &str) -> Result<Secret, PluginError> {
        self.optional(name)
            .await?
            .ok_or_else(|| PluginError::missing_credential(name))
    }

    pub async fn optional(&self, name: &str) -> Result<Option<Secret>, PluginError> {
        if let Some(value) = self.env.get_non_empty(name) {
            tracing::debug!(credential = name, source = "environment", "Resolved credential");
            return self.client.set_secret(name, value).await.map(Some);
        }

        let Some(store) = &self.store else {
            return Ok(None);
        };
        match store.get(self.client, name, name, None).await {
            Ok(secret) => {
                tracing::debug!(credential = name, source = "infisical", "Resolved credential");
                Ok(Some(secret))
            }
            Err(PluginError::MissingSecret { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn store(&self) -> Option<&SecretStore<InfisicalClient>> {
        self.store.as_ref()
    }
}
