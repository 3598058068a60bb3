//! In-memory client that records every call, used by tests

use super::{Container, DirectoryRef, ExecOutput, PipelineClient, Secret};
use crate::plugins::PluginError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;

/// A call made against the recording client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetSecret { name: String },
    Sync(Container),
    Publish {
        container: Container,
        address: String,
        variants: usize,
    },
}

#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    secrets: Mutex<HashMap<String, String>>,
    fail_with: Option<PluginError>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `sync` and `publish` fail with `err`
    pub fn failing(err: PluginError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn synced(&self) -> Vec<Container> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Sync(container) => Some(container),
                _ => None,
            })
            .collect()
    }

    pub fn published(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Publish { address, .. } => Some(address),
                _ => None,
            })
            .collect()
    }

    pub fn plaintext_of(&self, secret: &Secret) -> Option<String> {
        self.secrets.lock().get(secret.id()).cloned()
    }
}

#[async_trait]
impl PipelineClient for RecordingClient {
    fn host_directory(&self, path: &Path) -> DirectoryRef {
        DirectoryRef::new(format!("host:{}", path.display()))
    }

    async fn set_secret(&self, name: &str, plaintext: &str) -> Result<Secret, PluginError> {
        let id = format!("secret-{}", uuid::Uuid::new_v4());
        self.secrets.lock().insert(id.clone(), plaintext.to_string());
        self.calls.lock().push(Call::SetSecret {
            name: name.to_string(),
        });
        Ok(Secret::new(id, name))
    }

    async fn secret_plaintext(&self, secret: &Secret) -> Result<String, PluginError> {
        self.plaintext_of(secret)
            .ok_or_else(|| PluginError::UnknownSecret(secret.name().to_string()))
    }

    async fn sync(&self, container: &Container) -> Result<ExecOutput, PluginError> {
        self.calls.lock().push(Call::Sync(container.clone()));
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(ExecOutput::default()),
        }
    }

    async fn publish(
        &self,
        container: &Container,
        address: &str,
        platform_variants: &[Container],
    ) -> Result<String, PluginError> {
        self.calls.lock().push(Call::Publish {
            container: container.clone(),
            address: address.to_string(),
            variants: platform_variants.len(),
        });
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(address.to_string()),
        }
    }
}
