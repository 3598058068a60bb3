//! Pipeline client trait
//!
//! The client is the only collaborator with side effects. Plugins describe
//! what to run as a [`Container`] and the client runs it.

use super::{Container, DirectoryRef, ExecOutput, Secret};
use crate::plugins::PluginError;
use async_trait::async_trait;
use std::path::Path;

/// Trait for clients that can run containers and hold secrets
#[allow(clippy::missing_errors_doc)]
#[async_trait]
pub trait PipelineClient: Send + Sync {
    /// Returns a handle for a directory on the host
    fn host_directory(&self, path: &Path) -> DirectoryRef;

    /// Registers a plaintext value and returns a handle for it
    async fn set_secret(&self, name: &str, plaintext: &str) -> Result<Secret, PluginError>;

    /// Resolves a secret handle back to its plaintext
    async fn secret_plaintext(&self, secret: &Secret) -> Result<String, PluginError>;

    /// Runs every exec of the container and waits for completion
    async fn sync(&self, container: &Container) -> Result<ExecOutput, PluginError>;

    /// Publishes the container image to `address`, returning the pushed reference
    async fn publish(
        &self,
        container: &Container,
        address: &str,
        platform_variants: &[Container],
    ) -> Result<String, PluginError>;
}
