//! Netlify site deployment

use super::types::{Validate, require_non_empty};
use super::{PluginError, ValidationError};
use crate::engine::{Container, DirSource, DirectoryRef, ExecOptions, ExecOutput, PipelineClient, Secret};

/// Node image the Netlify CLI is installed into
pub const NODE_IMAGE: &str = "node:20-slim";

/// Options for `netlify deploy`
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Directory to deploy
    pub dir: DirSource,
    /// Netlify auth token
    pub token: Secret,
    /// Site id
    pub site: String,
}

impl DeployOptions {
    /// Creates deploy options for `site`
    #[must_use]
    pub fn new(site: impl Into<String>, token: Secret) -> Self {
        Self {
            dir: DirSource::default(),
            token,
            site: site.into(),
        }
    }

    /// Sets the deployed directory
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<DirSource>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Builds the deploy container over `dir`
    #[must_use]
    pub fn container(&self, dir: DirectoryRef) -> Container {
        Container::new()
            .pipeline("deploy")
            .from(NODE_IMAGE)
            .with_exec_opts(
                ["npm", "install", "-g", "netlify-cli"],
                ExecOptions::skip_entrypoint(),
            )
            .with_directory("/app", dir)
            .with_env_variable("NETLIFY_SITE_ID", self.site.as_str())
            .with_secret_variable("NETLIFY_AUTH_TOKEN", self.token.clone())
            .with_exec_opts(
                ["netlify", "deploy", "--prod", "--dir", "/app"],
                ExecOptions::skip_entrypoint(),
            )
    }
}

impl Validate for DeployOptions {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        require_non_empty("site", &self.site)
    }
}

/// Installs the Netlify CLI and deploys to production
///
/// # Errors
///
/// Fails validation before any client call, then propagates client errors.
pub async fn deploy(
    client: &dyn PipelineClient,
    options: &DeployOptions,
) -> Result<ExecOutput, PluginError> {
    options.validate()?;
    tracing::info!(site = %options.site, "Deploying to Netlify");
    client.sync(&options.container(options.dir.resolve(client))).await
}
