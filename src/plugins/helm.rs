//! Helm chart install/upgrade

use super::command::CommandLine;
use super::types::{Validate, require_non_empty};
use super::{PluginError, ValidationError, mounted_source};
use crate::engine::{Container, DirSource, DirectoryRef, ExecOptions, ExecOutput, PipelineClient};

/// Image shipping `helm` and a kubeconfig helper
pub const HELM_IMAGE: &str = "michaelmass/helmify";

/// Options for `helm upgrade --install`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    /// Chart directory
    pub dir: DirSource,
    /// Release name
    pub release: String,
    /// Target namespace
    pub namespace: String,
    /// Values file relative to the chart
    pub values: String,
}

impl InstallOptions {
    /// Creates options for `release` in the `default` namespace
    #[must_use]
    pub fn new(release: impl Into<String>) -> Self {
        Self {
            dir: DirSource::default(),
            release: release.into(),
            namespace: "default".to_string(),
            values: "./values.yaml".to_string(),
        }
    }

    /// Sets the chart directory
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<DirSource>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets the namespace
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the values file
    #[must_use]
    pub fn with_values(mut self, values: impl Into<String>) -> Self {
        self.values = values.into();
        self
    }

    /// Arguments of the `helm upgrade` call
    #[must_use]
    pub fn command(&self) -> Vec<String> {
        CommandLine::new(["helm", "upgrade"])
            .args([self.release.as_str(), "."])
            .args(["--install", "--wait", "--atomic"])
            .assign("--namespace", &self.namespace)
            .assign("--values", &self.values)
            .build()
    }

    /// Builds the install container over `dir`
    #[must_use]
    pub fn container(&self, dir: DirectoryRef) -> Container {
        mounted_source("install", HELM_IMAGE, dir)
            .with_exec_opts(self.command(), ExecOptions::skip_entrypoint())
    }
}

impl Validate for InstallOptions {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        require_non_empty("release", &self.release)?;
        require_non_empty("namespace", &self.namespace)?;
        require_non_empty("values", &self.values)
    }
}

/// Installs or upgrades a release and waits for it to become ready
///
/// # Errors
///
/// Fails validation before any client call, then propagates client errors.
pub async fn install(
    client: &dyn PipelineClient,
    options: &InstallOptions,
) -> Result<ExecOutput, PluginError> {
    options.validate()?;
    tracing::info!(release = %options.release, namespace = %options.namespace, "Installing chart");
    client.sync(&options.container(options.dir.resolve(client))).await
}
