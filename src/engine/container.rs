//! Immutable container description
//!
//! A [`Container`] is built by chaining pure `with_*` calls. Nothing runs
//! until the value is handed to [`PipelineClient::sync`] or
//! [`PipelineClient::publish`].
//!
//! [`PipelineClient::sync`]: super::PipelineClient::sync
//! [`PipelineClient::publish`]: super::PipelineClient::publish

use super::{DirectoryRef, Platform, Secret};
use crate::plugins::ValidationError;

/// Options for a single exec
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Run the command directly instead of passing it to the image entrypoint
    pub skip_entrypoint: bool,
}

impl ExecOptions {
    /// Exec options that bypass the image entrypoint
    #[must_use]
    pub fn skip_entrypoint() -> Self {
        Self {
            skip_entrypoint: true,
        }
    }
}

/// A command to run inside the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exec {
    /// Command and arguments
    pub args: Vec<String>,
    /// Exec options
    pub options: ExecOptions,
}

/// Image built from a Dockerfile in a context directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSpec {
    /// Build context
    pub context: DirectoryRef,
    /// Dockerfile path relative to the context
    pub dockerfile: String,
}

/// Credentials used when pushing to a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryAuth {
    /// Registry address
    pub address: String,
    /// Registry user
    pub username: String,
    /// Registry password
    pub secret: Secret,
}

/// Where the base filesystem of a container comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseImage {
    /// Pulled from a registry reference
    Image(String),
    /// Built from a Dockerfile
    Build(BuildSpec),
}

/// Immutable description of a containerized command sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    pipeline: Option<String>,
    base: Option<BaseImage>,
    platform: Option<Platform>,
    mounts: Vec<(String, DirectoryRef)>,
    workdir: Option<String>,
    env: Vec<(String, String)>,
    secret_env: Vec<(String, Secret)>,
    execs: Vec<Exec>,
    registry_auth: Option<RegistryAuth>,
}

impl Container {
    /// Creates an empty container description
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels the container with the pipeline it belongs to
    #[must_use]
    pub fn pipeline(mut self, name: impl Into<String>) -> Self {
        self.pipeline = Some(name.into());
        self
    }

    /// Uses a registry image as the base
    #[must_use]
    pub fn from(mut self, image: impl Into<String>) -> Self {
        self.base = Some(BaseImage::Image(image.into()));
        self
    }

    /// Builds the base image from a Dockerfile
    #[must_use]
    pub fn build(mut self, context: DirectoryRef, dockerfile: impl Into<String>) -> Self {
        self.base = Some(BaseImage::Build(BuildSpec {
            context,
            dockerfile: dockerfile.into(),
        }));
        self
    }

    /// Sets the target platform
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Mounts a directory at `path`
    #[must_use]
    pub fn with_directory(mut self, path: impl Into<String>, dir: DirectoryRef) -> Self {
        self.mounts.push((path.into(), dir));
        self
    }

    /// Sets the working directory
    #[must_use]
    pub fn with_workdir(mut self, path: impl Into<String>) -> Self {
        self.workdir = Some(path.into());
        self
    }

    /// Sets a plain environment variable, replacing an earlier value
    #[must_use]
    pub fn with_env_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.env.retain(|(existing, _)| *existing != name);
        self.env.push((name, value.into()));
        self
    }

    /// Exposes a secret as an environment variable, replacing an earlier value
    #[must_use]
    pub fn with_secret_variable(mut self, name: impl Into<String>, secret: Secret) -> Self {
        let name = name.into();
        self.secret_env.retain(|(existing, _)| *existing != name);
        self.secret_env.push((name, secret));
        self
    }

    /// Appends a command run through the image entrypoint
    #[must_use]
    pub fn with_exec<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_exec_opts(args, ExecOptions::default())
    }

    /// Appends a command with explicit options
    #[must_use]
    pub fn with_exec_opts<I, S>(mut self, args: I, options: ExecOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execs.push(Exec {
            args: args.into_iter().map(Into::into).collect(),
            options,
        });
        self
    }

    /// Attaches registry credentials used by publish
    #[must_use]
    pub fn with_registry_auth(
        mut self,
        address: impl Into<String>,
        username: impl Into<String>,
        secret: Secret,
    ) -> Self {
        self.registry_auth = Some(RegistryAuth {
            address: address.into(),
            username: username.into(),
            secret,
        });
        self
    }

    /// Pipeline label
    #[must_use]
    pub fn pipeline_name(&self) -> Option<&str> {
        self.pipeline.as_deref()
    }

    /// Base image or build step
    #[must_use]
    pub fn base(&self) -> Option<&BaseImage> {
        self.base.as_ref()
    }

    /// Target platform
    #[must_use]
    pub fn platform(&self) -> Option<&Platform> {
        self.platform.as_ref()
    }

    /// Mounted directories, in mount order
    #[must_use]
    pub fn mounts(&self) -> &[(String, DirectoryRef)] {
        &self.mounts
    }

    /// Working directory
    #[must_use]
    pub fn workdir(&self) -> Option<&str> {
        self.workdir.as_deref()
    }

    /// Plain environment variables
    #[must_use]
    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Looks up a plain environment variable
    #[must_use]
    pub fn env_value(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Secret environment variables
    #[must_use]
    pub fn secret_env(&self) -> &[(String, Secret)] {
        &self.secret_env
    }

    /// Looks up the secret bound to an environment variable
    #[must_use]
    pub fn secret_value(&self, name: &str) -> Option<&Secret> {
        self.secret_env
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, secret)| secret)
    }

    /// Commands, in execution order
    #[must_use]
    pub fn execs(&self) -> &[Exec] {
        &self.execs
    }

    /// Registry credentials
    #[must_use]
    pub fn registry_auth(&self) -> Option<&RegistryAuth> {
        self.registry_auth.as_ref()
    }

    /// Checks that the container can be run
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingImage`] if no base was set.
    pub fn ensure_runnable(&self) -> Result<(), ValidationError> {
        if self.base.is_none() {
            return Err(ValidationError::MissingImage);
        }
        Ok(())
    }
}
