//! Pulumi stack update

use super::command::CommandLine;
use super::{PluginError, SourceOptions, mounted_source};
use crate::engine::{Container, DirSource, DirectoryRef, ExecOptions, ExecOutput, PipelineClient, Secret};

/// Pulumi image with the Node.js runtime
pub const PULUMI_IMAGE: &str = "pulumi/pulumi-nodejs";

/// Options for `pulumi up`
#[derive(Debug, Clone, Default)]
pub struct UpOptions {
    /// Pulumi project directory
    pub dir: DirSource,
    /// Stack to update; the CLI's selected stack when absent
    pub stack: Option<String>,
    /// Access token; without one the CLI uses its own login state
    pub access_token: Option<Secret>,
}

impl From<SourceOptions> for UpOptions {
    fn from(source: SourceOptions) -> Self {
        Self {
            dir: source.dir,
            ..Self::default()
        }
    }
}

impl UpOptions {
    /// Sets the project directory
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<DirSource>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Selects the stack
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Sets the access token
    #[must_use]
    pub fn with_access_token(mut self, token: Secret) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Arguments of the `pulumi up` call
    #[must_use]
    pub fn command(&self) -> Vec<String> {
        CommandLine::new(["pulumi", "up", "--yes", "--non-interactive"])
            .option("--stack", self.stack.as_ref())
            .build()
    }

    /// Builds the update container over `dir`
    #[must_use]
    pub fn container(&self, dir: DirectoryRef) -> Container {
        let container = mounted_source("up", PULUMI_IMAGE, dir);
        let container = match &self.access_token {
            Some(token) => container.with_secret_variable("PULUMI_ACCESS_TOKEN", token.clone()),
            None => container,
        };
        container.with_exec_opts(self.command(), ExecOptions::skip_entrypoint())
    }
}

/// Runs `pulumi up` non-interactively
///
/// # Errors
///
/// Propagates client errors.
pub async fn up(client: &dyn PipelineClient, options: &UpOptions) -> Result<ExecOutput, PluginError> {
    tracing::info!(stack = options.stack.as_deref().unwrap_or("<selected>"), "Running pulumi up");
    client.sync(&options.container(options.dir.resolve(client))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::recording::RecordingClient;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_up_without_stack_or_token() {
        let client = RecordingClient::new();

        up(&client, &UpOptions::default()).await.unwrap();

        let container = &client.synced()[0];
        assert_eq!(
            container.execs()[0].args,
            vec!["pulumi", "up", "--yes", "--non-interactive"]
        );
        assert!(container.secret_env().is_empty());
    }

    #[tokio::test]
    async fn test_up_with_stack_and_token() {
        let client = RecordingClient::new();
        let token = Secret::new("p", "PULUMI_ACCESS_TOKEN");
        let options = UpOptions::from(SourceOptions::new("infra"))
            .with_stack("prod")
            .with_access_token(token.clone());

        up(&client, &options).await.unwrap();

        let container = &client.synced()[0];
        assert_eq!(
            container.execs()[0].args,
            vec!["pulumi", "up", "--yes", "--non-interactive", "--stack", "prod"]
        );
        assert_eq!(container.secret_value("PULUMI_ACCESS_TOKEN"), Some(&token));
        assert_eq!(container.mounts()[0].1, DirectoryRef::new("host:infra"));
    }
}
