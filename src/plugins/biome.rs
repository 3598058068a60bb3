//! Biome linter, formatter and checker

use super::{PluginError, SourceOptions, mounted_source};
use crate::engine::{Container, DirectoryRef, ExecOptions, ExecOutput, PipelineClient};

/// Image shipping the `biome` binary
pub const BIOME_IMAGE: &str = "michaelmass/biome:0.0.2";

/// Biome subcommands exposed as plugins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiomeTask {
    /// `biome lint`
    Lint,
    /// `biome format`
    Format,
    /// `biome check`
    Check,
}

impl BiomeTask {
    fn subcommand(self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::Format => "format",
            Self::Check => "check",
        }
    }

    fn pipeline(self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::Format => "fmt",
            Self::Check => "check",
        }
    }

    /// Builds the container for this task over `dir`
    #[must_use]
    pub fn container(self, dir: DirectoryRef) -> Container {
        mounted_source(self.pipeline(), BIOME_IMAGE, dir).with_exec_opts(
            ["biome", self.subcommand(), "./"],
            ExecOptions::skip_entrypoint(),
        )
    }
}

async fn run(
    client: &dyn PipelineClient,
    options: &SourceOptions,
    task: BiomeTask,
) -> Result<ExecOutput, PluginError> {
    let dir = options.dir.resolve(client);
    tracing::info!(task = task.subcommand(), dir = dir.id(), "Running biome");
    client.sync(&task.container(dir)).await
}

/// Runs `biome lint ./` over the source tree
///
/// # Errors
///
/// Propagates client errors, including a non-zero exit.
pub async fn lint(
    client: &dyn PipelineClient,
    options: &SourceOptions,
) -> Result<ExecOutput, PluginError> {
    run(client, options, BiomeTask::Lint).await
}

/// Runs `biome format ./` over the source tree
///
/// # Errors
///
/// Propagates client errors, including a non-zero exit.
pub async fn fmt(
    client: &dyn PipelineClient,
    options: &SourceOptions,
) -> Result<ExecOutput, PluginError> {
    run(client, options, BiomeTask::Format).await
}

/// Runs `biome check ./` over the source tree
///
/// # Errors
///
/// Propagates client errors, including a non-zero exit.
pub async fn check(
    client: &dyn PipelineClient,
    options: &SourceOptions,
) -> Result<ExecOutput, PluginError> {
    run(client, options, BiomeTask::Check).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BaseImage;
    use crate::engine::recording::RecordingClient;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_lint_mounts_default_dir() {
        let client = RecordingClient::new();

        lint(&client, &SourceOptions::default()).await.unwrap();

        let synced = client.synced();
        assert_eq!(synced.len(), 1);
        let container = &synced[0];
        assert_eq!(container.pipeline_name(), Some("lint"));
        assert_eq!(
            container.base(),
            Some(&BaseImage::Image(BIOME_IMAGE.to_string()))
        );
        assert_eq!(
            container.mounts(),
            &[("/src".to_string(), DirectoryRef::new("host:."))]
        );
        assert_eq!(container.workdir(), Some("/src"));
        assert_eq!(container.execs()[0].args, vec!["biome", "lint", "./"]);
        assert!(container.execs()[0].options.skip_entrypoint);
    }

    #[tokio::test]
    async fn test_fmt_and_check_use_their_subcommands() {
        let client = RecordingClient::new();
        let options = SourceOptions::new("web");

        fmt(&client, &options).await.unwrap();
        check(&client, &options).await.unwrap();

        let synced = client.synced();
        assert_eq!(synced[0].pipeline_name(), Some("fmt"));
        assert_eq!(synced[0].execs()[0].args, vec!["biome", "format", "./"]);
        assert_eq!(synced[1].pipeline_name(), Some("check"));
        assert_eq!(synced[1].execs()[0].args, vec!["biome", "check", "./"]);
        assert_eq!(synced[1].mounts()[0].1, DirectoryRef::new("host:web"));
    }

    #[tokio::test]
    async fn test_handle_dir_is_used_as_is() {
        let client = RecordingClient::new();
        let options = SourceOptions::new(DirectoryRef::new("dir-42"));

        check(&client, &options).await.unwrap();

        assert_eq!(client.synced()[0].mounts()[0].1, DirectoryRef::new("dir-42"));
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let failure = PluginError::CommandFailed {
            operation: "lint".to_string(),
            code: 1,
            stderr: "lint errors".to_string(),
        };
        let client = RecordingClient::failing(failure.clone());

        assert_eq!(lint(&client, &SourceOptions::default()).await, Err(failure));
    }
}
