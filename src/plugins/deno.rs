//! Deno toolchain plugins: lint, fmt, check, publish and Deno Deploy

use super::ambient::apply_ambient_identity;
use super::command::CommandLine;
use super::types::{Validate, require_non_empty};
use super::{PluginError, SourceOptions, ValidationError, mounted_source};
use crate::engine::{
    Container, DirSource, DirectoryRef, ExecOptions, ExecOutput, PipelineClient, Secret,
};
use crate::infrastructure::EnvContext;

/// Official Deno image
pub const DENO_IMAGE: &str = "denoland/deno";

/// Installer for the `deployctl` CLI
pub const DEPLOYCTL_URL: &str = "https://deno.land/x/deploy/deployctl.ts";

/// Runs `deno lint`
///
/// # Errors
///
/// Propagates client errors, including a non-zero exit.
pub async fn lint(
    client: &dyn PipelineClient,
    options: &SourceOptions,
) -> Result<ExecOutput, PluginError> {
    let container = mounted_source("lint", DENO_IMAGE, options.dir.resolve(client))
        .with_exec_opts(["deno", "lint"], ExecOptions::skip_entrypoint());
    client.sync(&container).await
}

/// Runs `deno fmt --check`
///
/// # Errors
///
/// Propagates client errors, including a non-zero exit.
pub async fn fmt(
    client: &dyn PipelineClient,
    options: &SourceOptions,
) -> Result<ExecOutput, PluginError> {
    let container = mounted_source("fmt", DENO_IMAGE, options.dir.resolve(client))
        .with_exec_opts(["deno", "fmt", "--check"], ExecOptions::skip_entrypoint());
    client.sync(&container).await
}

/// Options for `deno check`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Source tree
    pub dir: DirSource,
    /// Modules to type check
    pub entrypoints: Vec<String>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            dir: DirSource::default(),
            entrypoints: vec!["src/mod.ts".to_string()],
        }
    }
}

impl CheckOptions {
    /// Sets the source tree
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<DirSource>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Replaces the entrypoints
    #[must_use]
    pub fn with_entrypoints<I, S>(mut self, entrypoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entrypoints = entrypoints.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the check container over `dir`
    #[must_use]
    pub fn container(&self, dir: DirectoryRef) -> Container {
        let command = CommandLine::new(["deno", "check"])
            .args(self.entrypoints.iter().cloned())
            .build();
        mounted_source("check", DENO_IMAGE, dir).with_exec_opts(command, ExecOptions::skip_entrypoint())
    }
}

impl Validate for CheckOptions {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.entrypoints.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "entrypoints",
            });
        }
        self.entrypoints
            .iter()
            .try_for_each(|entrypoint| require_non_empty("entrypoints", entrypoint))
    }
}

/// Runs `deno check` over the configured entrypoints
///
/// # Errors
///
/// Fails on an empty entrypoint list before any client call, then propagates
/// client errors.
pub async fn check(
    client: &dyn PipelineClient,
    options: &CheckOptions,
) -> Result<ExecOutput, PluginError> {
    options.validate()?;
    client.sync(&options.container(options.dir.resolve(client))).await
}

/// Options for `deno publish`
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Source tree
    pub dir: DirSource,
    /// Registry token; without one the CI identity is forwarded instead
    pub token: Option<Secret>,
}

impl PublishOptions {
    /// Creates options that publish with the ambient CI identity
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source tree
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<DirSource>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Publishes with an explicit token
    #[must_use]
    pub fn with_token(mut self, token: Secret) -> Self {
        self.token = Some(token);
        self
    }
}

/// Runs `deno publish`
///
/// With a token, the plaintext is resolved and passed as `--token`.
/// Without one, the allow-listed CI identity variables present in `env`
/// are forwarded so Deno can request an OIDC token itself.
///
/// # Errors
///
/// Propagates secret resolution and client errors.
pub async fn publish(
    client: &dyn PipelineClient,
    options: &PublishOptions,
    env: &EnvContext,
) -> Result<ExecOutput, PluginError> {
    let base = mounted_source("publish", DENO_IMAGE, options.dir.resolve(client));

    let container = match &options.token {
        Some(token) => {
            let plaintext = client.secret_plaintext(token).await?;
            base.with_exec_opts(
                ["deno", "publish", "--token", plaintext.as_str()],
                ExecOptions::skip_entrypoint(),
            )
        }
        None => {
            tracing::info!("No publish token given, forwarding CI identity");
            apply_ambient_identity(base, env)
                .with_exec_opts(["deno", "publish"], ExecOptions::skip_entrypoint())
        }
    };

    client.sync(&container).await
}

/// Options for a Deno Deploy deployment
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Source tree
    pub dir: DirSource,
    /// Deploy to production
    pub prod: bool,
    /// Deno Deploy project name
    pub project: String,
    /// Deploy access token
    pub deploy_token: Secret,
    /// Module to deploy
    pub entrypoint: String,
}

impl DeployOptions {
    /// Creates production deploy options for `main.ts`
    #[must_use]
    pub fn new(project: impl Into<String>, deploy_token: Secret) -> Self {
        Self {
            dir: DirSource::default(),
            prod: true,
            project: project.into(),
            deploy_token,
            entrypoint: "main.ts".to_string(),
        }
    }

    /// Sets the source tree
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<DirSource>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets whether to deploy to production
    #[must_use]
    pub fn with_prod(mut self, prod: bool) -> Self {
        self.prod = prod;
        self
    }

    /// Sets the deployed module
    #[must_use]
    pub fn with_entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.entrypoint = entrypoint.into();
        self
    }

    /// Arguments of the `deployctl deploy` call
    #[must_use]
    pub fn deploy_command(&self) -> Vec<String> {
        CommandLine::new(["deployctl", "deploy"])
            .assign("--project", &self.project)
            .switch("--prod", self.prod)
            .arg(self.entrypoint.as_str())
            .build()
    }

    /// Builds the deploy container over `dir`
    #[must_use]
    pub fn container(&self, dir: DirectoryRef) -> Container {
        Container::new()
            .pipeline("deploy")
            .from(DENO_IMAGE)
            .with_secret_variable("DENO_DEPLOY_TOKEN", self.deploy_token.clone())
            .with_directory("/src", dir)
            .with_workdir("/src")
            .with_exec_opts(
                ["deno", "install", "-Arf", DEPLOYCTL_URL],
                ExecOptions::skip_entrypoint(),
            )
            .with_exec_opts(self.deploy_command(), ExecOptions::skip_entrypoint())
    }
}

impl Validate for DeployOptions {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        require_non_empty("project", &self.project)?;
        require_non_empty("entrypoint", &self.entrypoint)
    }
}

/// Installs `deployctl` and deploys to Deno Deploy
///
/// # Errors
///
/// Fails validation before any client call, then propagates client errors.
pub async fn deploy(
    client: &dyn PipelineClient,
    options: &DeployOptions,
) -> Result<ExecOutput, PluginError> {
    options.validate()?;
    tracing::info!(project = %options.project, prod = options.prod, "Deploying to Deno Deploy");
    client.sync(&options.container(options.dir.resolve(client))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::recording::RecordingClient;
    use crate::plugins::ambient::OIDC_PASSTHROUGH_VARS;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_lint_and_fmt_commands() {
        let client = RecordingClient::new();

        lint(&client, &SourceOptions::default()).await.unwrap();
        fmt(&client, &SourceOptions::default()).await.unwrap();

        let synced = client.synced();
        assert_eq!(synced[0].execs()[0].args, vec!["deno", "lint"]);
        assert_eq!(synced[1].execs()[0].args, vec!["deno", "fmt", "--check"]);
        assert_eq!(synced[1].pipeline_name(), Some("fmt"));
    }

    #[tokio::test]
    async fn test_check_default_entrypoint() {
        let client = RecordingClient::new();

        check(&client, &CheckOptions::default()).await.unwrap();

        assert_eq!(
            client.synced()[0].execs()[0].args,
            vec!["deno", "check", "src/mod.ts"]
        );
    }

    #[tokio::test]
    async fn test_check_with_entrypoints() {
        let client = RecordingClient::new();
        let options = CheckOptions::default().with_entrypoints(["mod.ts", "cli.ts"]);

        check(&client, &options).await.unwrap();

        assert_eq!(
            client.synced()[0].execs()[0].args,
            vec!["deno", "check", "mod.ts", "cli.ts"]
        );
    }

    #[tokio::test]
    async fn test_check_rejects_empty_entrypoints() {
        let client = RecordingClient::new();
        let options = CheckOptions::default().with_entrypoints(Vec::<String>::new());

        let err = check(&client, &options).await.unwrap_err();

        assert_eq!(
            err,
            PluginError::Validation(ValidationError::EmptyField {
                field: "entrypoints"
            })
        );
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_publish_with_token_passes_plaintext() {
        let client = RecordingClient::new();
        let token = client.set_secret("JSR_TOKEN", "jsr-abc").await.unwrap();
        let env = EnvContext::from_pairs([("GITHUB_SHA", "abc123")]);

        publish(&client, &PublishOptions::new().with_token(token), &env)
            .await
            .unwrap();

        let container = &client.synced()[0];
        assert_eq!(
            container.execs()[0].args,
            vec!["deno", "publish", "--token", "jsr-abc"]
        );
        assert!(container.env().is_empty());
    }

    #[tokio::test]
    async fn test_publish_without_token_forwards_identity() {
        let client = RecordingClient::new();
        let env = EnvContext::from_pairs([
            ("GITHUB_ACTIONS", "true"),
            ("ACTIONS_ID_TOKEN_REQUEST_URL", "https://oidc.example/token"),
            ("ACTIONS_ID_TOKEN_REQUEST_TOKEN", "req-token"),
            ("UNRELATED", "x"),
        ]);

        publish(&client, &PublishOptions::new(), &env).await.unwrap();

        let container = &client.synced()[0];
        assert_eq!(container.execs()[0].args, vec!["deno", "publish"]);
        assert_eq!(container.env().len(), 3);
        assert_eq!(
            container.env_value("ACTIONS_ID_TOKEN_REQUEST_TOKEN"),
            Some("req-token")
        );
        assert_eq!(container.env_value("UNRELATED"), None);
        assert!(
            container
                .env()
                .iter()
                .all(|(name, _)| OIDC_PASSTHROUGH_VARS.iter().any(|allowed| *allowed == name.as_str()))
        );
    }

    #[tokio::test]
    async fn test_deploy_defaults_match_explicit_values() {
        let client = RecordingClient::new();
        let token = client.set_secret("DENO_DEPLOY_TOKEN", "ddp").await.unwrap();

        let implicit = DeployOptions::new("site", token.clone());
        let explicit = DeployOptions::new("site", token)
            .with_dir(".")
            .with_prod(true)
            .with_entrypoint("main.ts");

        deploy(&client, &implicit).await.unwrap();
        deploy(&client, &explicit).await.unwrap();

        let synced = client.synced();
        assert_eq!(synced[0], synced[1]);
        assert_eq!(
            synced[0].execs()[0].args,
            vec!["deno", "install", "-Arf", DEPLOYCTL_URL]
        );
        assert_eq!(
            synced[0].execs()[1].args,
            vec!["deployctl", "deploy", "--project=site", "--prod", "main.ts"]
        );
        assert_eq!(
            synced[0].secret_value("DENO_DEPLOY_TOKEN").map(Secret::name),
            Some("DENO_DEPLOY_TOKEN")
        );
    }

    #[test]
    fn test_deploy_without_prod_has_no_empty_token() {
        let options = DeployOptions::new("site", Secret::new("id", "DENO_DEPLOY_TOKEN"))
            .with_prod(false)
            .with_entrypoint("server.ts");

        assert_eq!(
            options.deploy_command(),
            vec!["deployctl", "deploy", "--project=site", "server.ts"]
        );
    }

    #[tokio::test]
    async fn test_deploy_rejects_empty_project() {
        let client = RecordingClient::new();
        let options = DeployOptions::new("", Secret::new("id", "DENO_DEPLOY_TOKEN"));

        assert!(matches!(
            deploy(&client, &options).await,
            Err(PluginError::Validation(ValidationError::EmptyField { field: "project" }))
        ));
        assert!(client.synced().is_empty());
    }
}
