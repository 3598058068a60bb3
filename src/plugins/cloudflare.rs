//! Cloudflare Pages deployment through `wrangler`

use super::command::CommandLine;
use super::types::{Validate, require_non_empty};
use super::{PluginError, ValidationError};
use crate::engine::{Container, DirSource, DirectoryRef, ExecOutput, PipelineClient, Secret};

/// Image shipping the `wrangler` CLI
pub const WRANGLER_IMAGE: &str = "michaelmass/wrangler:0.0.4";

/// Cloudflare account credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudflareAuth {
    /// API token
    pub api_token: Secret,
    /// Account id
    pub account_id: Secret,
}

impl CloudflareAuth {
    /// Creates credentials from secret handles
    #[must_use]
    pub fn new(api_token: Secret, account_id: Secret) -> Self {
        Self {
            api_token,
            account_id,
        }
    }

    fn apply(&self, container: Container) -> Container {
        container
            .with_secret_variable("CLOUDFLARE_ACCOUNT_ID", self.account_id.clone())
            .with_secret_variable("CLOUDFLARE_API_TOKEN", self.api_token.clone())
    }
}

/// Options for `wrangler pages deploy`
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Directory to deploy
    pub dir: DirSource,
    /// Pages project name
    pub project: String,
    /// Branch to deploy to
    pub branch: Option<String>,
    /// Commit SHA attached to the deployment
    pub commit_hash: Option<String>,
    /// Commit message attached to the deployment
    pub commit_message: Option<String>,
    /// Mark the workspace as dirty
    pub commit_dirty: bool,
    /// Account credentials
    pub auth: CloudflareAuth,
}

impl UploadOptions {
    /// Creates upload options for `project`
    #[must_use]
    pub fn new(project: impl Into<String>, auth: CloudflareAuth) -> Self {
        Self {
            dir: DirSource::default(),
            project: project.into(),
            branch: None,
            commit_hash: None,
            commit_message: None,
            commit_dirty: false,
            auth,
        }
    }

    /// Sets the deployed directory
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<DirSource>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets the branch
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Sets the commit hash
    #[must_use]
    pub fn with_commit_hash(mut self, hash: impl Into<String>) -> Self {
        self.commit_hash = Some(hash.into());
        self
    }

    /// Sets the commit message
    #[must_use]
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }

    /// Marks the workspace as dirty
    #[must_use]
    pub fn with_commit_dirty(mut self, dirty: bool) -> Self {
        self.commit_dirty = dirty;
        self
    }

    /// Arguments of the `wrangler pages deploy` call
    #[must_use]
    pub fn command(&self) -> Vec<String> {
        CommandLine::new(["wrangler", "pages", "deploy", "."])
            .option("--project-name", Some(&self.project))
            .option("--branch", self.branch.as_ref())
            .option("--commit-hash", self.commit_hash.as_ref())
            .option("--commit-message", self.commit_message.as_ref())
            .switch("--commit-dirty", self.commit_dirty)
            .build()
    }

    /// Builds the upload container over `dir`
    #[must_use]
    pub fn container(&self, dir: DirectoryRef) -> Container {
        self.auth
            .apply(Container::new().pipeline("upload").from(WRANGLER_IMAGE))
            .with_directory("/src", dir)
            .with_workdir("/src")
            .with_exec(self.command())
    }
}

impl Validate for UploadOptions {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        require_non_empty("project", &self.project)
    }
}

/// Deploys a directory to Cloudflare Pages
///
/// # Errors
///
/// Fails validation before any client call, then propagates client errors.
pub async fn upload(
    client: &dyn PipelineClient,
    options: &UploadOptions,
) -> Result<ExecOutput, PluginError> {
    options.validate()?;
    tracing::info!(
        project = %options.project,
        branch = options.branch.as_deref().unwrap_or("<default>"),
        "Uploading to Cloudflare Pages"
    );
    client.sync(&options.container(options.dir.resolve(client))).await
}

/// Runs `wrangler whoami` to check the credentials
///
/// # Errors
///
/// Propagates client errors.
pub async fn whoami(
    client: &dyn PipelineClient,
    auth: &CloudflareAuth,
) -> Result<ExecOutput, PluginError> {
    let container = auth
        .apply(Container::new().pipeline("whoami").from(WRANGLER_IMAGE))
        .with_exec(["wrangler", "whoami"]);
    client.sync(&container).await
}
