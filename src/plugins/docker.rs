//! Docker image build and registry publish

use super::types::{Validate, require_non_empty};
use super::{PluginError, ValidationError};
use crate::engine::{Container, DirSource, PipelineClient, Platform, Secret};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("tag pattern is valid")
});

/// Options for building an image from a Dockerfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Build context
    pub dir: DirSource,
    /// Dockerfile path relative to the context
    pub dockerfile: String,
    /// Target platform
    pub platform: Platform,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            dir: DirSource::default(),
            dockerfile: "Dockerfile".to_string(),
            platform: Platform::LinuxAmd64,
        }
    }
}

impl BuildOptions {
    /// Sets the build context
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<DirSource>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets the Dockerfile
    #[must_use]
    pub fn with_dockerfile(mut self, dockerfile: impl Into<String>) -> Self {
        self.dockerfile = dockerfile.into();
        self
    }

    /// Sets the target platform
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

impl Validate for BuildOptions {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        require_non_empty("dockerfile", &self.dockerfile)
    }
}

/// Builds an image and returns the resulting container
///
/// The returned container can be passed to [`publish`] or extended with
/// further execs.
///
/// # Errors
///
/// Fails validation before any client call, then propagates build errors.
pub async fn build(
    client: &dyn PipelineClient,
    options: &BuildOptions,
) -> Result<Container, PluginError> {
    options.validate()?;

    let container = Container::new()
        .pipeline("build")
        .with_platform(options.platform.clone())
        .build(options.dir.resolve(client), options.dockerfile.as_str());

    tracing::info!(
        dockerfile = %options.dockerfile,
        platform = %options.platform,
        "Building image"
    );
    client.sync(&container).await?;
    Ok(container)
}

/// Options for publishing an image to a registry
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Image to publish
    pub container: Container,
    /// Target repository, e.g. `ghcr.io/acme/app`
    pub repository: String,
    /// Tags to push, in order
    pub tags: Vec<String>,
    /// Registry user
    pub username: String,
    /// Registry password
    pub password: Secret,
    /// Per-platform images published under one manifest list
    pub platform_variants: Vec<Container>,
}

impl PublishOptions {
    /// Creates options that push `latest` to Docker Hub
    #[must_use]
    pub fn new(container: Container, username: impl Into<String>, password: Secret) -> Self {
        Self {
            container,
            repository: "docker.io".to_string(),
            tags: vec!["latest".to_string()],
            username: username.into(),
            password,
            platform_variants: Vec::new(),
        }
    }

    /// Sets the target repository
    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    /// Replaces the tags
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the per-platform variants
    #[must_use]
    pub fn with_platform_variants(mut self, variants: Vec<Container>) -> Self {
        self.platform_variants = variants;
        self
    }

    /// Full image references, one per tag
    #[must_use]
    pub fn addresses(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|tag| format!("{}:{tag}", self.repository))
            .collect()
    }
}

impl Validate for PublishOptions {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        require_non_empty("repository", &self.repository)?;
        require_non_empty("username", &self.username)?;
        if self.tags.is_empty() {
            return Err(ValidationError::NoTags);
        }
        if let Some(tag) = self.tags.iter().find(|tag| !TAG_PATTERN.is_match(tag)) {
            return Err(ValidationError::InvalidTag { tag: tag.clone() });
        }
        Ok(())
    }
}

/// Publishes the image once per tag, sequentially
///
/// Returns the pushed references in tag order.
///
/// # Errors
///
/// Fails with [`ValidationError::NoTags`] before contacting any registry
/// when the tag list is empty. Stops at the first failed push.
pub async fn publish(
    client: &dyn PipelineClient,
    options: &PublishOptions,
) -> Result<Vec<String>, PluginError> {
    options.validate()?;

    let container = options.container.clone().with_registry_auth(
        options.repository.as_str(),
        options.username.as_str(),
        options.password.clone(),
    );

    let mut published = Vec::with_capacity(options.tags.len());
    for address in options.addresses() {
        tracing::info!(address = %address, variants = options.platform_variants.len(), "Publishing image");
        let reference = client
            .publish(&container, &address, &options.platform_variants)
            .await?;
        published.push(reference);
    }
    Ok(published)
}
