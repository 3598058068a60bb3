//! S3 bucket sync with optional CloudFront invalidation

use super::command::CommandLine;
use super::types::{Validate, require_non_empty};
use super::{PluginError, ValidationError, mounted_source};
use crate::engine::{Container, DirSource, DirectoryRef, ExecOptions, ExecOutput, PipelineClient, Secret};

/// Image shipping the `aws` CLI
pub const AWS_CLI_IMAGE: &str = "amazon/aws-cli";

/// Access key pair for the AWS CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    /// `AWS_ACCESS_KEY_ID`
    pub access_key_id: Secret,
    /// `AWS_SECRET_ACCESS_KEY`
    pub secret_access_key: Secret,
}

impl AwsCredentials {
    /// Creates credentials from secret handles
    #[must_use]
    pub fn new(access_key_id: Secret, secret_access_key: Secret) -> Self {
        Self {
            access_key_id,
            secret_access_key,
        }
    }
}

/// Options for syncing a directory into a bucket
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Directory to upload
    pub dir: DirSource,
    /// Bucket name
    pub bucket: String,
    /// Key prefix inside the bucket, without leading or trailing slashes
    pub prefix: String,
    /// AWS region
    pub region: String,
    /// CloudFront distribution to invalidate after the sync
    pub cloudfront_distribution: Option<String>,
    /// Access keys
    pub credentials: AwsCredentials,
}

impl UploadOptions {
    /// Creates upload options for `bucket` in `us-east-1`
    #[must_use]
    pub fn new(bucket: impl Into<String>, credentials: AwsCredentials) -> Self {
        Self {
            dir: DirSource::default(),
            bucket: bucket.into(),
            prefix: String::new(),
            region: "us-east-1".to_string(),
            cloudfront_distribution: None,
            credentials,
        }
    }

    /// Sets the uploaded directory
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<DirSource>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets the key prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.prefix = prefix.as_ref().trim_matches('/').to_string();
        self
    }

    /// Sets the region
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Invalidates `distribution` once the sync succeeds
    #[must_use]
    pub fn with_cloudfront_distribution(mut self, distribution: impl Into<String>) -> Self {
        self.cloudfront_distribution = Some(distribution.into());
        self
    }

    /// `s3://` destination of the sync
    #[must_use]
    pub fn destination(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.prefix)
    }

    /// Paths invalidated in CloudFront
    #[must_use]
    pub fn invalidation_paths(&self) -> String {
        if self.prefix.is_empty() {
            "/*".to_string()
        } else {
            format!("/{}/*", self.prefix)
        }
    }

    /// Builds the upload container over `dir`
    #[must_use]
    pub fn container(&self, dir: DirectoryRef) -> Container {
        let sync = CommandLine::new(["aws", "s3", "sync", "."])
            .arg(self.destination())
            .arg("--delete")
            .build();

        let container = mounted_source("upload", AWS_CLI_IMAGE, dir)
            .with_secret_variable("AWS_ACCESS_KEY_ID", self.credentials.access_key_id.clone())
            .with_secret_variable(
                "AWS_SECRET_ACCESS_KEY",
                self.credentials.secret_access_key.clone(),
            )
            .with_env_variable("AWS_REGION", self.region.as_str())
            .with_exec_opts(sync, ExecOptions::skip_entrypoint());

        match self
            .cloudfront_distribution
            .as_deref()
            .filter(|id| !id.is_empty())
        {
            Some(distribution) => {
                let invalidate = CommandLine::new(["aws", "cloudfront", "create-invalidation"])
                    .option("--distribution-id", Some(distribution))
                    .option("--paths", Some(self.invalidation_paths()))
                    .build();
                container.with_exec_opts(invalidate, ExecOptions::skip_entrypoint())
            }
            None => container,
        }
    }
}

impl Validate for UploadOptions {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        require_non_empty("bucket", &self.bucket)?;
        require_non_empty("region", &self.region)
    }
}

/// Syncs a directory into the bucket, deleting stale keys
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
        destination = %options.destination(),
        region = %options.region,
        invalidate = options.cloudfront_distribution.is_some(),
        "Uploading to S3"
    );
    client.sync(&options.container(options.dir.resolve(client))).await
}
