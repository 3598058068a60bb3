//! CI/CD tool adapters
//!
//! Each adapter turns a typed options value into a [`Container`] through a
//! pure function, then runs it with a single call on the injected
//! [`PipelineClient`].
//!
//! [`PipelineClient`]: crate::engine::PipelineClient

pub mod ambient;
pub mod biome;
pub mod cloudflare;
pub mod command;
pub mod deno;
pub mod docker;
pub mod errors;
pub mod helm;
pub mod netlify;
pub mod pulumi;
pub mod s3;
pub mod types;

use crate::engine::{Container, DirSource, DirectoryRef};

pub use ambient::{OIDC_PASSTHROUGH_VARS, ambient_identity, apply_ambient_identity};
pub use command::CommandLine;
pub use errors::{PluginError, ValidationError};
pub use types::Validate;

/// Options shared by adapters that only need a source directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOptions {
    /// Source directory, `.` by default
    pub dir: DirSource,
}

impl SourceOptions {
    /// Creates options over `dir`
    #[must_use]
    pub fn new(dir: impl Into<DirSource>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Container from `image` with `dir` mounted and selected at `/src`
pub(crate) fn mounted_source(pipeline: &str, image: &str, dir: DirectoryRef) -> Container {
    Container::new()
        .pipeline(pipeline)
        .from(image)
        .with_directory("/src", dir)
        .with_workdir("/src")
}
