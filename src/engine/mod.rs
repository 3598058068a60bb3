//! Pipeline engine abstraction
//!
//! This module contains the client trait plugins run against and the
//! immutable values they hand to it.

mod container;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod recording;

pub use container::{BaseImage, BuildSpec, Container, Exec, ExecOptions, RegistryAuth};
pub use traits::PipelineClient;
pub use types::{DirSource, DirectoryRef, ExecOutput, Platform, Secret};
