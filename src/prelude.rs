//! Prelude module for common imports

// Engine handles and the client trait
pub use crate::engine::{
    BaseImage, Container, DirSource, DirectoryRef, ExecOptions, ExecOutput, PipelineClient,
    Platform, Secret,
};

// Adapter plumbing
pub use crate::plugins::{
    CommandLine, PluginError, SourceOptions, Validate, ValidationError, apply_ambient_identity,
};

// Secrets and environment
pub use crate::infrastructure::{Config, ContainerCliClient, ContainerRuntime, EnvContext};
pub use crate::secrets::{InfisicalClient, InfisicalSettings, SecretBackend, SecretStore};
