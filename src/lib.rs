//! # Rigging - container-based CI/CD plugins
//!
//! Rigging wraps common delivery tools (biome, deno, wrangler, docker, helm,
//! the Netlify and AWS CLIs, pulumi) as typed async operations. Each
//! operation describes a [`Container`] and hands it to an injected
//! [`PipelineClient`], which decides how and where it actually runs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rigging::infrastructure::{ContainerCliClient, ContainerRuntime};
//! use rigging::plugins::{SourceOptions, biome};
//!
//! # async fn lint() -> Result<(), rigging::plugins::PluginError> {
//! let client = ContainerCliClient::new(ContainerRuntime::Docker);
//! biome::lint(&client, &SourceOptions::new("web")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Adapters**: linters, formatters, deployers and image publishing
//! - **Secrets**: Infisical lookups bound as opaque [`Secret`] handles
//! - **Ambient identity**: CI OIDC variables forwarded when no token is given
//! - **Runtimes**: Docker or Podman through [`ContainerCliClient`]
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <https://www.apache.org/licenses/LICENSE-2.0>)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or <https://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod engine;
pub mod infrastructure;
pub mod plugins;
pub mod secrets;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use engine::{Container, DirSource, DirectoryRef, ExecOutput, PipelineClient, Platform, Secret};
pub use infrastructure::{Config, ContainerCliClient, ContainerRuntime, EnvContext};
pub use plugins::{CommandLine, PluginError, SourceOptions, Validate, ValidationError};
pub use secrets::{InfisicalClient, InfisicalSettings, SecretBackend, SecretStore};

/// Version of the rigging crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
