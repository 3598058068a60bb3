//! Infrastructure layer
//!
//! Process environment, configuration, logging and the container CLI client.

mod config;
pub mod container;
mod environment;
mod logging;

pub use config::Config;
pub use container::{ContainerCliClient, ContainerRuntime};
pub use environment::EnvContext;
pub use logging::init_logging;
