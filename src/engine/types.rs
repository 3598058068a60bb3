//! Handle and value types shared by the engine and plugins

#![allow(clippy::must_use_candidate)]

use crate::plugins::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::PipelineClient;

/// Opaque reference to a directory known to a pipeline client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryRef {
    id: String,
}

impl DirectoryRef {
    /// Creates a directory reference from a client-specific id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Client-specific id of this directory
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Where a plugin takes its source tree from
///
/// Either a host path, which the client turns into a directory, or a
/// directory handle the caller already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirSource {
    /// A path on the host running the pipeline
    Path(PathBuf),
    /// A directory already known to the client
    Handle(DirectoryRef),
}

impl DirSource {
    /// Normalizes the source into a directory handle
    pub fn resolve(&self, client: &dyn PipelineClient) -> DirectoryRef {
        match self {
            Self::Path(path) => client.host_directory(path),
            Self::Handle(dir) => dir.clone(),
        }
    }
}

impl Default for DirSource {
    fn default() -> Self {
        Self::Path(PathBuf::from("."))
    }
}

impl From<&str> for DirSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<PathBuf> for DirSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<DirectoryRef> for DirSource {
    fn from(dir: DirectoryRef) -> Self {
        Self::Handle(dir)
    }
}

/// Opaque reference to a secret registered with a pipeline client
///
/// Holds no plaintext; only the client that issued it can resolve it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Secret {
    id: String,
    name: String,
}

impl Secret {
    /// Creates a secret handle; called by client implementations
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Client-specific id of this secret
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name the secret was registered under
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Target platform for container builds
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Platform {
    /// `linux/amd64`
    #[default]
    LinuxAmd64,
    /// `linux/arm64`
    LinuxArm64,
    /// `linux/arm/v7`
    LinuxArmV7,
    /// Any other `os/arch[/variant]` string
    Custom(String),
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinuxAmd64 => write!(f, "linux/amd64"),
            Self::LinuxArm64 => write!(f, "linux/arm64"),
            Self::LinuxArmV7 => write!(f, "linux/arm/v7"),
            Self::Custom(platform) => write!(f, "{platform}"),
        }
    }
}

impl FromStr for Platform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linux/amd64" => Ok(Self::LinuxAmd64),
            "linux/arm64" => Ok(Self::LinuxArm64),
            "linux/arm/v7" => Ok(Self::LinuxArmV7),
            other => {
                let parts: Vec<&str> = other.split('/').collect();
                if (2..=3).contains(&parts.len()) && parts.iter().all(|p| !p.is_empty()) {
                    Ok(Self::Custom(other.to_string()))
                } else {
                    Err(ValidationError::InvalidPlatform(other.to_string()))
                }
            }
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.to_string()
    }
}

impl TryFrom<String> for Platform {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Output of a synced container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Standard output of the last command
    pub stdout: String,

    /// Standard error of the last command
    pub stderr: String,

    /// Exit code of the last command
    pub exit_code: i32,
}

impl ExecOutput {
    /// Returns true if the last command exited with 0
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
