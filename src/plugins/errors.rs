//! Error types for plugin operations

use thiserror::Error;

/// Errors that can occur while preparing or running a plugin
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// Options failed validation before any client call
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A required credential or identifier was not provided
    #[error("No {credential} provided")]
    MissingCredential {
        /// Human readable name of the missing credential.
        credential: String,
    },

    /// The secret store answered without a usable value for a secret
    #[error("No secret found for {name}")]
    MissingSecret {
        /// Name of the requested secret.
        name: String,
    },

    /// An HTTP call returned a non-success status
    #[error("{operation} returned HTTP {status}")]
    HttpStatus {
        /// Operation that issued the request.
        operation: String,
        /// Response status code.
        status: u16,
    },

    /// An HTTP call could not be completed
    #[error("{operation} failed: {reason}")]
    Transport {
        /// Operation that issued the request.
        operation: String,
        /// Underlying transport error.
        reason: String,
    },

    /// A response body did not have the expected shape
    #[error("Unexpected response from {operation}: {reason}")]
    ResponseShape {
        /// Operation that issued the request.
        operation: String,
        /// What was wrong with the body.
        reason: String,
    },

    /// A containerized command exited unsuccessfully
    #[error("{operation} failed with exit code {code}: {stderr}")]
    CommandFailed {
        /// Operation that ran the command.
        operation: String,
        /// Exit code returned by the command.
        code: i32,
        /// Standard error output from the command.
        stderr: String,
    },

    /// A secret handle is not known to the client that received it
    #[error("Unknown secret handle: {0}")]
    UnknownSecret(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PluginError {
    /// Builds a [`PluginError::MissingCredential`]
    #[must_use]
    pub fn missing_credential(credential: impl Into<String>) -> Self {
        Self::MissingCredential {
            credential: credential.into(),
        }
    }

    /// Wraps a transport error with the name of the failed operation
    #[must_use]
    pub fn transport(operation: impl Into<String>, err: &impl std::fmt::Display) -> Self {
        Self::Transport {
            operation: operation.into(),
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for PluginError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Validation errors for plugin options
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// A publish was requested without any tag
    #[error("Failed to publish: no tags provided")]
    NoTags,

    /// A tag does not follow the registry tag grammar
    #[error("Invalid image tag: '{tag}'")]
    InvalidTag {
        /// The rejected tag.
        tag: String,
    },

    /// A container has neither a base image nor a build step
    #[error("Container has no base image")]
    MissingImage,

    /// A platform string could not be parsed
    #[error("Invalid platform: '{0}'")]
    InvalidPlatform(String),
}
