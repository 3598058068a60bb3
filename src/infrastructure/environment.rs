//! Ambient environment snapshot
//!
//! The process environment is read once at the boundary and passed around
//! as an [`EnvContext`], so nothing below the CLI reads `std::env` directly.

use std::collections::HashMap;

/// Read-only snapshot of environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvContext {
    vars: HashMap<String, String>,
}

impl EnvContext {
    /// Captures the current process environment
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Builds a context from explicit pairs
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Gets a variable
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Gets a variable, treating an empty value as unset
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }
}
