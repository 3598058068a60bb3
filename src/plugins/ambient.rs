//! Ambient credential passthrough
//!
//! When a publish runs without an explicit token, the CI job's identity
//! variables are copied into the container so the invoked CLI can perform
//! its own OIDC token exchange. Missing variables are skipped; whether the
//! exchange can succeed is left to the CLI.

use crate::engine::Container;
use crate::infrastructure::EnvContext;

/// CI identity variables forwarded when no explicit token is given
pub const OIDC_PASSTHROUGH_VARS: &[&str] = &[
    "GITHUB_ACTIONS",
    "ACTIONS_ID_TOKEN_REQUEST_URL",
    "ACTIONS_ID_TOKEN_REQUEST_TOKEN",
    "GITHUB_REPOSITORY",
    "GITHUB_REPOSITORY_ID",
    "GITHUB_REPOSITORY_OWNER",
    "GITHUB_REPOSITORY_OWNER_ID",
    "GITHUB_REF",
    "GITHUB_SHA",
    "GITHUB_RUN_ID",
    "GITHUB_WORKFLOW_REF",
];

/// Returns the allow-listed variables present in `env`, in allow-list order
#[must_use]
pub fn ambient_identity(env: &EnvContext) -> Vec<(&'static str, String)> {
    OIDC_PASSTHROUGH_VARS
        .iter()
        .filter_map(|name| env.get(name).map(|value| (*name, value.to_string())))
        .collect()
}

/// Copies the ambient identity variables into the container environment
#[must_use]
pub fn apply_ambient_identity(container: Container, env: &EnvContext) -> Container {
    let identity = ambient_identity(env);
    tracing::debug!(
        forwarded = identity.len(),
        allowed = OIDC_PASSTHROUGH_VARS.len(),
        "Forwarding ambient CI identity"
    );

    identity
        .into_iter()
        .fold(container, |container, (name, value)| {
            container.with_env_variable(name, value)
        })
}
