//! Infisical REST client
//!
//! Reads raw secrets through `GET /api/v3/secrets/raw[/{name}]`
//! authenticated with a bearer token.

use super::SecretBackend;
use crate::infrastructure::EnvContext;
use crate::plugins::PluginError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Public Infisical API
pub const DEFAULT_API_URL: &str = "https://app.infisical.com";

/// Connection settings for an Infisical project
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfisicalSettings {
    /// Base URL of the API
    pub api_url: String,

    /// Environment slug, e.g. `production`
    pub environment: String,

    /// Project (workspace) id
    pub workspace_id: Option<String>,

    /// Service token; never written back to config files
    #[serde(skip)]
    pub token: Option<String>,

    /// Secret path used when a call does not give one
    pub default_secret_path: String,
}

impl Default for InfisicalSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            environment: "production".to_string(),
            workspace_id: None,
            token: None,
            default_secret_path: "/".to_string(),
        }
    }
}

impl std::fmt::Debug for InfisicalSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfisicalSettings")
            .field("api_url", &self.api_url)
            .field("environment", &self.environment)
            .field("workspace_id", &self.workspace_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("default_secret_path", &self.default_secret_path)
            .finish()
    }
}

impl InfisicalSettings {
    /// Overlays `INFISICAL_ENVIRONMENT`, `INFISICAL_TOKEN`,
    /// `INFISICAL_WORKSPACE_ID` and `INFISICAL_API_URL`
    #[must_use]
    pub fn with_env(mut self, env: &EnvContext) -> Self {
        if let Some(environment) = env.get_non_empty("INFISICAL_ENVIRONMENT") {
            self.environment = environment.to_string();
        }
        if let Some(token) = env.get_non_empty("INFISICAL_TOKEN") {
            self.token = Some(token.to_string());
        }
        if let Some(workspace_id) = env.get_non_empty("INFISICAL_WORKSPACE_ID") {
            self.workspace_id = Some(workspace_id.to_string());
        }
        if let Some(api_url) = env.get_non_empty("INFISICAL_API_URL") {
            self.api_url = api_url.to_string();
        }
        self
    }

    /// Returns true if both the token and the workspace id are set
    #[must_use]
    pub fn is_configured(&self) -> bool {
        non_empty(self.token.as_deref()).is_some()
            && non_empty(self.workspace_id.as_deref()).is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Prefixes `path` with `/` when it does not start with one
#[must_use]
pub fn normalize_secret_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSecret {
    secret_key: String,
    secret_value: String,
}

#[derive(Debug, Deserialize)]
struct RawSecretList {
    #[serde(default)]
    secrets: Option<Vec<RawSecret>>,
}

/// Extracts `secret.secretValue` from a single-secret response
///
/// # Errors
///
/// Returns [`PluginError::MissingSecret`] if the field is absent or not a string.
pub fn parse_secret_value(name: &str, body: &serde_json::Value) -> Result<String, PluginError> {
    body.get("secret")
        .and_then(|secret| secret.get("secretValue"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PluginError::MissingSecret {
            name: name.to_string(),
        })
}

/// Reduces a list response to a key to value map
///
/// An absent or null `secrets` array yields an empty map. Later duplicates
/// overwrite earlier ones.
///
/// # Errors
///
/// Returns [`PluginError::ResponseShape`] if the body is not an object or an
/// entry lacks `secretKey`/`secretValue` strings.
pub fn parse_secret_list(body: serde_json::Value) -> Result<BTreeMap<String, String>, PluginError> {
    let list: RawSecretList =
        serde_json::from_value(body).map_err(|e| PluginError::ResponseShape {
            operation: "list secrets".to_string(),
            reason: e.to_string(),
        })?;

    Ok(list
        .secrets
        .unwrap_or_default()
        .into_iter()
        .map(|secret| (secret.secret_key, secret.secret_value))
        .collect())
}

/// HTTP client for the Infisical raw secrets API
#[derive(Clone)]
pub struct InfisicalClient {
    http: reqwest::Client,
    base_url: Url,
    environment: String,
    workspace_id: String,
    token: String,
    default_secret_path: String,
}

impl std::fmt::Debug for InfisicalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfisicalClient")
            .field("base_url", &self.base_url.as_str())
            .field("environment", &self.environment)
            .field("workspace_id", &self.workspace_id)
            .finish_non_exhaustive()
    }
}

impl InfisicalClient {
    /// Creates a client after checking credentials
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::MissingCredential`] if the token or the
    /// workspace id is missing, and [`PluginError::Config`] if the API URL
    /// cannot be parsed. No request is made.
    pub fn new(settings: &InfisicalSettings) -> Result<Self, PluginError> {
        let token = non_empty(settings.token.as_deref())
            .ok_or_else(|| PluginError::missing_credential("infisical token"))?;
        let workspace_id = non_empty(settings.workspace_id.as_deref())
            .ok_or_else(|| PluginError::missing_credential("infisical workspace id"))?;

        let base_url = Url::parse(&settings.api_url)
            .map_err(|e| PluginError::Config(format!("invalid infisical url: {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            environment: settings.environment.clone(),
            workspace_id: workspace_id.to_string(),
            token: token.to_string(),
            default_secret_path: settings.default_secret_path.clone(),
        })
    }

    /// Secret path used when a call does not give one
    #[must_use]
    pub fn default_secret_path(&self) -> &str {
        &self.default_secret_path
    }

    /// Builds the request URL for one secret (`Some(name)`) or a whole path
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Config`] if the base URL cannot hold a path.
    pub fn secrets_url(&self, name: Option<&str>, secret_path: &str) -> Result<Url, PluginError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| PluginError::Config("infisical url cannot be a base".to_string()))?;
            segments.pop_if_empty().extend(["api", "v3", "secrets", "raw"]);
            if let Some(name) = name {
                segments.push(name);
            }
        }
        url.query_pairs_mut()
            .append_pair("environment", &self.environment)
            .append_pair("workspaceId", &self.workspace_id)
            .append_pair("secretPath", &normalize_secret_path(secret_path));
        Ok(url)
    }

    async fn fetch_json(&self, operation: &str, url: Url) -> Result<serde_json::Value, PluginError> {
        tracing::debug!(operation, path = %url.path(), "Requesting infisical");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| PluginError::transport(operation, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PluginError::HttpStatus {
                operation: operation.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| PluginError::ResponseShape {
                operation: operation.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl SecretBackend for InfisicalClient {
    async fn get_secret(&self, name: &str, secret_path: &str) -> Result<String, PluginError> {
        let url = self.secrets_url(Some(name), secret_path)?;
        match self.fetch_json("get secret", url).await {
            Ok(body) => parse_secret_value(name, &body),
            Err(PluginError::HttpStatus { status: 404, .. }) => Err(PluginError::MissingSecret {
                name: name.to_string(),
            }),
            Err(err) => Err(err),
        }
    }

    async fn list_secrets(&self, secret_path: &str) -> Result<BTreeMap<String, String>, PluginError> {
        let url = self.secrets_url(None, secret_path)?;
        let body = self.fetch_json("list secrets", url).await?;
        parse_secret_list(body)
    }
}
