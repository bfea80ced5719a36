//! Configuration file support for bom-reconcile.
//!
//! Provides YAML-based configuration through `bom-reconcile.config.yml` files,
//! including data structures, file loading, token overrides and validation.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::application::dto::MAX_CONCURRENCY;
use crate::shared::error::ReconcileError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "bom-reconcile.config.yml";

pub const ARTIFACTORY_TOKEN_ENV: &str = "ARTIFACTORY_TOKEN";
pub const REGISTRY_TOKEN_ENV: &str = "SW360_TOKEN";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub artifactory: Option<ArtifactoryConfig>,
    pub registry: Option<RegistryConfig>,
    pub concurrency: Option<usize>,
    pub dry_run: Option<bool>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Artifact repository connection and the repositories searched for origins.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ArtifactoryConfig {
    pub url: String,
    pub token: Option<String>,
    /// Repositories whose hits mark a component as internal.
    #[serde(default)]
    pub internal_repos: Vec<String>,
    #[serde(default)]
    pub remote_repos: Vec<String>,
}

/// Component registry connection.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RegistryConfig {
    pub url: String,
    pub token: Option<String>,
}

impl ConfigFile {
    /// Fills tokens from the environment where the file leaves them unset.
    ///
    /// The lookup is injected so tests do not have to touch process state.
    pub fn with_env_tokens<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(artifactory) = self.artifactory.as_mut() {
            if artifactory.token.is_none() {
                artifactory.token = lookup(ARTIFACTORY_TOKEN_ENV);
            }
        }
        if let Some(registry) = self.registry.as_mut() {
            if registry.token.is_none() {
                registry.token = lookup(REGISTRY_TOKEN_ENV);
            }
        }
        self
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(artifactory) = &config.artifactory {
        if artifactory.url.trim().is_empty() {
            return Err(invalid(
                "artifactory.url must not be empty",
                "Set it to the base URL of the artifact repository (e.g., https://artifactory.example.com/artifactory).",
            ));
        }
        if let Some(i) = artifactory
            .internal_repos
            .iter()
            .chain(&artifactory.remote_repos)
            .position(|r| r.trim().is_empty())
        {
            return Err(invalid(
                &format!("repository entry #{} is empty", i + 1),
                "Remove blank entries from internal_repos and remote_repos.",
            ));
        }
    }

    if let Some(registry) = &config.registry {
        if registry.url.trim().is_empty() {
            return Err(invalid(
                "registry.url must not be empty",
                "Set it to the registry REST base URL (e.g., https://sw360.example.com/resource/api).",
            ));
        }
    }

    if let Some(concurrency) = config.concurrency {
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            return Err(invalid(
                &format!("concurrency must be between 1 and {}, got {}", MAX_CONCURRENCY, concurrency),
                "Lower values are gentler on the registry; 8 is the default.",
            ));
        }
    }

    Ok(())
}

fn invalid(details: &str, hint: &str) -> anyhow::Error {
    ReconcileError::InvalidConfig {
        details: details.to_string(),
        hint: hint.to_string(),
    }
    .into()
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "unknown config field will be ignored");
    }
}
