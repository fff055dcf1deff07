//! Configuration types for Cairn

use crate::error::CairnResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the batch import pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Records per reconciliation batch handed to the engine
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Collection name for active clustered variants
    #[serde(default = "default_clustered_collection")]
    pub clustered_collection: String,
    /// Collection name for active submitted variants
    #[serde(default = "default_submitted_collection")]
    pub submitted_collection: String,
    /// Collection name for the declustered clustered-variant archive
    #[serde(default = "default_declustered_collection")]
    pub declustered_collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directive for the env-filter, e.g. "cairn_import=debug"
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default value functions
fn default_chunk_size() -> usize {
    1000
}
fn default_clustered_collection() -> String {
    "clusteredVariantEntity".to_string()
}
fn default_submitted_collection() -> String {
    "submittedVariantEntity".to_string()
}
fn default_declustered_collection() -> String {
    "clusteredVariantEntityDeclustered".to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            clustered_collection: default_clustered_collection(),
            submitted_collection: default_submitted_collection(),
            declustered_collection: default_declustered_collection(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> CairnResult<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

/// Save configuration to a TOML file
pub fn save_config(config: &Config, path: &Path) -> CairnResult<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
