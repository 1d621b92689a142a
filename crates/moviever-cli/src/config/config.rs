//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Remote collection settings.
    #[serde(default)]
    pub collection: CollectionConfig,
    /// Default thresholds for the `top` subcommand.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Remote collection configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CollectionConfig {
    /// Upper bound on discover pages fetched per collection run.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Response language for genre names.
    #[serde(default = "default_language")]
    pub language: String,
}

/// Default filter thresholds for hidden-gem ranking.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    /// Minimum rating a gem must reach.
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
    /// Popularity ceiling; anything above is no longer hidden.
    #[serde(default = "default_max_popularity")]
    pub max_popularity: f64,
    /// Minimum vote count for a trustworthy rating.
    #[serde(default = "default_min_vote_count")]
    pub min_vote_count: u64,
    /// How many gems to show.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

const fn default_max_pages() -> u32 {
    500
}

fn default_language() -> String {
    String::from("en-US")
}

const fn default_min_rating() -> f64 {
    7.5
}

const fn default_max_popularity() -> f64 {
    20.0
}

const fn default_min_vote_count() -> u64 {
    50
}

const fn default_top_n() -> usize {
    50
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            language: default_language(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            min_rating: default_min_rating(),
            max_popularity: default_max_popularity(),
            min_vote_count: default_min_vote_count(),
            top_n: default_top_n(),
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
