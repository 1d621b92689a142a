//! Application configuration module.
//!
//! Manages TOML-based config files for collection and default-filter
//! settings, plus config/data directory resolution.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, CollectionConfig, DefaultsConfig};
pub use paths::{resolve_config_path, resolve_data_dir, resolve_snapshot_path};
