//! TabBox Settings Crate
//!
//! Box configuration files (JSON or TOML) and output preferences.

pub mod config;
pub mod error;

pub use config::{
    config_dir, default_config_path, BoxConfig, MeasurementSystem, OutputFormat, OutputSettings,
};
pub use error::{SettingsError, SettingsResult};
