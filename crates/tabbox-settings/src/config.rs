//! Box configuration files
//!
//! A [`BoxConfig`] holds everything needed to reproduce one box: the
//! generator parameters in the user's units plus output preferences.
//! Files are JSON or TOML, chosen by extension, and are validated on both
//! load and save.

pub use tabbox_core::units::MeasurementSystem;
use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tabbox_camtools::tabbed_box::{validate, BoxParameters, GcodeSettings, SvgOptions};
use tracing::debug;

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "tabbox";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// What the generator writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Gcode,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Gcode => "gcode",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "gcode" | "nc" | "ngc" => Ok(OutputFormat::Gcode),
            "json" => Ok(OutputFormat::Json),
            other => Err(SettingsError::InvalidSetting {
                key: "output.format".to_string(),
                reason: format!("unknown format '{other}'"),
            }),
        }
    }
}

/// Output preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub svg: SvgOptions,
    pub gcode: GcodeSettings,
}

/// Complete box configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    /// Units of every length in `box_params` except the Schroff rack values,
    /// which are always millimetres.
    pub units: MeasurementSystem,
    #[serde(rename = "box")]
    pub box_params: BoxParameters,
    pub output: OutputSettings,
}

impl BoxConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator parameters converted to millimetres.
    pub fn to_parameters(&self) -> BoxParameters {
        let u = self.units;
        let p = &self.box_params;
        BoxParameters {
            length: u.to_mm(p.length),
            width: u.to_mm(p.width),
            height: u.to_mm(p.height),
            thickness: u.to_mm(p.thickness),
            kerf: u.to_mm(p.kerf),
            tab: u.to_mm(p.tab),
            dimple_height: u.to_mm(p.dimple_height),
            dimple_length: u.to_mm(p.dimple_length),
            spacing: u.to_mm(p.spacing),
            ..p.clone()
        }
    }

    /// Check that the configured box can be generated.
    pub fn validate(&self) -> SettingsResult<()> {
        validate(&self.to_parameters())?;
        let feed = self.output.gcode.feed_rate;
        if !feed.is_finite() || feed <= 0.0 {
            return Err(SettingsError::InvalidSetting {
                key: "output.gcode.feed_rate".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded box config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        debug!("Saved box config to {}", path.display());
        Ok(())
    }
}

enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            other => Err(SettingsError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                other.unwrap_or("no extension")
            ))),
        }
    }
}

/// Platform config directory for TabBox, falling back to the home directory.
pub fn config_dir() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|p| p.join(APP_DIR_NAME))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("no config or home directory available".to_string())
        })
}

pub fn default_config_path() -> SettingsResult<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
