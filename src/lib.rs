//! # TabBox
//!
//! Generates laser and CNC cut paths for boxes joined with interlocking
//! tabs (finger joints).
//!
//! ## Architecture
//!
//! TabBox is organized as a workspace with multiple crates:
//!
//! 1. **tabbox-core** - Points, paths, circles, bounds and unit conversion
//! 2. **tabbox-camtools** - Edge generator, panel assembler, box composer, SVG and G-code export
//! 3. **tabbox-settings** - JSON/TOML box configuration files
//! 4. **tabbox** - Command-line binary that ties them together
//!
//! ## Features
//!
//! - **Box types**: full box or any of five open variants
//! - **Dividers**: length and width dividers, optionally keyed into walls and floor
//! - **Joint options**: fixed or equal tabs, three symmetry modes, dogbone relief, dimples
//! - **Schroff**: rack subrack cases with rail mounting holes
//! - **Kerf compensation**: tabs and slots corrected for beam or bit width

pub mod cli;

pub use tabbox_camtools::{
    BoxLayout, BoxParameters, BoxType, CamToolError, ConstraintError, GcodeSettings,
    KeyDividerType, LayoutStyle, Panel, SchroffSettings, SvgOptions, TabSymmetry, TabType,
    TabbedBoxMaker, ValidationErrors,
};
pub use tabbox_core::{Bounds, Circle, MeasurementSystem, Path, Point};
pub use tabbox_settings::{BoxConfig, OutputFormat, OutputSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Logs go to stderr so generated output can be piped from stdout.
/// `RUST_LOG` overrides the default `info` level. With `json` set, each
/// event is written as one JSON object per line.
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
