//! Command-line front end
//!
//! Every option is optional. Values start from the config file (or the
//! built-in defaults) and each flag given on the command line overrides
//! the matching field.

use anyhow::{Context, Result};
use clap::{Args, Parser};
use std::io::Write;
use std::path::{Path, PathBuf};
use tabbox_camtools::tabbed_box::{
    BoxLayout, BoxType, KeyDividerType, LayoutStyle, SchroffSettings, TabSymmetry, TabType,
    TabbedBoxMaker,
};
use tabbox_core::units::{format_length, parse_length};
use tabbox_settings::{default_config_path, BoxConfig, MeasurementSystem, OutputFormat, OutputSettings};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "tabbox")]
#[command(version, about = "Generate finger-jointed box cut paths for laser and CNC cutters", long_about = None)]
pub struct Cli {
    /// Box config file (.json or .toml); defaults to the user config file when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the effective configuration to this file (.json or .toml)
    #[arg(long, value_name = "PATH")]
    pub save_config: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (svg, gcode, json); inferred from the output extension when omitted
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Log as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    #[command(flatten)]
    pub dimensions: DimensionArgs,

    #[command(flatten)]
    pub joints: JointArgs,

    #[command(flatten)]
    pub layout: LayoutArgs,

    #[command(flatten)]
    pub schroff: SchroffArgs,

    #[command(flatten)]
    pub machine: MachineArgs,
}

/// Box size and material. Lengths accept fractions such as `3 1/2` in inches.
#[derive(Args, Debug, Default)]
pub struct DimensionArgs {
    /// Units for every length option (mm, in)
    #[arg(short, long)]
    pub unit: Option<MeasurementSystem>,

    /// Dimensions are inside measurements
    #[arg(long)]
    pub inside: bool,

    /// Dimensions are outside measurements
    #[arg(long, conflicts_with = "inside")]
    pub outside: bool,

    #[arg(long)]
    pub length: Option<String>,

    #[arg(long)]
    pub width: Option<String>,

    #[arg(long, alias = "depth")]
    pub height: Option<String>,

    /// Material thickness
    #[arg(long)]
    pub thickness: Option<String>,

    /// Kerf (cut width)
    #[arg(long)]
    pub kerf: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct JointArgs {
    /// Nominal tab width
    #[arg(long)]
    pub tab: Option<String>,

    /// Stretch tabs so every tab and gap on an edge has the same width
    #[arg(long)]
    pub equal_tabs: bool,

    /// 0 = XY symmetric, 1 = rotationally symmetric, 2 = antisymmetric
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=2))]
    pub tab_symmetry: Option<i32>,

    /// 0 = laser, 1 = dogbone (milling relief)
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=1))]
    pub tab_type: Option<i32>,

    /// Dimple (friction bump) height
    #[arg(long)]
    pub dimple_height: Option<String>,

    /// Dimple length
    #[arg(long)]
    pub dimple_length: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct LayoutArgs {
    /// 1 = full box, 2 = no top, 3 = no top or front, 4 = no top, front or right,
    /// 5 = no top or bottom, 6 = no top, front, back or right
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=6))]
    pub box_type: Option<i32>,

    /// 1 = diagrammatic, 2 = three piece, 3 = inline
    #[arg(long, alias = "layout", value_parser = clap::value_parser!(i32).range(1..=3))]
    pub style: Option<i32>,

    /// Space between laid-out panels
    #[arg(long)]
    pub spacing: Option<String>,

    /// Number of dividers along the length
    #[arg(long = "div-l")]
    pub div_l: Option<u32>,

    /// Number of dividers along the width
    #[arg(long = "div-w")]
    pub div_w: Option<u32>,

    /// 0 = walls and floor, 1 = floor only, 2 = walls only, 3 = none
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=3))]
    pub key_dividers: Option<i32>,

    /// Finger-hole width in the divider rims, percent of a compartment (0 = none)
    #[arg(long, value_name = "PERCENT")]
    pub div_cutout_width: Option<f64>,

    /// Finger-hole depth, percent of the inner wall height
    #[arg(long, value_name = "PERCENT")]
    pub div_cutout_height: Option<f64>,

    /// Leave the front wall without finger holes
    #[arg(long)]
    pub no_cutout_front: bool,
}

/// Schroff rack case. Values are millimetres regardless of `--unit`.
#[derive(Args, Debug, Default)]
pub struct SchroffArgs {
    /// Size the box as a Schroff subrack case
    #[arg(long)]
    pub schroff: bool,

    /// Number of 3U rows
    #[arg(long)]
    pub rows: Option<u32>,

    /// Width in horizontal pitch units (5.08 mm)
    #[arg(long)]
    pub hp: Option<u32>,

    #[arg(long)]
    pub rail_height: Option<f64>,

    #[arg(long)]
    pub row_spacing: Option<f64>,

    #[arg(long)]
    pub rail_mount_depth: Option<f64>,

    #[arg(long)]
    pub rail_mount_centre_offset: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub struct MachineArgs {
    /// Use a hairline SVG stroke
    #[arg(long)]
    pub hairline: bool,

    /// Use the regular 1 mm SVG stroke
    #[arg(long, conflicts_with = "hairline")]
    pub no_hairline: bool,

    /// G-code passes per contour
    #[arg(long)]
    pub passes: Option<u32>,

    /// Spindle/laser power (S word)
    #[arg(long)]
    pub power: Option<u32>,

    /// Cutting feed rate (mm/min)
    #[arg(long)]
    pub feed_rate: Option<f64>,
}

fn length_arg(value: &Option<String>, units: MeasurementSystem, target: &mut f64) -> Result<()> {
    if let Some(text) = value {
        let mm = parse_length(text, units)
            .map_err(|e| anyhow::anyhow!("invalid length '{text}': {e}"))?;
        *target = units.from_mm(mm);
    }
    Ok(())
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut BoxConfig) -> Result<()> {
        let d = &self.dimensions;
        if let Some(unit) = d.unit {
            config.units = unit;
        }
        let units = config.units;
        let p = &mut config.box_params;

        if d.inside {
            p.inside = true;
        } else if d.outside {
            p.inside = false;
        }
        length_arg(&d.length, units, &mut p.length)?;
        length_arg(&d.width, units, &mut p.width)?;
        length_arg(&d.height, units, &mut p.height)?;
        length_arg(&d.thickness, units, &mut p.thickness)?;
        length_arg(&d.kerf, units, &mut p.kerf)?;

        let j = &self.joints;
        length_arg(&j.tab, units, &mut p.tab)?;
        length_arg(&j.dimple_height, units, &mut p.dimple_height)?;
        length_arg(&j.dimple_length, units, &mut p.dimple_length)?;
        if j.equal_tabs {
            p.equal_tabs = true;
        }
        if let Some(code) = j.tab_symmetry {
            p.tab_symmetry = TabSymmetry::from(code);
        }
        if let Some(code) = j.tab_type {
            p.tab_type = TabType::from(code);
        }

        let l = &self.layout;
        length_arg(&l.spacing, units, &mut p.spacing)?;
        if let Some(code) = l.box_type {
            p.box_type = BoxType::from(code);
        }
        if let Some(code) = l.style {
            p.layout = LayoutStyle::from(code);
        }
        if let Some(n) = l.div_l {
            p.dividers_length = n;
        }
        if let Some(n) = l.div_w {
            p.dividers_width = n;
        }
        if let Some(code) = l.key_dividers {
            p.key_dividers = KeyDividerType::from(code);
        }
        if let Some(v) = l.div_cutout_width {
            p.cutout_width_percent = v;
        }
        if let Some(v) = l.div_cutout_height {
            p.cutout_height_percent = v;
        }
        if l.no_cutout_front {
            p.cutout_front = false;
        }

        let s = &self.schroff;
        let touches_schroff = s.rows.is_some()
            || s.hp.is_some()
            || s.rail_height.is_some()
            || s.row_spacing.is_some()
            || s.rail_mount_depth.is_some()
            || s.rail_mount_centre_offset.is_some();
        if s.schroff || (touches_schroff && p.schroff.is_some()) {
            let rack = p.schroff.get_or_insert_with(SchroffSettings::default);
            if let Some(v) = s.rows {
                rack.rows = v;
            }
            if let Some(v) = s.hp {
                rack.hp = v;
            }
            if let Some(v) = s.rail_height {
                rack.rail_height = v;
            }
            if let Some(v) = s.row_spacing {
                rack.row_spacing = v;
            }
            if let Some(v) = s.rail_mount_depth {
                rack.rail_mount_depth = v;
            }
            if let Some(v) = s.rail_mount_centre_offset {
                rack.rail_mount_centre_offset = v;
            }
        } else if touches_schroff {
            tracing::warn!("Schroff rack options ignored without --schroff");
        }

        let m = &self.machine;
        let out = &mut config.output;
        if m.hairline {
            out.svg.hairline = true;
        } else if m.no_hairline {
            out.svg.hairline = false;
        }
        if let Some(v) = m.passes {
            out.gcode.passes = v;
        }
        if let Some(v) = m.power {
            out.gcode.power = v;
        }
        if let Some(v) = m.feed_rate {
            out.gcode.feed_rate = v;
        }
        if let Some(format) = self.resolve_format() {
            out.format = format;
        }

        Ok(())
    }

    /// Explicit `--format`, else the output file extension if it names one.
    fn resolve_format(&self) -> Option<OutputFormat> {
        self.format.or_else(|| {
            self.output
                .as_deref()
                .and_then(Path::extension)
                .and_then(|e| e.to_str())
                .and_then(|e| e.parse().ok())
        })
    }

    /// Load the base config and apply overrides.
    pub fn build_config(&self) -> Result<BoxConfig> {
        let base = match &self.config {
            Some(path) => Some(path.clone()),
            None => default_config_path().ok().filter(|p| p.is_file()),
        };

        let mut config = match base {
            Some(path) => {
                info!("Loading box config from {}", path.display());
                BoxConfig::load_from_file(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?
            }
            None => BoxConfig::default(),
        };

        self.apply(&mut config)?;
        Ok(config)
    }
}

/// Render a generated layout in the requested format.
pub fn render(layout: &BoxLayout, format: OutputFormat, output: &OutputSettings) -> Result<String> {
    Ok(match format {
        OutputFormat::Svg => layout.to_svg(&output.svg),
        OutputFormat::Gcode => layout.to_gcode(&output.gcode),
        OutputFormat::Json => layout.to_json()?,
    })
}

/// Generate the box described by `cli` and write it out.
pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.build_config()?;
    debug!("Effective config: {:?}", config);

    if let Some(path) = &cli.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("failed to save config {}", path.display()))?;
        info!("Saved config to {}", path.display());
    }

    config.validate()?;
    let maker = TabbedBoxMaker::new(config.to_parameters())?;
    let layout = maker.generate();

    let (x, y, z) = layout.dimensions;
    let units = config.units;
    info!(
        "Box {} x {} x {} {} ({} panels)",
        format_length(x, units),
        format_length(y, units),
        format_length(z, units),
        units.label(),
        layout.panels.len()
    );

    let content = render(&layout, config.output.format, &config.output)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {} to {}", config.output.format, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
