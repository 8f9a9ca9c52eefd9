//! SVG and G-code output for a generated box.

use super::BoxLayout;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tabbox_core::{Bounds, Circle, Path, Point, Segment};

/// Stroke width of a laser "hairline" cut, 0.002 in.
pub const HAIRLINE_STROKE_MM: f64 = 0.0508;
/// Stroke width used when hairline is off.
pub const DEFAULT_STROKE_MM: f64 = 1.0;
/// Blank border around the drawing, in millimetres.
const SVG_MARGIN: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgOptions {
    pub hairline: bool,
    pub stroke_color: String,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            hairline: true,
            stroke_color: "#000000".to_string(),
        }
    }
}

impl SvgOptions {
    pub fn stroke_width(&self) -> f64 {
        if self.hairline {
            HAIRLINE_STROKE_MM
        } else {
            DEFAULT_STROKE_MM
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcodeSettings {
    pub passes: u32,
    /// Spindle/laser power word value.
    pub power: u32,
    /// Cutting feed in mm/min.
    pub feed_rate: f64,
    /// Z lowered per extra pass; zero for a laser.
    pub z_step_down: f64,
    /// Work coordinates of the lower-left corner of the drawing.
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for GcodeSettings {
    fn default() -> Self {
        Self {
            passes: 1,
            power: 1000,
            feed_rate: 500.0,
            z_step_down: 0.0,
            offset_x: 10.0,
            offset_y: 10.0,
        }
    }
}

/// Shortest decimal form, at most four places.
fn num(v: f64) -> String {
    let s = format!("{:.4}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn path_data(path: &Path) -> String {
    let mut d = String::new();
    let _ = write!(d, "M {},{}", num(path.start.x), num(path.start.y));
    for seg in &path.segments {
        let _ = match seg {
            Segment::LineTo(p) => write!(d, " L {},{}", num(p.x), num(p.y)),
            Segment::CubicTo { c1, c2, end } => write!(
                d,
                " C {},{} {},{} {},{}",
                num(c1.x),
                num(c1.y),
                num(c2.x),
                num(c2.y),
                num(end.x),
                num(end.y)
            ),
        };
    }
    d.push_str(" Z");
    d
}

pub fn to_svg(layout: &BoxLayout, options: &SvgOptions) -> String {
    let bounds = layout.bounds();
    let (min, width, height) = if bounds.is_empty() {
        (Point::ZERO, 0.0, 0.0)
    } else {
        (
            Point::new(bounds.min.x - SVG_MARGIN, bounds.min.y - SVG_MARGIN),
            bounds.width() + 2.0 * SVG_MARGIN,
            bounds.height() + 2.0 * SVG_MARGIN,
        )
    };

    let style = format!(
        "fill:none;stroke:{};stroke-width:{}",
        options.stroke_color,
        num(options.stroke_width())
    );

    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:inkscape=\"http://www.inkscape.org/namespaces/inkscape\" width=\"{}mm\" height=\"{}mm\" viewBox=\"{} {} {} {}\">",
        num(width),
        num(height),
        num(min.x),
        num(min.y),
        num(width),
        num(height)
    );

    for (i, panel) in layout.panels.iter().enumerate() {
        let _ = writeln!(
            svg,
            "  <g id=\"panel{}\" inkscape:label=\"{}\">",
            i,
            panel.role.label()
        );
        let _ = writeln!(
            svg,
            "    <path style=\"{}\" d=\"{}\"/>",
            style,
            path_data(&panel.outline)
        );
        for hole in &panel.holes {
            let _ = writeln!(svg, "    <path style=\"{}\" d=\"{}\"/>", style, path_data(hole));
        }
        for c in &panel.circles {
            let _ = writeln!(
                svg,
                "    <circle style=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\"/>",
                style,
                num(c.center.x),
                num(c.center.y),
                num(c.radius)
            );
        }
        svg.push_str("  </g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

/// Flip from drawing space (y down) to machine space (y up) and move the
/// drawing's lower-left corner onto the work offset.
struct MachineFrame {
    bounds: Bounds,
    offset: Point,
}

impl MachineFrame {
    fn map(&self, p: Point) -> Point {
        if self.bounds.is_empty() {
            return p + self.offset;
        }
        Point::new(
            p.x - self.bounds.min.x + self.offset.x,
            self.bounds.max.y - p.y + self.offset.y,
        )
    }
}

pub fn to_gcode(layout: &BoxLayout, settings: &GcodeSettings) -> String {
    let frame = MachineFrame {
        bounds: layout.bounds(),
        offset: Point::new(settings.offset_x, settings.offset_y),
    };
    let passes = settings.passes.max(1);
    let mut gcode = String::new();

    gcode.push_str("; Tabbed Box Maker G-code\n");
    gcode.push_str(";\n");
    gcode.push_str("; --- Box Dimensions ---\n");
    let (x, y, z) = layout.dimensions;
    let p = &layout.parameters;
    let _ = writeln!(gcode, "; Outer dimensions: {}x{}x{} mm", num(x), num(y), num(z));
    let _ = writeln!(gcode, "; Inside dimensions: {}", p.inside);
    let _ = writeln!(gcode, "; Box Type: {:?}", p.box_type);
    let _ = writeln!(gcode, "; Length dividers: {}", p.dividers_length);
    let _ = writeln!(gcode, "; Width dividers: {}", p.dividers_width);
    let _ = writeln!(gcode, "; Divider Keying: {:?}", p.key_dividers);
    let _ = writeln!(gcode, "; Panels: {}", layout.panels.len());
    gcode.push_str(";\n");
    gcode.push_str("; --- Material Settings ---\n");
    let _ = writeln!(gcode, "; Material thickness: {} mm", num(p.thickness));
    let _ = writeln!(gcode, "; Kerf: {} mm", num(p.kerf));
    let _ = writeln!(gcode, "; Tab width: {} mm", num(p.tab));
    let _ = writeln!(gcode, "; Tab symmetry: {:?}", p.tab_symmetry);
    gcode.push_str(";\n");
    gcode.push_str("; --- Laser Settings ---\n");
    let _ = writeln!(gcode, "; Passes: {}", passes);
    let _ = writeln!(gcode, "; Power: S{}", settings.power);
    let _ = writeln!(gcode, "; Feed rate: {:.0} mm/min", settings.feed_rate);
    gcode.push_str(";\n");

    gcode.push_str("; Initialization\n");
    gcode.push_str("G21 ; Set units to millimeters\n");
    gcode.push_str("G90 ; Absolute positioning\n");
    gcode.push_str("G17 ; XY plane selection\n");
    gcode.push('\n');

    for (i, panel) in layout.panels.iter().enumerate() {
        let _ = writeln!(gcode, "; Panel {}: {}", i + 1, panel.role.label());
        // inner cuts first so the part stays put
        for hole in &panel.holes {
            emit_path(&mut gcode, hole, &frame, settings, passes);
        }
        for c in &panel.circles {
            emit_circle(&mut gcode, c, &frame, settings, passes);
        }
        emit_path(&mut gcode, &panel.outline, &frame, settings, passes);
        gcode.push('\n');
    }

    gcode.push_str("M5 ; Ensure laser off\n");
    gcode.push_str("G0 X0 Y0 ; Return to origin\n");
    gcode.push_str("M2 ; Program end\n");
    gcode
}

fn pass_depth(settings: &GcodeSettings, pass: u32, passes: u32, gcode: &mut String) {
    let z = -((pass - 1) as f64) * settings.z_step_down;
    let _ = writeln!(gcode, "; Pass {}/{} at Z{:.2}", pass, passes, z);
    if pass > 1 && settings.z_step_down != 0.0 {
        let _ = writeln!(gcode, "G0 Z{:.2} ; Move to pass depth", z);
    }
}

fn emit_path(
    gcode: &mut String,
    path: &Path,
    frame: &MachineFrame,
    settings: &GcodeSettings,
    passes: u32,
) {
    let start = frame.map(path.start);
    let _ = writeln!(gcode, "G0 X{:.3} Y{:.3} ; Rapid to start", start.x, start.y);
    for pass in 1..=passes {
        pass_depth(settings, pass, passes, gcode);
        let _ = writeln!(gcode, "M3 S{} ; Laser on", settings.power);
        for (idx, p) in path.flattened().into_iter().skip(1).enumerate() {
            let p = frame.map(p);
            if idx == 0 {
                let _ = writeln!(
                    gcode,
                    "G1 X{:.3} Y{:.3} F{:.0}",
                    p.x, p.y, settings.feed_rate
                );
            } else {
                let _ = writeln!(gcode, "G1 X{:.3} Y{:.3}", p.x, p.y);
            }
        }
        if !path.is_closed(1e-9) {
            let _ = writeln!(gcode, "G1 X{:.3} Y{:.3}", start.x, start.y);
        }
        gcode.push_str("M5 ; Laser off\n");
    }
}

fn emit_circle(
    gcode: &mut String,
    circle: &Circle,
    frame: &MachineFrame,
    settings: &GcodeSettings,
    passes: u32,
) {
    let c = frame.map(circle.center);
    let r = circle.radius;
    let _ = writeln!(gcode, "G0 X{:.3} Y{:.3} ; Rapid to start", c.x + r, c.y);
    for pass in 1..=passes {
        pass_depth(settings, pass, passes, gcode);
        let _ = writeln!(gcode, "M3 S{} ; Laser on", settings.power);
        let _ = writeln!(
            gcode,
            "G2 X{:.3} Y{:.3} I{:.3} J0 F{:.0}",
            c.x + r,
            c.y,
            -r,
            settings.feed_rate
        );
        gcode.push_str("M5 ; Laser off\n");
    }
}
