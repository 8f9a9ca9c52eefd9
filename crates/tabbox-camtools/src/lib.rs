//! # TabBox CAM Tools
//!
//! Generates the flat cut geometry of laser or CNC cut boxes joined with
//! interlocking tabs (finger joints).
//!
//! - **Tabbed Box Maker**: six-sided or open boxes, optional dividers,
//!   dimples, dogbone relief, Schroff rack cases
//! - **Export**: SVG drawings and laser G-code

pub mod error;
pub mod tabbed_box;

pub use error::{CamToolError, CamToolResult, ConstraintError, ValidationErrors};
pub use tabbed_box::{
    BoxLayout, BoxParameters, BoxType, GcodeSettings, KeyDividerType, LayoutStyle, Panel,
    SchroffSettings, SvgOptions, TabSymmetry, TabType, TabbedBoxMaker,
};
