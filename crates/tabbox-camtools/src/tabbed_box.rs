//! Tabbed Box Maker
//!
//! Generates the flat cut paths of a finger-jointed box: up to six shell
//! panels plus optional interlocking dividers, laid out on one sheet.
//! Joints are corrected for kerf so mating parts fit without glue.

mod edge;
mod export;
mod layout;
mod panel;
mod schroff;
mod types;
mod validation;

pub use edge::{Cutout, Edge, EdgeGenerator, JointSettings, KerfWidths, TabLayout};
pub use export::{GcodeSettings, SvgOptions, DEFAULT_STROKE_MM, HAIRLINE_STROKE_MM};
pub use layout::{reduce_offsets, shell_placements, GridCell, Placement};
pub use panel::{DividerAxis, DividerKeying, FingerHoles, PanelAssembler, PanelSpec};
pub use schroff::rail_holes;
pub use types::*;
pub use validation::{validate, MAX_DIMENSION, MAX_DIVIDERS};

use crate::error::CamToolResult;
use serde::{Deserialize, Serialize};
use tabbox_core::{Bounds, Point};
use tracing::{info, warn};

/// Sides cleared on the neighbours of each omitted face.
const OMISSION_RULES: [(Face, [(Face, u8); 4]); 6] = [
    (
        Face::Top,
        [
            (Face::Back, TabBits::BOTTOM),
            (Face::Front, TabBits::TOP),
            (Face::Left, TabBits::LEFT),
            (Face::Right, TabBits::RIGHT),
        ],
    ),
    (
        Face::Bottom,
        [
            (Face::Back, TabBits::TOP),
            (Face::Front, TabBits::BOTTOM),
            (Face::Left, TabBits::RIGHT),
            (Face::Right, TabBits::LEFT),
        ],
    ),
    (
        Face::Front,
        [
            (Face::Top, TabBits::TOP),
            (Face::Bottom, TabBits::TOP),
            (Face::Left, TabBits::TOP),
            (Face::Right, TabBits::TOP),
        ],
    ),
    (
        Face::Back,
        [
            (Face::Top, TabBits::BOTTOM),
            (Face::Bottom, TabBits::BOTTOM),
            (Face::Left, TabBits::BOTTOM),
            (Face::Right, TabBits::BOTTOM),
        ],
    ),
    (
        Face::Left,
        [
            (Face::Top, TabBits::RIGHT),
            (Face::Bottom, TabBits::LEFT),
            (Face::Back, TabBits::LEFT),
            (Face::Front, TabBits::LEFT),
        ],
    ),
    (
        Face::Right,
        [
            (Face::Top, TabBits::LEFT),
            (Face::Bottom, TabBits::RIGHT),
            (Face::Back, TabBits::RIGHT),
            (Face::Front, TabBits::RIGHT),
        ],
    ),
];

/// Joint codes for every face once missing faces are accounted for.
pub fn face_table(symmetry: TabSymmetry, faces: &FacePresence, inside: bool) -> FaceTable {
    let mut table = FaceTable::defaults(symmetry);
    for (missing, neighbours) in OMISSION_RULES {
        if faces.has(missing) {
            continue;
        }
        for (face, bit) in neighbours {
            table.clear_side(face, bit, inside);
        }
        table.drop_face(missing);
    }
    table
}

/// Every panel of one box, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxLayout {
    /// Outer box size (X, Y, Z) the panels were cut for.
    pub dimensions: (f64, f64, f64),
    /// Settings the panels were generated from.
    pub parameters: BoxParameters,
    pub panels: Vec<Panel>,
}

impl BoxLayout {
    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for p in &self.panels {
            b.merge(&p.bounds());
        }
        b
    }

    pub fn shell_panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter().filter(|p| !p.role.is_divider())
    }

    pub fn dividers(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter().filter(|p| p.role.is_divider())
    }

    pub fn panel(&self, face: Face) -> Option<&Panel> {
        self.panels.iter().find(|p| p.role == PanelRole::Shell(face))
    }

    pub fn to_svg(&self, options: &SvgOptions) -> String {
        export::to_svg(self, options)
    }

    pub fn to_gcode(&self, settings: &GcodeSettings) -> String {
        export::to_gcode(self, settings)
    }

    pub fn to_json(&self) -> CamToolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Tabbed box generator
pub struct TabbedBoxMaker {
    params: BoxParameters,
    joint: JointSettings,
}

impl TabbedBoxMaker {
    /// Validate `params` and prepare a generator. All violated constraints
    /// are reported together.
    pub fn new(params: BoxParameters) -> CamToolResult<Self> {
        validate(&params)?;

        if params.tab_symmetry == TabSymmetry::Antisymmetric {
            warn!("Antisymmetric tab mode is deprecated and may produce mismatched joints");
        }
        if params.tab_symmetry.is_rotational()
            && (params.dividers_length > 0 || params.dividers_width > 0)
        {
            warn!("Rotational tab mode omits the trailing divider key-hole on each edge");
        }

        let joint = JointSettings::from_params(&params);
        Ok(Self { params, joint })
    }

    pub fn params(&self) -> &BoxParameters {
        &self.params
    }

    pub fn joint(&self) -> &JointSettings {
        &self.joint
    }

    /// Outer dimensions (X, Y, Z) of the generated box.
    pub fn dimensions(&self) -> (f64, f64, f64) {
        self.params.outer_dimensions()
    }

    pub fn face_table(&self) -> FaceTable {
        face_table(
            self.params.tab_symmetry,
            &self.params.box_type.faces(),
            self.params.inside,
        )
    }

    pub fn generate(&self) -> BoxLayout {
        let p = &self.params;
        let (x, y, z) = self.dimensions();
        let t = p.thickness;
        let faces = p.box_type.faces();
        let table = self.face_table();

        let keying = DividerKeying::new(
            x,
            y,
            t,
            p.dividers_length,
            p.dividers_width,
            p.key_dividers.keys_floor(),
            p.key_dividers.keys_walls(),
        );
        let finger_holes = FingerHoles::new(
            x,
            z,
            t,
            p.dividers_width,
            p.cutout_width_percent,
            p.cutout_height_percent,
            p.cutout_front && p.layout == LayoutStyle::Diagrammatic,
        );
        let assembler = PanelAssembler::new(EdgeGenerator::new(&self.joint), keying)
            .with_finger_holes(finger_holes);

        let placements = shell_placements(p.layout, &faces);
        let mut specs = Vec::with_capacity(placements.len());
        let mut panels = Vec::with_capacity(
            placements.len() + p.dividers_length as usize + p.dividers_width as usize,
        );

        for (idx, place) in placements.iter().enumerate() {
            let kind = place.face.kind();
            let (width, height) = match kind {
                FaceKind::Xy => (x, y),
                FaceKind::Xz => (x, z),
                FaceKind::Zy => (z, y),
            };
            let origin = Point::new(
                place.column.resolve(p.spacing, x, y, z),
                place.row.resolve(p.spacing, x, y, z),
            );
            let codes = table.get(place.face);
            let spec = PanelSpec {
                role: PanelRole::Shell(place.face),
                kind,
                origin,
                width,
                height,
                tab_info: codes.tab_info,
                tabbed: codes.tabbed,
            };

            let mut panel = assembler.shell(&spec);
            if let (Some(schroff), FaceKind::Zy) = (&p.schroff, kind) {
                panel.circles = rail_holes(schroff, idx, origin, width, t);
            }
            specs.push(spec);
            panels.push(panel);
        }

        // dividers go in rows below the shell, modelled on the first two panels
        if let Some(template) = specs.first() {
            let row = 4.0 * p.spacing + y + 2.0 * z;
            for n in 0..p.dividers_length {
                let origin = Point::new(n as f64 * (p.spacing + x), row);
                panels.push(assembler.divider(template, DividerAxis::Length, origin));
            }
        }
        if let Some(template) = specs.get(1) {
            let row = 5.0 * p.spacing + y + 3.0 * z;
            for n in 0..p.dividers_width {
                let origin = Point::new(n as f64 * (p.spacing + z), row);
                panels.push(assembler.divider(template, DividerAxis::Width, origin));
            }
        }

        info!(
            "Generated {} panels ({} dividers) for a {:.2}x{:.2}x{:.2} box",
            panels.len(),
            panels.len() - specs.len(),
            x,
            y,
            z
        );

        BoxLayout {
            dimensions: (x, y, z),
            parameters: p.clone(),
            panels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_box_generates_six_panels() {
        let maker = TabbedBoxMaker::new(BoxParameters::default()).unwrap();
        let layout = maker.generate();
        assert_eq!(layout.panels.len(), 6);
        assert_eq!(layout.dividers().count(), 0);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let params = BoxParameters {
            thickness: 0.0,
            ..BoxParameters::default()
        };
        assert!(TabbedBoxMaker::new(params).is_err());
    }

    #[test]
    fn test_nan_inputs_rejected() {
        for params in [
            BoxParameters {
                thickness: f64::NAN,
                ..BoxParameters::default()
            },
            BoxParameters {
                kerf: f64::NAN,
                ..BoxParameters::default()
            },
            BoxParameters {
                dividers_length: MAX_DIVIDERS + 1,
                ..BoxParameters::default()
            },
        ] {
            assert!(TabbedBoxMaker::new(params).is_err());
        }
    }

    #[test]
    fn test_open_top_table() {
        let faces = BoxType::OpenTop.faces();
        let table = face_table(TabSymmetry::XySymmetric, &faces, false);
        assert_eq!(table.get(Face::Top).tabbed, TabBits::NONE);
        assert_eq!(table.get(Face::Front).tabbed, TabBits(0b0111));
        assert_eq!(table.get(Face::Front).tab_info, TabBits(0b0010));
        assert_eq!(table.get(Face::Back).tabbed, TabBits(0b1101));
        assert_eq!(table.get(Face::Left).tabbed, TabBits(0b1110));
        assert_eq!(table.get(Face::Right).tabbed, TabBits(0b1011));
        assert_eq!(table.get(Face::Bottom).tabbed, TabBits::ALL);
    }
}
