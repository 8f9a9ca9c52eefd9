//! Type definitions for the Tabbed Box Maker

use serde::{Deserialize, Serialize};
use tabbox_core::{Circle, Path, Point};

/// Which of the six faces exist. Numeric codes run 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoxType {
    #[default]
    FullBox = 1,
    OpenTop = 2,
    /// No top, no front.
    TwoSidesOpen = 3,
    /// No top, no front, no right.
    ThreeSidesOpen = 4,
    /// No top, no bottom.
    OppositeEndsOpen = 5,
    /// Only bottom and left remain.
    TwoPanelsOnly = 6,
}

impl From<i32> for BoxType {
    fn from(value: i32) -> Self {
        match value {
            2 => BoxType::OpenTop,
            3 => BoxType::TwoSidesOpen,
            4 => BoxType::ThreeSidesOpen,
            5 => BoxType::OppositeEndsOpen,
            6 => BoxType::TwoPanelsOnly,
            _ => BoxType::FullBox,
        }
    }
}

impl BoxType {
    pub fn faces(self) -> FacePresence {
        let mut f = FacePresence::all();
        match self {
            BoxType::FullBox => {}
            BoxType::OpenTop => f.top = false,
            BoxType::TwoSidesOpen => {
                f.top = false;
                f.front = false;
            }
            BoxType::ThreeSidesOpen => {
                f.top = false;
                f.front = false;
                f.right = false;
            }
            BoxType::OppositeEndsOpen => {
                f.top = false;
                f.bottom = false;
            }
            BoxType::TwoPanelsOnly => {
                f.top = false;
                f.front = false;
                f.back = false;
                f.right = false;
            }
        }
        f
    }
}

/// How panels are arranged on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutStyle {
    /// Unfolded cross with the floor in the middle.
    #[default]
    Diagrammatic = 1,
    /// Back, left and bottom only.
    ThreePiece = 2,
    /// Everything in a single row.
    Inline = 3,
}

impl From<i32> for LayoutStyle {
    fn from(value: i32) -> Self {
        match value {
            2 => LayoutStyle::ThreePiece,
            3 => LayoutStyle::Inline,
            _ => LayoutStyle::Diagrammatic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TabSymmetry {
    #[default]
    XySymmetric = 0,
    /// Waffle-block style: every side carries tabs, thickness reserved at both ends.
    Rotational = 1,
    /// Legacy mode kept only so old settings still load. Known to produce odd joints.
    Antisymmetric = 2,
}

impl From<i32> for TabSymmetry {
    fn from(value: i32) -> Self {
        match value {
            1 => TabSymmetry::Rotational,
            2 => TabSymmetry::Antisymmetric,
            _ => TabSymmetry::XySymmetric,
        }
    }
}

impl TabSymmetry {
    pub fn is_rotational(self) -> bool {
        self == TabSymmetry::Rotational
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TabType {
    /// Square corners, for lasers.
    #[default]
    Laser = 0,
    /// Relief cuts in inside corners, for rotary cutters.
    Dogbone = 1,
}

impl From<i32> for TabType {
    fn from(value: i32) -> Self {
        match value {
            1 => TabType::Dogbone,
            _ => TabType::Laser,
        }
    }
}

/// Where divider panels key into the shell. Codes: 0 both, 1 floor, 2 walls, 3 none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyDividerType {
    WallsAndFloor = 0,
    FloorOnly = 1,
    WallsOnly = 2,
    #[default]
    None = 3,
}

impl From<i32> for KeyDividerType {
    fn from(value: i32) -> Self {
        match value {
            0 => KeyDividerType::WallsAndFloor,
            1 => KeyDividerType::FloorOnly,
            2 => KeyDividerType::WallsOnly,
            _ => KeyDividerType::None,
        }
    }
}

impl KeyDividerType {
    pub fn keys_walls(self) -> bool {
        matches!(self, KeyDividerType::WallsAndFloor | KeyDividerType::WallsOnly)
    }

    pub fn keys_floor(self) -> bool {
        matches!(self, KeyDividerType::WallsAndFloor | KeyDividerType::FloorOnly)
    }
}

/// Distance between mounting-hole centres of a 3U rack row.
pub const SCHROFF_ROW_CENTRE_SPACING: f64 = 122.5;
/// Rail mounting bolt hole radius.
pub const SCHROFF_RAIL_MOUNT_RADIUS: f64 = 2.5;
/// Width of one HP/TE unit.
pub const SCHROFF_HP_PITCH: f64 = 5.08;

/// Rack-rail mounting holes for Schroff-style subracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchroffSettings {
    pub rows: u32,
    /// Row width in HP units; sets the box length.
    pub hp: u32,
    pub rail_height: f64,
    /// Gap between rows (never between a row and the case panel).
    pub row_spacing: f64,
    /// Depth from the panel edge of the rail mount bolt.
    pub rail_mount_depth: f64,
    /// Shift of each hole toward the row centreline.
    pub rail_mount_centre_offset: f64,
}

impl Default for SchroffSettings {
    fn default() -> Self {
        Self {
            rows: 1,
            hp: 84,
            rail_height: 10.0,
            row_spacing: 10.0,
            rail_mount_depth: 17.4,
            rail_mount_centre_offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxParameters {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Dimensions are interior measurements.
    pub inside: bool,
    pub thickness: f64,
    pub kerf: f64,
    /// Nominal tab width.
    pub tab: f64,
    /// Make tabs and gaps the same width instead of fixing the tab width.
    pub equal_tabs: bool,
    pub tab_symmetry: TabSymmetry,
    pub tab_type: TabType,
    pub dimple_height: f64,
    pub dimple_length: f64,
    pub box_type: BoxType,
    pub layout: LayoutStyle,
    /// Gap between panels on the sheet.
    pub spacing: f64,
    /// Dividers across the length axis.
    pub dividers_length: u32,
    /// Dividers across the width axis.
    pub dividers_width: u32,
    pub key_dividers: KeyDividerType,
    /// Finger-hole width as a percentage of one compartment. Zero for none.
    pub cutout_width_percent: f64,
    /// Finger-hole depth as a percentage of the inner wall height.
    pub cutout_height_percent: f64,
    /// Also notch the front wall (diagrammatic layout only).
    pub cutout_front: bool,
    pub schroff: Option<SchroffSettings>,
}

impl Default for BoxParameters {
    fn default() -> Self {
        Self {
            length: 100.0,
            width: 100.0,
            height: 100.0,
            inside: false,
            thickness: 3.0,
            kerf: 0.5,
            tab: 25.0,
            equal_tabs: false,
            tab_symmetry: TabSymmetry::XySymmetric,
            tab_type: TabType::Laser,
            dimple_height: 0.0,
            dimple_length: 0.0,
            box_type: BoxType::FullBox,
            layout: LayoutStyle::Diagrammatic,
            spacing: 25.0,
            dividers_length: 0,
            dividers_width: 0,
            key_dividers: KeyDividerType::None,
            cutout_width_percent: 0.0,
            cutout_height_percent: 0.0,
            cutout_front: true,
            schroff: None,
        }
    }
}

impl BoxParameters {
    /// Box size as drawn before any inside/outside correction: each user
    /// dimension grown by one kerf. In Schroff mode length and width come
    /// from the rack geometry instead.
    pub fn nominal_dimensions(&self) -> (f64, f64, f64) {
        let z = self.height + self.kerf;
        match &self.schroff {
            Some(s) => {
                let x = s.hp as f64 * SCHROFF_HP_PITCH;
                let rows = s.rows as f64;
                let row_height = rows * (SCHROFF_ROW_CENTRE_SPACING + s.rail_height);
                let row_spacing_total = (rows - 1.0).max(0.0) * s.row_spacing;
                (x, row_height + row_spacing_total, z)
            }
            None => (self.length + self.kerf, self.width + self.kerf, z),
        }
    }

    /// Outer dimensions used for generation.
    pub fn outer_dimensions(&self) -> (f64, f64, f64) {
        let (x, y, z) = self.nominal_dimensions();
        if self.inside {
            let t2 = self.thickness * 2.0;
            (x + t2, y + t2, z + t2)
        } else {
            (x, y, z)
        }
    }
}

/// The six faces of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Top,
    Bottom,
    Front,
    Back,
    Left,
    Right,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
    ];

    pub fn kind(self) -> FaceKind {
        match self {
            Face::Top | Face::Bottom => FaceKind::Xy,
            Face::Front | Face::Back => FaceKind::Xz,
            Face::Left | Face::Right => FaceKind::Zy,
        }
    }

    /// Side of a wall panel that runs along the box opening.
    pub fn rim_side(self) -> Option<PanelSide> {
        match self {
            Face::Front => Some(PanelSide::Top),
            Face::Back => Some(PanelSide::Bottom),
            Face::Left => Some(PanelSide::Left),
            Face::Right => Some(PanelSide::Right),
            Face::Top | Face::Bottom => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacePresence {
    pub top: bool,
    pub bottom: bool,
    pub front: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl FacePresence {
    pub fn all() -> Self {
        Self {
            top: true,
            bottom: true,
            front: true,
            back: true,
            left: true,
            right: true,
        }
    }

    pub fn has(&self, face: Face) -> bool {
        match face {
            Face::Top => self.top,
            Face::Bottom => self.bottom,
            Face::Front => self.front,
            Face::Back => self.back,
            Face::Left => self.left,
            Face::Right => self.right,
        }
    }

    pub fn count(&self) -> usize {
        Face::ALL.iter().filter(|f| self.has(**f)).count()
    }
}

/// Orientation class of a panel: which two box axes it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceKind {
    /// Floor or ceiling (X by Y).
    Xy,
    /// Front or back wall (X by Z).
    Xz,
    /// Left or right wall (Z by Y).
    Zy,
}

impl FaceKind {
    pub fn is_floor(self) -> bool {
        self == FaceKind::Xy
    }

    pub fn is_wall(self) -> bool {
        self != FaceKind::Xy
    }

    /// Panel has an edge running along X, so width-axis dividers key into it.
    pub fn x_holes(self) -> bool {
        self != FaceKind::Zy
    }

    /// Panel has an edge running along Y, so length-axis dividers key into it.
    pub fn y_holes(self) -> bool {
        self != FaceKind::Xz
    }
}

/// One side of a rectangular panel, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl PanelSide {
    pub const ALL: [PanelSide; 4] = [
        PanelSide::Top,
        PanelSide::Right,
        PanelSide::Bottom,
        PanelSide::Left,
    ];

    pub fn mask(self) -> u8 {
        match self {
            PanelSide::Top => TabBits::TOP,
            PanelSide::Right => TabBits::RIGHT,
            PanelSide::Bottom => TabBits::BOTTOM,
            PanelSide::Left => TabBits::LEFT,
        }
    }

    /// The side drawn just before this one.
    pub fn previous(self) -> PanelSide {
        match self {
            PanelSide::Top => PanelSide::Left,
            PanelSide::Right => PanelSide::Top,
            PanelSide::Bottom => PanelSide::Right,
            PanelSide::Left => PanelSide::Bottom,
        }
    }

    /// Sign of the outward normal along the cross axis.
    pub fn outward(self) -> f64 {
        match self {
            PanelSide::Top | PanelSide::Left => -1.0,
            PanelSide::Right | PanelSide::Bottom => 1.0,
        }
    }
}

/// Four-bit per-side flags, `0b<top><right><bottom><left>`.
///
/// Used twice per panel: as tab info (1 = the side carries tabs, 0 = it
/// receives them) and as the tabbed mask (1 = the side is jointed at all).
#[derive(Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TabBits(pub u8);

impl TabBits {
    pub const TOP: u8 = 0b1000;
    pub const RIGHT: u8 = 0b0100;
    pub const BOTTOM: u8 = 0b0010;
    pub const LEFT: u8 = 0b0001;
    pub const ALL: TabBits = TabBits(0b1111);
    pub const NONE: TabBits = TabBits(0);

    pub fn top(self) -> bool {
        self.0 & Self::TOP != 0
    }

    pub fn right(self) -> bool {
        self.0 & Self::RIGHT != 0
    }

    pub fn bottom(self) -> bool {
        self.0 & Self::BOTTOM != 0
    }

    pub fn left(self) -> bool {
        self.0 & Self::LEFT != 0
    }

    pub fn side(self, side: PanelSide) -> bool {
        self.0 & side.mask() != 0
    }

    pub fn with(self, mask: u8) -> Self {
        TabBits((self.0 | mask) & 0b1111)
    }

    pub fn without(self, mask: u8) -> Self {
        TabBits(self.0 & !mask & 0b1111)
    }
}

impl std::fmt::Debug for TabBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TabBits({:#06b})", self.0)
    }
}

/// Tab info and tabbed mask of one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceCodes {
    pub tab_info: TabBits,
    pub tabbed: TabBits,
}

/// Codes for all six faces after symmetry defaults and face omission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceTable {
    codes: [FaceCodes; 6],
}

impl FaceTable {
    /// Default tab info for a symmetry mode; every side tabbed.
    pub fn defaults(symmetry: TabSymmetry) -> Self {
        // order: top, bottom, front, back, left, right
        let info: [u8; 6] = match symmetry {
            TabSymmetry::Antisymmetric => [0b0110, 0b1100, 0b1100, 0b1001, 0b1100, 0b0110],
            TabSymmetry::Rotational => [0b1111; 6],
            TabSymmetry::XySymmetric => [0b0000, 0b0000, 0b1010, 0b1010, 0b1111, 0b1111],
        };
        Self {
            codes: info.map(|bits| FaceCodes {
                tab_info: TabBits(bits),
                tabbed: TabBits::ALL,
            }),
        }
    }

    pub fn get(&self, face: Face) -> FaceCodes {
        self.codes[face.index()]
    }

    /// Mark one side of `face` as unjointed because its neighbour is missing.
    /// Inside-dimension boxes keep the side on the tab base line, outside ones
    /// on the tip line.
    pub fn clear_side(&mut self, face: Face, bit: u8, inside: bool) {
        let codes = &mut self.codes[face.index()];
        codes.tabbed = codes.tabbed.without(bit);
        codes.tab_info = if inside {
            codes.tab_info.with(bit)
        } else {
            codes.tab_info.without(bit)
        };
    }

    pub fn drop_face(&mut self, face: Face) {
        self.codes[face.index()].tabbed = TabBits::NONE;
    }
}

/// What a generated panel is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelRole {
    Shell(Face),
    /// Divider spanning the width, placed along the length axis.
    LengthDivider,
    /// Divider spanning the length, placed along the width axis.
    WidthDivider,
}

impl PanelRole {
    pub fn is_divider(self) -> bool {
        !matches!(self, PanelRole::Shell(_))
    }

    pub fn label(self) -> String {
        match self {
            PanelRole::Shell(face) => format!("{:?}", face),
            PanelRole::LengthDivider => "Length divider".to_string(),
            PanelRole::WidthDivider => "Width divider".to_string(),
        }
    }
}

/// One cut-out: its outline, key-holes and slots, and any mounting holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub role: PanelRole,
    pub kind: FaceKind,
    /// Root corner on the sheet.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub tab_info: TabBits,
    /// Sides that actually received tabs.
    pub tabbed: TabBits,
    pub outline: Path,
    pub holes: Vec<Path>,
    pub circles: Vec<Circle>,
}

impl Panel {
    pub fn bounds(&self) -> tabbox_core::Bounds {
        let mut b = self.outline.bounds();
        for h in &self.holes {
            b.merge(&h.bounds());
        }
        for c in &self.circles {
            b.merge(&c.bounds());
        }
        b
    }
}
