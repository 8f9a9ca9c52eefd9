//! Panel assembly: four edges chained into one closed outline.

use super::edge::{Cutout, Edge, EdgeGenerator};
use super::types::{Face, FaceKind, Panel, PanelRole, PanelSide, TabBits};
use tabbox_core::{Direction, Path, Point};
use tracing::debug;

/// How many dividers run each way and where they key in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerKeying {
    /// Dividers running the length of the box, stacked across Y.
    pub length_count: u32,
    /// Dividers running the width of the box, stacked across X.
    pub width_count: u32,
    /// Pitch along X between width dividers.
    pub x_spacing: f64,
    /// Pitch along Y between length dividers.
    pub y_spacing: f64,
    pub key_floor: bool,
    pub key_walls: bool,
}

impl DividerKeying {
    /// Divider pitch for an outer box of `x` by `y`: the span less one wall
    /// thickness, split evenly.
    pub fn new(
        x: f64,
        y: f64,
        thickness: f64,
        length_count: u32,
        width_count: u32,
        key_floor: bool,
        key_walls: bool,
    ) -> Self {
        Self {
            length_count,
            width_count,
            x_spacing: (x - thickness) / (width_count as f64 + 1.0),
            y_spacing: (y - thickness) / (length_count as f64 + 1.0),
            key_floor,
            key_walls,
        }
    }
}

/// Finger-hole notches along the open rim of length dividers and, when
/// enabled, the front wall.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FingerHoles {
    pub cutouts: Vec<Cutout>,
    pub front: bool,
}

impl FingerHoles {
    /// Cap on both percentages so a notch never splits a panel.
    pub const MAX_PERCENT: f64 = 90.0;

    /// One notch per compartment of an `x` long box with `width_count`
    /// width dividers and walls `z` high. Empty unless both percentages are
    /// positive.
    pub fn new(
        x: f64,
        z: f64,
        thickness: f64,
        width_count: u32,
        width_percent: f64,
        height_percent: f64,
        front: bool,
    ) -> Self {
        if width_percent <= 0.0 || height_percent <= 0.0 {
            return Self::default();
        }
        let n = width_count as f64;
        let compartment = (x - thickness * (n + 2.0)) / (n + 1.0);
        let width = compartment * width_percent.min(Self::MAX_PERCENT) / 100.0;
        let depth = (z - thickness) * height_percent.min(Self::MAX_PERCENT) / 100.0;
        let cutouts = (1..=width_count + 1)
            .map(|i| Cutout {
                centre: i as f64 * (compartment + thickness) - compartment / 2.0,
                width,
                depth,
            })
            .collect();
        Self { cutouts, front }
    }

    pub fn is_empty(&self) -> bool {
        self.cutouts.is_empty()
    }
}

/// A panel to be drawn: placement, size and joint codes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSpec {
    pub role: PanelRole,
    pub kind: FaceKind,
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub tab_info: TabBits,
    pub tabbed: TabBits,
}

/// Which way the dividers being drawn run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividerAxis {
    Length,
    Width,
}

pub struct PanelAssembler<'a> {
    edges: EdgeGenerator<'a>,
    keying: DividerKeying,
    finger_holes: FingerHoles,
}

impl<'a> PanelAssembler<'a> {
    pub fn new(edges: EdgeGenerator<'a>, keying: DividerKeying) -> Self {
        Self {
            edges,
            keying,
            finger_holes: FingerHoles::default(),
        }
    }

    pub fn with_finger_holes(mut self, finger_holes: FingerHoles) -> Self {
        self.finger_holes = finger_holes;
        self
    }

    pub fn keying(&self) -> &DividerKeying {
        &self.keying
    }

    /// Draw a shell face, with key-holes for any dividers that meet it.
    pub fn shell(&self, spec: &PanelSpec) -> Panel {
        let k = &self.keying;
        let keyed = (k.key_floor || spec.kind.is_wall()) && (k.key_walls || spec.kind.is_floor());
        let tabbed = spec.tabbed;
        let count = |n: u32, applies: bool, side: PanelSide| {
            if keyed && applies && tabbed.side(side) {
                n
            } else {
                0
            }
        };

        let along_x = count(k.length_count, spec.kind.y_holes(), PanelSide::Top);
        let along_y = count(k.width_count, spec.kind.x_holes(), PanelSide::Right);
        // opposite sides only key when their partner did not
        let bottom = if tabbed.top() {
            0
        } else {
            count(k.length_count, spec.kind.y_holes(), PanelSide::Bottom)
        };
        let left = if tabbed.right() {
            0
        } else {
            count(k.width_count, spec.kind.x_holes(), PanelSide::Left)
        };

        let holes_per_side = [along_x, along_y, bottom, left];
        let rim = match spec.role {
            PanelRole::Shell(face @ Face::Front) if self.finger_holes.front => face.rim_side(),
            _ => None,
        };
        self.assemble(spec, tabbed, false, rim, |side| {
            let i = side as usize;
            let spacing = match side {
                PanelSide::Top | PanelSide::Bottom => k.y_spacing,
                PanelSide::Right | PanelSide::Left => k.x_spacing,
            };
            (holes_per_side[i], spacing)
        })
    }

    /// Draw one divider modelled on a shell panel. Length-axis dividers take
    /// their shape from the back wall, width-axis dividers from the left wall.
    pub fn divider(&self, template: &PanelSpec, axis: DividerAxis, origin: Point) -> Panel {
        let k = &self.keying;
        let horizontal = TabBits::TOP | TabBits::BOTTOM;
        let vertical = TabBits::RIGHT | TabBits::LEFT;

        let mut spec = PanelSpec { origin, ..*template };
        let (h_keyed, v_keyed) = match axis {
            DividerAxis::Length => {
                spec.role = PanelRole::LengthDivider;
                // unkeyed sides sit flush on the base line
                if !k.key_floor {
                    spec.tab_info = spec.tab_info.with(horizontal);
                    spec.tabbed = spec.tabbed.without(horizontal);
                }
                if !k.key_walls {
                    spec.tab_info = spec.tab_info.with(vertical);
                    spec.tabbed = spec.tabbed.without(vertical);
                }
                (k.key_floor, k.key_walls)
            }
            DividerAxis::Width => {
                spec.role = PanelRole::WidthDivider;
                (k.key_walls, k.key_floor)
            }
        };

        let mut drawn = spec.tabbed;
        if !h_keyed {
            drawn = drawn.without(horizontal);
        }
        if !v_keyed {
            drawn = drawn.without(vertical);
        }

        // length dividers share the back wall's rim; width dividers run the
        // other way and are never notched
        let rim = match (axis, template.role) {
            (DividerAxis::Length, PanelRole::Shell(face)) => face
                .rim_side()
                .filter(|s| matches!(s, PanelSide::Top | PanelSide::Bottom)),
            _ => None,
        };

        self.assemble(&spec, drawn, true, rim, |side| match (axis, side) {
            (DividerAxis::Length, PanelSide::Right) => (
                if spec.kind.x_holes() { k.width_count } else { 0 },
                k.x_spacing,
            ),
            (DividerAxis::Width, PanelSide::Top) => (
                if spec.kind.y_holes() { k.length_count } else { 0 },
                k.y_spacing,
            ),
            _ => (0, 0.0),
        })
    }

    /// Chain the four sides. Only sides set in `drawn` deflect. `rim` names
    /// the side that takes finger-hole notches, and `per_side` yields the
    /// number of divider features on a side and their pitch.
    fn assemble<F>(
        &self,
        spec: &PanelSpec,
        drawn: TabBits,
        is_divider: bool,
        rim: Option<PanelSide>,
        per_side: F,
    ) -> Panel
    where
        F: Fn(PanelSide) -> (u32, f64),
    {
        let t = self.edges.joint().thickness;
        let info = spec.tab_info;
        let mut holes = Vec::new();
        let mut outline: Option<Path> = None;

        for side in PanelSide::ALL {
            let (num_dividers, divider_spacing) = per_side(side);
            let frame = side_frame(side, spec.origin, spec.width, spec.height, info);
            let carries = info.side(side);
            let tab_vec = if drawn.side(side) {
                let sign = if carries { side.outward() } else { -side.outward() };
                sign * t
            } else {
                0.0
            };
            let cutouts = if rim == Some(side) && !self.finger_holes.is_empty() {
                if drawn.side(side) {
                    debug!("{} rim is jointed, finger holes skipped", spec.role.label());
                    Vec::new()
                } else {
                    self.finger_holes.cutouts.clone()
                }
            } else {
                Vec::new()
            };
            let edge = Edge {
                root: frame.root,
                start_offset: frame.start,
                end_offset: frame.end,
                tab_vec,
                length: frame.length,
                direction: frame.direction,
                is_tab: carries,
                is_divider,
                num_dividers,
                divider_spacing,
                prev_tabbed: drawn.side(side.previous()),
                cutouts,
            };
            let path = self.edges.draw(&edge, &mut holes);
            match outline.as_mut() {
                Some(o) => o.append(path),
                None => outline = Some(path),
            }
        }

        let outline = outline.unwrap_or_else(|| Path::new(spec.origin));
        debug!(
            "Panel {} at ({:.2}, {:.2}): {} segments, {} holes",
            spec.role.label(),
            spec.origin.x,
            spec.origin.y,
            outline.len(),
            holes.len()
        );

        Panel {
            role: spec.role,
            kind: spec.kind,
            origin: spec.origin,
            width: spec.width,
            height: spec.height,
            tab_info: info,
            tabbed: drawn,
            outline,
            holes,
            circles: Vec::new(),
        }
    }
}

struct SideFrame {
    root: Point,
    start: Point,
    end: Point,
    length: f64,
    direction: Direction,
}

/// Corner placement of one side. A tab-carrying neighbour pulls the corner
/// in by one thickness so the sides meet.
fn side_frame(side: PanelSide, origin: Point, dx: f64, dy: f64, info: TabBits) -> SideFrame {
    let bit = |b: bool| if b { 1.0 } else { 0.0 };
    let (a, b, c, d) = (bit(info.top()), bit(info.right()), bit(info.bottom()), bit(info.left()));
    let (x, y) = (origin.x, origin.y);
    match side {
        PanelSide::Top => SideFrame {
            root: Point::new(x, y),
            start: Point::new(d, a),
            end: Point::new(-b, a),
            length: dx,
            direction: Direction::Right,
        },
        PanelSide::Right => SideFrame {
            root: Point::new(x + dx, y),
            start: Point::new(-b, a),
            end: Point::new(-b, -c),
            length: dy,
            direction: Direction::Down,
        },
        PanelSide::Bottom => SideFrame {
            root: Point::new(x + dx, y + dy),
            start: Point::new(-b, -c),
            end: Point::new(d, -c),
            length: dx,
            direction: Direction::Left,
        },
        PanelSide::Left => SideFrame {
            root: Point::new(x, y + dy),
            start: Point::new(d, -c),
            end: Point::new(d, a),
            length: dy,
            direction: Direction::Up,
        },
    }
}
