//! Finger-joint edge generation.
//!
//! One call to [`EdgeGenerator::draw`] produces the cut path for a single
//! side of a panel. Key-holes for dividers and the slots that let dividers
//! interlock are pushed into a separate list since they are separate cuts.
//! A plain edge may instead carry rounded finger-hole notches.

use super::types::{BoxParameters, TabSymmetry, TabType};
use tabbox_core::{Direction, Path, Point};

/// Joint settings shared by every edge of a box.
#[derive(Debug, Clone, PartialEq)]
pub struct JointSettings {
    pub thickness: f64,
    pub kerf: f64,
    pub tab: f64,
    pub equal_tabs: bool,
    pub symmetry: TabSymmetry,
    pub dogbone: bool,
    pub dimple_height: f64,
    pub dimple_length: f64,
}

impl JointSettings {
    pub fn from_params(params: &BoxParameters) -> Self {
        Self {
            thickness: params.thickness,
            kerf: params.kerf,
            tab: params.tab,
            equal_tabs: params.equal_tabs,
            symmetry: params.tab_symmetry,
            dogbone: params.tab_type == TabType::Dogbone,
            dimple_height: params.dimple_height,
            dimple_length: params.dimple_length,
        }
    }

    /// Split an edge of `length` into alternating tabs and gaps.
    pub fn tab_layout(&self, length: f64) -> TabLayout {
        let rotational = self.symmetry.is_rotational();
        let t = self.thickness;

        let (divisions, tabs) = if rotational {
            let mut d = ((length - 2.0 * t) / self.tab) as i64;
            if d % 2 != 0 {
                d += 1;
            }
            (d, d / 2)
        } else {
            let mut d = (length / self.tab) as i64;
            if d % 2 == 0 {
                d -= 1;
            }
            (d, (d - 1) / 2)
        };

        let (tab_width, gap_width) = if rotational {
            let w = (length - 2.0 * t) / divisions as f64;
            (w, w)
        } else if self.equal_tabs {
            let w = length / divisions as f64;
            (w, w)
        } else {
            let gap = (length - tabs as f64 * self.tab) / (divisions - tabs) as f64;
            (self.tab, gap)
        };

        TabLayout {
            divisions,
            tabs,
            tab_width,
            gap_width,
        }
    }
}

/// Tab/gap split of one edge before kerf correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabLayout {
    /// Number of alternating tab and gap runs.
    pub divisions: i64,
    pub tabs: i64,
    pub tab_width: f64,
    pub gap_width: f64,
}

impl TabLayout {
    /// Widen tabs and narrow gaps by one kerf on a tab-carrying edge; the
    /// opposite on a receiving edge. The lead-in shifts the first transition
    /// by half a kerf so mating edges stay aligned.
    pub fn kerf_adjusted(&self, kerf: f64, is_tab: bool) -> KerfWidths {
        let half = kerf / 2.0;
        if is_tab {
            KerfWidths {
                tab_width: self.tab_width + kerf,
                gap_width: self.gap_width - kerf,
                lead_in: half,
            }
        } else {
            KerfWidths {
                tab_width: self.tab_width - kerf,
                gap_width: self.gap_width + kerf,
                lead_in: -half,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KerfWidths {
    pub tab_width: f64,
    pub gap_width: f64,
    pub lead_in: f64,
}

/// Rounded finger-hole notch cut into a plain edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutout {
    /// Distance of the notch centre from the edge root.
    pub centre: f64,
    pub width: f64,
    pub depth: f64,
}

/// Everything needed to draw one side of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub root: Point,
    /// Start corner shift, in units of material thickness.
    pub start_offset: Point,
    /// End corner shift, in units of material thickness.
    pub end_offset: Point,
    /// Signed tab depth across the edge; zero for a plain edge.
    pub tab_vec: f64,
    pub length: f64,
    pub direction: Direction,
    /// The edge carries tabs (true) or receives them (false).
    pub is_tab: bool,
    /// The edge belongs to a divider panel.
    pub is_divider: bool,
    pub num_dividers: u32,
    pub divider_spacing: f64,
    /// The side drawn before this one deflects. Rotational corners start on
    /// the root line after a tabbed neighbour.
    pub prev_tabbed: bool,
    /// Notches replacing the edge when it is plain. Sorted by centre.
    pub cutouts: Vec<Cutout>,
}

pub struct EdgeGenerator<'a> {
    joint: &'a JointSettings,
}

impl<'a> EdgeGenerator<'a> {
    pub fn new(joint: &'a JointSettings) -> Self {
        Self { joint }
    }

    pub fn joint(&self) -> &JointSettings {
        self.joint
    }

    /// Draw `edge`, returning its path and appending any key-holes or
    /// divider slots to `holes`.
    pub fn draw(&self, edge: &Edge, holes: &mut Vec<Path>) -> Path {
        let j = self.joint;
        let t = j.thickness;
        let kerf = j.kerf;
        let half_kerf = kerf / 2.0;
        let rotational = j.symmetry.is_rotational();
        let xy = j.symmetry == TabSymmetry::XySymmetric;
        // plain edges have no inside corners to relieve
        let relief = j.dogbone && edge.tab_vec != 0.0;
        let dogbone = if relief { 1.0 } else { 0.0 };
        let tab_flag = if edge.is_tab { 1.0 } else { 0.0 };

        let layout = j.tab_layout(edge.length);
        let widths = layout.kerf_adjusted(kerf, edge.is_tab);
        let (tab_width, gap_width) = (widths.tab_width, widths.gap_width);
        let mut lead_in = widths.lead_in;

        let dir = edge.direction.unit();
        let cross = edge.direction.cross_axis();
        let normal = edge.direction.normal();
        let start = edge.start_offset;
        let mut end_offset = edge.end_offset;
        let mut tab_vec = edge.tab_vec;
        let mut first_hole_len = Point::ZERO;

        let divider_edge_offset;
        let mut cursor;
        let mut path;
        if rotational {
            divider_edge_offset = Point::new(dir.x * t, t);
            let corner = |offset: f64, d: f64| {
                if d != 0.0 && edge.prev_tabbed {
                    0.0
                } else {
                    offset * t
                }
            };
            path = Path::new(Point::new(
                edge.root.x + corner(start.x, dir.x),
                edge.root.y + corner(start.y, dir.y),
            ));
            let shift_or = |offset: f64, d: f64| if offset != 0.0 { offset } else { d };
            cursor = Point::new(
                edge.root.x + shift_or(start.x, dir.x) * t,
                edge.root.y + shift_or(start.y, dir.y) * t,
            );
            // a deflecting edge ends on the root line of the next side
            if edge.tab_vec != 0.0 {
                if cross.x != 0.0 {
                    end_offset.x = 0.0;
                }
                if cross.y != 0.0 {
                    end_offset.y = 0.0;
                }
            }
        } else {
            divider_edge_offset = Point::new(dir.y * t, dir.x * t);
            cursor = edge.root + start * t;
            path = Path::new(cursor);
            // tab runs are measured from the root along the travel axis
            if cross.x != 0.0 {
                cursor.y = edge.root.y;
            }
            if cross.y != 0.0 {
                cursor.x = edge.root.x;
            }
        }

        for division in 1..layout.divisions {
            let odd = division % 2 == 1;
            let leading = division == 1 && xy;

            if odd == edge.is_tab && edge.num_dividers > 0 && !edge.is_divider {
                let mut w = if edge.is_tab { gap_width } else { tab_width };
                if leading {
                    w -= start.x * t;
                }
                let hole_len = dir * (w + lead_in);
                if lead_in != 0.0 {
                    first_hole_len = hole_len;
                }
                let across = Point::new(cross.x * (tab_vec - kerf), cross.y * (tab_vec + kerf));
                for n in 1..=edge.num_dividers {
                    let reach = edge.divider_spacing * n as f64;
                    let mut corner = cursor
                        + normal * reach
                        + Point::new(cross.x * half_kerf, -cross.y * half_kerf)
                        + dir * (dogbone * (half_kerf - lead_in));
                    if leading {
                        corner.x += start.x * t;
                    }
                    holes.push(rectangle(corner, hole_len, across));
                }
            }

            if odd {
                if division == 1 && edge.num_dividers > 0 && edge.is_divider {
                    let run = dir * (lead_in + edge.length / 2.0);
                    for n in 1..=edge.num_dividers {
                        let reach = edge.divider_spacing * n as f64;
                        let corner =
                            cursor + normal * reach - divider_edge_offset + cross * half_kerf;
                        holes.push(rectangle(corner, run, cross * (t - kerf)));
                    }
                }

                let lead = if edge.is_tab && relief { 0.0 } else { lead_in };
                cursor += dir * (gap_width + lead + dogbone * kerf * tab_flag);
                step(&mut path, cursor);
                if relief && edge.is_tab {
                    cursor -= dir * half_kerf;
                    step(&mut path, cursor);
                }
                for p in self.dimple(tab_vec, cursor, edge.direction, 1.0, edge.is_tab) {
                    step(&mut path, p);
                }
                cursor += cross * tab_vec;
                step(&mut path, cursor);
                if relief && !edge.is_tab {
                    cursor -= dir * half_kerf;
                    step(&mut path, cursor);
                }
            } else {
                cursor += dir * (tab_width + dogbone * kerf * (1.0 - tab_flag));
                step(&mut path, cursor);
                if relief && !edge.is_tab {
                    cursor -= dir * half_kerf;
                    step(&mut path, cursor);
                }
                for p in self.dimple(tab_vec, cursor, edge.direction, -1.0, edge.is_tab) {
                    step(&mut path, p);
                }
                cursor += cross * tab_vec;
                step(&mut path, cursor);
                if relief && edge.is_tab {
                    cursor -= dir * half_kerf;
                    step(&mut path, cursor);
                }
            }

            tab_vec = -tab_vec;
            lead_in = 0.0;
        }

        step(&mut path, edge.root + end_offset * t + dir * edge.length);

        // the last gap of a tabbed edge still needs its key-holes
        if edge.is_tab
            && edge.num_dividers > 0
            && xy
            && !edge.is_divider
            && first_hole_len != Point::ZERO
        {
            for n in 1..=edge.num_dividers {
                let reach = edge.divider_spacing * n as f64;
                let corner = Point::new(
                    cursor.x
                        + normal.x * reach
                        + cross.x * half_kerf
                        + dir.x * dogbone * half_kerf
                        - dogbone * lead_in * dir.x,
                    cursor.y + normal.y * reach - divider_edge_offset.y + cross.y * half_kerf,
                );
                holes.push(rectangle(corner, first_hole_len, cross * (t - kerf)));
            }
        }

        if !edge.cutouts.is_empty() && edge.tab_vec == 0.0 {
            return notched(&path, edge);
        }
        path
    }

    /// Friction-fit bump on the side of a tab. Empty when dimples are off or
    /// the edge is plain.
    fn dimple(
        &self,
        tab_vec: f64,
        at: Point,
        direction: Direction,
        dimple_dir: f64,
        is_tab: bool,
    ) -> Vec<Point> {
        let h = self.joint.dimple_height;
        let l = self.joint.dimple_length;
        if h <= 0.0 || tab_vec == 0.0 {
            return Vec::new();
        }
        let dimple_dir = if is_tab { dimple_dir } else { -dimple_dir };
        let dir = direction.unit();
        let cross = direction.cross_axis();
        let (offset, sign) = if tab_vec > 0.0 {
            ((tab_vec - l) / 2.0 - h, 1.0)
        } else {
            ((tab_vec + l) / 2.0 + h, -1.0)
        };

        let mut v = at + cross * offset;
        let mut pts = vec![v];
        v += (cross * sign - dir * dimple_dir) * h;
        pts.push(v);
        v += cross * (sign * l);
        pts.push(v);
        v += (cross * sign + dir * dimple_dir) * h;
        pts.push(v);
        pts
    }
}

/// Extend `path` to `p` unless it is already there.
fn step(path: &mut Path, p: Point) {
    if !path.end().approx_eq(&p, 1e-9) {
        path.line_to(p);
    }
}

/// Redraw the straight `plain` path of `edge` with finger-hole notches.
/// Each notch drops half its depth, rounds across its width and climbs back.
fn notched(plain: &Path, edge: &Edge) -> Path {
    let dir = edge.direction.unit();
    let into = edge.direction.normal();
    let start = plain.start;
    let along = (start.x - edge.root.x) * dir.x + (start.y - edge.root.y) * dir.y;

    let mut path = Path::new(start);
    for c in &edge.cutouts {
        let half = c.depth / 2.0;
        let near = start + dir * (c.centre - c.width / 2.0 - along);
        let far = near + dir * c.width;
        step(&mut path, near);
        step(&mut path, near + into * half);
        path.cubic_to(near + into * c.depth, far + into * c.depth, far + into * half);
        step(&mut path, far);
    }
    step(&mut path, plain.end());
    path
}

/// Closed parallelogram from `corner` spanned by `a` then `b`.
fn rectangle(corner: Point, a: Point, b: Point) -> Path {
    let mut p = Path::new(corner);
    p.line_to(corner + a);
    p.line_to(corner + a + b);
    p.line_to(corner + b);
    p.line_to(corner);
    p
}
