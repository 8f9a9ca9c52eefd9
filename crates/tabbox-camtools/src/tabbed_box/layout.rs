//! Sheet placement of the shell panels.
//!
//! A panel's root corner is expressed per axis as a [`GridCell`]: how many
//! sheet spacings plus how many box lengths, widths and heights lie before it.

use super::types::{Face, FacePresence, LayoutStyle};

/// Symbolic offset `spacing * s + X * x + Y * y + Z * z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub spacing: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCell {
    pub const fn new(spacing: i32, x: i32, y: i32, z: i32) -> Self {
        Self { spacing, x, y, z }
    }

    pub fn resolve(&self, spacing: f64, x: f64, y: f64, z: f64) -> f64 {
        self.spacing as f64 * spacing + self.x as f64 * x + self.y as f64 * y + self.z as f64 * z
    }
}

pub const ROW0: GridCell = GridCell::new(1, 0, 0, 0);
pub const ROW1Y: GridCell = GridCell::new(2, 0, 1, 0);
pub const ROW1Z: GridCell = GridCell::new(2, 0, 0, 1);
pub const ROW2: GridCell = GridCell::new(3, 0, 1, 1);

pub const COL0: GridCell = GridCell::new(1, 0, 0, 0);
pub const COL1X: GridCell = GridCell::new(2, 1, 0, 0);
pub const COL1Z: GridCell = GridCell::new(2, 0, 0, 1);
pub const COL2XX: GridCell = GridCell::new(3, 2, 0, 0);
pub const COL2XZ: GridCell = GridCell::new(3, 1, 0, 1);
pub const COL3XZZ: GridCell = GridCell::new(4, 1, 0, 2);
pub const COL3XXZ: GridCell = GridCell::new(4, 2, 0, 1);
pub const COL4: GridCell = GridCell::new(5, 2, 0, 2);
pub const COL5: GridCell = GridCell::new(6, 3, 0, 2);

/// Close the gap left by an omitted panel: every cell after `start` loses
/// one spacing and the given counts of X, Y and Z.
pub fn reduce_offsets(cells: &mut [GridCell], start: usize, dx: i32, dy: i32, dz: i32) {
    for cell in cells.iter_mut().skip(start + 1) {
        cell.spacing -= 1;
        cell.x -= dx;
        cell.y -= dy;
        cell.z -= dz;
    }
}

/// Where one shell face goes on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub face: Face,
    pub column: GridCell,
    pub row: GridCell,
}

/// Placements of the present faces, in drawing order. The first two entries
/// double as the templates for length and width dividers.
pub fn shell_placements(style: LayoutStyle, faces: &FacePresence) -> Vec<Placement> {
    let place = |face, column, row| Placement { face, column, row };
    let mut out = Vec::with_capacity(6);

    match style {
        LayoutStyle::Diagrammatic => {
            let mut rr = [ROW0, ROW1Z, ROW2];
            let mut cc = [COL0, COL1Z, COL2XZ, COL3XZZ];
            if !faces.front {
                reduce_offsets(&mut rr, 0, 0, 0, 1);
            }
            if !faces.left {
                reduce_offsets(&mut cc, 0, 0, 0, 1);
            }
            if !faces.right {
                reduce_offsets(&mut cc, 2, 0, 0, 1);
            }
            let order = [
                (Face::Back, cc[1], rr[2]),
                (Face::Left, cc[0], rr[1]),
                (Face::Bottom, cc[1], rr[1]),
                (Face::Right, cc[2], rr[1]),
                (Face::Top, cc[3], rr[1]),
                (Face::Front, cc[1], rr[0]),
            ];
            for (face, c, r) in order {
                if faces.has(face) {
                    out.push(place(face, c, r));
                }
            }
        }
        LayoutStyle::ThreePiece => {
            let rr = [ROW0, ROW1Y];
            let cc = [COL0, COL1Z];
            let order = [
                (Face::Back, cc[1], rr[1]),
                (Face::Left, cc[0], rr[0]),
                (Face::Bottom, cc[1], rr[0]),
            ];
            for (face, c, r) in order {
                if faces.has(face) {
                    out.push(place(face, c, r));
                }
            }
        }
        LayoutStyle::Inline => {
            let row = ROW0;
            let mut cc = [COL0, COL1X, COL2XX, COL3XXZ, COL4, COL5];
            if !faces.top {
                reduce_offsets(&mut cc, 0, 1, 0, 0);
            }
            if !faces.bottom {
                reduce_offsets(&mut cc, 1, 1, 0, 0);
            }
            if !faces.left {
                reduce_offsets(&mut cc, 2, 0, 0, 1);
            }
            if !faces.right {
                reduce_offsets(&mut cc, 3, 0, 0, 1);
            }
            if !faces.back {
                reduce_offsets(&mut cc, 4, 1, 0, 0);
            }
            let order = [
                (Face::Back, cc[4]),
                (Face::Left, cc[2]),
                (Face::Top, cc[0]),
                (Face::Bottom, cc[1]),
                (Face::Right, cc[3]),
                (Face::Front, cc[5]),
            ];
            for (face, c) in order {
                if faces.has(face) {
                    out.push(place(face, c, row));
                }
            }
        }
    }

    out
}
