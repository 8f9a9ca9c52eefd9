//! Rack-rail mounting holes for Schroff subrack cases.

use super::types::{SchroffSettings, SCHROFF_RAIL_MOUNT_RADIUS, SCHROFF_ROW_CENTRE_SPACING};
use tabbox_core::{Circle, Point};

/// Mounting holes for a side wall at `panel_index` in drawing order. Only
/// the walls drawn second and fourth carry rails; any other index gets none.
pub fn rail_holes(
    settings: &SchroffSettings,
    panel_index: usize,
    origin: Point,
    panel_width: f64,
    thickness: f64,
) -> Vec<Circle> {
    let inset = settings.rail_mount_depth + thickness;
    let x = match panel_index {
        1 => origin.x + inset,
        3 => origin.x - inset + panel_width,
        _ => return Vec::new(),
    };

    let mut holes = Vec::with_capacity(settings.rows as usize * 2);
    let mut row_start = origin.y + settings.rail_height / 2.0 + thickness;
    for _ in 0..settings.rows {
        // offset holes move toward the row centreline
        let first = row_start + settings.rail_mount_centre_offset;
        let second = first + SCHROFF_ROW_CENTRE_SPACING - settings.rail_mount_centre_offset;
        holes.push(Circle::new(Point::new(x, first), SCHROFF_RAIL_MOUNT_RADIUS));
        holes.push(Circle::new(Point::new(x, second), SCHROFF_RAIL_MOUNT_RADIUS));
        row_start += SCHROFF_ROW_CENTRE_SPACING + settings.row_spacing + settings.rail_height;
    }
    holes
}
