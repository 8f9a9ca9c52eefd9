//! Parameter constraint checks run before generation.

use super::types::BoxParameters;
use crate::error::{ConstraintError, ValidationErrors};

/// Largest supported box dimension, in millimetres.
pub const MAX_DIMENSION: f64 = 10_000.0;

/// Most dividers allowed along either axis.
pub const MAX_DIVIDERS: u32 = 20;

/// Check every constraint and report all violations together.
pub fn validate(params: &BoxParameters) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    let dimension = |name: &str, value: f64, reason: &str| ConstraintError::Dimension {
        name: name.to_string(),
        value,
        reason: reason.to_string(),
    };

    let mut numbers = vec![
        ("length", params.length),
        ("width", params.width),
        ("height", params.height),
        ("thickness", params.thickness),
        ("kerf", params.kerf),
        ("tab", params.tab),
        ("dimple_height", params.dimple_height),
        ("dimple_length", params.dimple_length),
        ("spacing", params.spacing),
        ("cutout_width_percent", params.cutout_width_percent),
        ("cutout_height_percent", params.cutout_height_percent),
    ];
    if let Some(s) = &params.schroff {
        numbers.extend([
            ("rail_height", s.rail_height),
            ("row_spacing", s.row_spacing),
            ("rail_mount_depth", s.rail_mount_depth),
            ("rail_mount_centre_offset", s.rail_mount_centre_offset),
        ]);
    }
    for (name, value) in numbers {
        if !value.is_finite() {
            errors.push(dimension(name, value, "must be a finite number"));
        }
    }
    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    if params.schroff.is_none() {
        for (name, value) in [("length", params.length), ("width", params.width)] {
            if value <= 0.0 {
                errors.push(dimension(name, value, "must be positive"));
            }
        }
    }
    if params.height <= 0.0 {
        errors.push(dimension("height", params.height, "must be positive"));
    }
    for (name, count) in [
        ("dividers_length", params.dividers_length),
        ("dividers_width", params.dividers_width),
    ] {
        if count > MAX_DIVIDERS {
            errors.push(dimension(
                name,
                count as f64,
                &format!("exceeds maximum of {MAX_DIVIDERS}"),
            ));
        }
    }
    for (name, value) in [
        ("cutout_width_percent", params.cutout_width_percent),
        ("cutout_height_percent", params.cutout_height_percent),
    ] {
        if value < 0.0 {
            errors.push(dimension(name, value, "cannot be negative"));
        }
    }
    if let Some(s) = &params.schroff {
        if s.rows == 0 {
            errors.push(dimension("rows", 0.0, "must be at least one"));
        }
        if s.hp == 0 {
            errors.push(dimension("hp", 0.0, "must be at least one"));
        }
    }
    if !errors.is_empty() {
        // derived checks would only repeat these
        return Err(ValidationErrors(errors));
    }

    let (x, y, z) = params.nominal_dimensions();
    let min = x.min(y).min(z);
    let max = x.max(y).max(z);
    let t = params.thickness;

    for (name, value) in [("length", x), ("width", y), ("height", z)] {
        if value > MAX_DIMENSION {
            errors.push(dimension(
                name,
                value,
                &format!("exceeds maximum of {MAX_DIMENSION}"),
            ));
        }
    }

    if min < 3.0 * params.tab {
        errors.push(ConstraintError::Tab(format!(
            "tab width {} is too large for the smallest dimension {min}; at most {}",
            params.tab,
            min / 3.0
        )));
    }
    if params.tab < t {
        errors.push(ConstraintError::Tab(format!(
            "tab width {} is smaller than the material thickness {t}",
            params.tab
        )));
    }

    if t <= 0.0 {
        errors.push(ConstraintError::Material(
            "thickness must be positive".to_string(),
        ));
    } else if t > min / 3.0 {
        errors.push(ConstraintError::Material(format!(
            "thickness {t} is too large for the smallest dimension {min}; at most {}",
            min / 3.0
        )));
    }
    if params.kerf < 0.0 {
        errors.push(ConstraintError::Material("kerf cannot be negative".to_string()));
    } else if params.kerf > min / 3.0 {
        errors.push(ConstraintError::Material(format!(
            "kerf {} is too large for the smallest dimension {min}",
            params.kerf
        )));
    }

    if params.spacing > max * 10.0 {
        errors.push(ConstraintError::Spacing(format!(
            "spacing {} is more than ten times the largest dimension {max}",
            params.spacing
        )));
    }
    if params.spacing < params.kerf {
        errors.push(ConstraintError::Spacing(format!(
            "spacing {} is smaller than the kerf {}",
            params.spacing, params.kerf
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
