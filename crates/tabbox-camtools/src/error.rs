//! Error types for the box generator.
//!
//! Parameter problems are collected as [`ConstraintError`]s so a caller sees
//! every violated constraint at once rather than only the first.

use std::fmt;
use std::io;
use thiserror::Error;

/// A single violated constraint on box parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    /// A dimension is zero, negative, or outside the supported range.
    #[error("Dimension '{name}' ({value}) {reason}")]
    Dimension {
        name: String,
        value: f64,
        reason: String,
    },

    /// The tab width does not fit the box or the material.
    #[error("Tab error: {0}")]
    Tab(String),

    /// Material thickness or kerf is out of proportion to the box.
    #[error("Material error: {0}")]
    Material(String),

    /// Sheet spacing between panels is unusable.
    #[error("Spacing error: {0}")]
    Spacing(String),
}

/// Every constraint a parameter set violates. Never empty.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid box parameters: {}", DisplayList(.0))]
pub struct ValidationErrors(pub Vec<ConstraintError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ConstraintError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct DisplayList<'a>(&'a [ConstraintError]);

impl fmt::Display for DisplayList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

/// Errors that can occur while generating or exporting a box.
#[derive(Error, Debug)]
pub enum CamToolError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for box generation.
pub type CamToolResult<T> = Result<T, CamToolError>;
