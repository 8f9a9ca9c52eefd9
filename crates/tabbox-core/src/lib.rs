//! # TabBox Core
//!
//! Value types shared by every TabBox crate: 2D points and axis-aligned
//! directions, the paths and circles the generators emit, and
//! unit conversion between millimetres and inches.

pub mod geometry;
pub mod units;

pub use geometry::{Bounds, Circle, Direction, Path, Point, Segment, CURVE_STEPS};
pub use units::{MeasurementSystem, MM_PER_INCH};
