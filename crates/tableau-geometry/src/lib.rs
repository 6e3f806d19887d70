//! Tableau Geometry
//!
//! Plain 2D value types shared by the layout engine.
//!
//! Coordinates are y-up scene units: `y_max` is the top edge of a box.

mod bbox;
mod point;

pub use bbox::BoundingBox;
pub use point::Point;
