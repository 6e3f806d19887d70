//! Debug Overlays and Overflow Annotations
//!
//! Overlays are plain descriptions of shapes. Drawing them is up to the
//! host; the engine only builds them from bounding boxes it already knows.

use serde::{Deserialize, Serialize};
use tableau_geometry::BoundingBox;

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const RED: Color = Color { r: 252, g: 98, b: 85, a: 255 };
    pub const GREEN: Color = Color { r: 131, g: 193, b: 103, a: 255 };
    pub const BLUE: Color = Color { r: 88, g: 196, b: 221, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A shape to draw on top of the laid-out scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Overlay {
    /// Rectangle outline, optionally with a translucent fill
    Outline {
        bbox: BoundingBox,
        color: Color,
        stroke_width: f64,
        fill_opacity: f64,
    },
    /// Bordered rectangle with a text label above it
    Marker {
        bbox: BoundingBox,
        color: Color,
        label: String,
    },
}

impl Overlay {
    pub fn bbox(&self) -> &BoundingBox {
        match self {
            Overlay::Outline { bbox, .. } | Overlay::Marker { bbox, .. } => bbox,
        }
    }
}

/// Produces visual indicators for items that could not be placed.
///
/// Returning `None` means no indicator is available; the engine then records
/// the overflow only in the item's action log and the report.
pub trait AnnotationFactory {
    fn overflow_indicator(&self, bbox: &BoundingBox, color: Color) -> Option<Overlay>;
}

/// Default factory: a bordered marker labelled `OVERFLOW`
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineAnnotations;

impl AnnotationFactory for OutlineAnnotations {
    fn overflow_indicator(&self, bbox: &BoundingBox, color: Color) -> Option<Overlay> {
        Some(Overlay::Marker {
            bbox: *bbox,
            color,
            label: "OVERFLOW".to_string(),
        })
    }
}
