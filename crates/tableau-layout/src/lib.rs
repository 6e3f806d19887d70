//! Tableau Layout Engine
//!
//! Places caller-owned 2D elements inside a rectangular region without
//! overlaps, moving and scaling them as needed. Two strategies are
//! available: constraint-based (preferred positions, priorities, collision
//! resolution) and packing-based (near-square grid).
//!
//! # Example
//! ```rust,ignore
//! use tableau_layout::{Anchor, BoundingBox, ItemOptions, LayoutConfig, LayoutManager, Rectangle};
//!
//! let region = BoundingBox::new(-7.0, -4.0, 7.0, 4.0);
//! let mut manager = LayoutManager::new(region, LayoutConfig::default())?;
//! let title = Rectangle::new(6.0, 1.0).shared();
//! manager.add(&title, ItemOptions::new().at(Anchor::TopCenter).priority(10));
//! let report = manager.layout();
//! println!("{report}");
//! ```

mod collision;
mod config;
mod element;
mod error;
mod item;
mod manager;
mod overlay;
mod position;
mod report;
pub mod strategy;

pub use collision::{Collision, CollisionResolver, PassStats, ResolutionStats, SCALE_STEP};
pub use config::{LayoutConfig, LayoutStrategy};
pub use element::{element_bbox, Element, Rectangle, SharedElement, WeakElement};
pub use error::LayoutError;
pub use item::{ItemId, ItemOptions, LayoutItem};
pub use manager::LayoutManager;
pub use overlay::{AnnotationFactory, Color, OutlineAnnotations, Overlay};
pub use position::{Anchor, PreferredPosition};
pub use report::{ItemReport, LayoutReport};
pub use strategy::{ConstraintBasedStrategy, LayoutContext, PackingBasedStrategy, PlacementStrategy};

pub use tableau_geometry::{BoundingBox, Point};

// Re-export the geometry crate for hosts that need more than the two types
pub use tableau_geometry as geometry;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
