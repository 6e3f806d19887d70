//! Layout Manager
//!
//! Entry point: owns the item list for one region, dispatches to the
//! configured strategy and keeps the overflow markers from the last run.

use std::cell::RefCell;
use std::rc::Rc;

use tableau_geometry::BoundingBox;

use crate::config::LayoutConfig;
use crate::element::{Element, SharedElement};
use crate::error::LayoutError;
use crate::item::{ItemId, ItemOptions, LayoutItem};
use crate::overlay::{AnnotationFactory, Color, Overlay};
use crate::report::LayoutReport;
use crate::strategy::{self, LayoutContext};

/// Lays out registered elements inside a fixed region
pub struct LayoutManager {
    region: BoundingBox,
    /// `region` shrunk by `config.padding`
    available_region: BoundingBox,
    config: LayoutConfig,
    items: Vec<LayoutItem>,
    overflow_markers: Vec<Overlay>,
    annotations: Option<Box<dyn AnnotationFactory>>,
}

impl LayoutManager {
    /// Create a manager for `region`. Fails if the region, or what is left
    /// of it after padding, has no positive finite extent.
    pub fn new(region: BoundingBox, config: LayoutConfig) -> Result<Self, LayoutError> {
        if !region.has_positive_extent() {
            return Err(LayoutError::InvalidRegion {
                width: region.width(),
                height: region.height(),
            });
        }
        let available_region = region.expand_by_padding(-config.padding);
        if !available_region.has_positive_extent() {
            return Err(LayoutError::InvalidRegion {
                width: available_region.width(),
                height: available_region.height(),
            });
        }

        tracing::debug!(
            "Layout region {:.2}x{:.2}, available {:.2}x{:.2}",
            region.width(),
            region.height(),
            available_region.width(),
            available_region.height()
        );

        Ok(Self {
            region,
            available_region,
            config,
            items: Vec::new(),
            overflow_markers: Vec::new(),
            annotations: None,
        })
    }

    /// Install a factory for overflow indicators
    pub fn with_annotations(mut self, factory: impl AnnotationFactory + 'static) -> Self {
        self.annotations = Some(Box::new(factory));
        self
    }

    /// Register an element. The manager only keeps a weak handle, so the
    /// caller decides how long the element lives.
    pub fn add<E: Element + 'static>(&mut self, element: &Rc<RefCell<E>>, options: ItemOptions) -> ItemId {
        let shared: SharedElement = element.clone();
        let id = ItemId(self.items.len());
        self.items.push(LayoutItem::new(id, Rc::downgrade(&shared), options));

        tracing::info!(
            "Added item {} (priority {}, {:?})",
            id.0,
            options.priority,
            options.preferred_position
        );
        id
    }

    /// Run the configured strategy over all registered items
    pub fn layout(&mut self) -> LayoutReport {
        tracing::info!(
            "Laying out {} items with {} strategy",
            self.items.len(),
            self.config.strategy
        );

        for item in &mut self.items {
            item.begin_run();
        }
        self.overflow_markers.clear();

        let placement = strategy::for_kind(self.config.strategy);
        let mut ctx = LayoutContext {
            items: &mut self.items,
            region: self.available_region,
            min_item_padding: self.config.min_item_padding,
            max_iterations: self.config.max_iterations,
            overflow_color: self.config.overflow_color,
            annotations: self.annotations.as_deref(),
            overflow_markers: &mut self.overflow_markers,
        };
        let report = placement.layout(&mut ctx);

        tracing::info!(
            "Layout complete: {}/{} placed, {} scaled, {} collisions resolved, {} overflow",
            report.items_placed,
            report.total_items,
            report.items_scaled,
            report.collisions_resolved,
            report.items_with_overflow
        );
        report
    }

    /// Overlay shapes for the current state: the available region, one
    /// outline per placed item, then the overflow markers of the last run.
    pub fn get_debug_visuals(&self) -> Vec<Overlay> {
        let mut visuals = Vec::with_capacity(1 + self.items.len() + self.overflow_markers.len());
        visuals.push(Overlay::Outline {
            bbox: self.available_region,
            color: Color::BLUE,
            stroke_width: 2.0,
            fill_opacity: 0.0,
        });
        visuals.extend(self.items.iter().filter_map(|item| {
            item.bounding_box().map(|bbox| Overlay::Outline {
                bbox,
                color: Color::GREEN,
                stroke_width: 1.0,
                fill_opacity: 0.1,
            })
        }));
        visuals.extend(self.overflow_markers.iter().cloned());
        visuals
    }

    /// Drop all items and overflow markers
    pub fn clear(&mut self) {
        let count = self.items.len();
        self.items.clear();
        self.overflow_markers.clear();
        tracing::info!("Cleared {} items", count);
    }

    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&LayoutItem> {
        self.items.get(id.0)
    }

    /// Mutable access for adjusting placement wishes between runs
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut LayoutItem> {
        self.items.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn region(&self) -> &BoundingBox {
        &self.region
    }

    /// Region every strategy places items into
    pub fn available_region(&self) -> &BoundingBox {
        &self.available_region
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Overflow markers created by the last `layout()`
    pub fn overflow_markers(&self) -> &[Overlay] {
        &self.overflow_markers
    }
}

impl std::fmt::Debug for LayoutManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutManager")
            .field("region", &self.region)
            .field("available_region", &self.available_region)
            .field("config", &self.config)
            .field("items", &self.items.len())
            .field("overflow_markers", &self.overflow_markers.len())
            .field("annotations", &self.annotations.is_some())
            .finish()
    }
}
