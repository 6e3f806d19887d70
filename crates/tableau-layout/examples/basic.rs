//! Example: lay out a small scene with both strategies
//!
//! Run with `RUST_LOG=debug` to see every move and scale.

use tableau_layout::{
    Anchor, BoundingBox, ItemOptions, LayoutConfig, LayoutManager, LayoutStrategy, OutlineAnnotations,
    Rectangle,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Tableau layout v{}", tableau_layout::VERSION);

    // 16:9 frame
    let frame = BoundingBox::new(-7.11, -4.0, 7.11, 4.0);

    let title = Rectangle::new(6.0, 1.0).shared();
    let chart = Rectangle::new(5.0, 4.0).shared();
    let legend = Rectangle::new(2.0, 2.5).shared();
    let note = Rectangle::new(3.0, 0.6).shared();
    let wide = Rectangle::new(30.0, 12.0).shared();

    let mut scene = LayoutManager::new(frame, LayoutConfig::default())?.with_annotations(OutlineAnnotations);
    scene.add(&title, ItemOptions::new().at(Anchor::TopCenter).priority(10));
    scene.add(&chart, ItemOptions::new().priority(8));
    scene.add(&legend, ItemOptions::new().at(Anchor::RightOf).priority(5));
    scene.add(&note, ItemOptions::new().priority(1));
    scene.add(&wide, ItemOptions::new().scale_bounds(0.5, 1.0));

    let report = scene.layout();
    println!("{report}");
    println!("{} debug overlays", scene.get_debug_visuals().len());

    // Same kind of content, packed
    let tiles: Vec<_> = (0..10).map(|_| Rectangle::new(1.2, 0.9).shared()).collect();
    let config = "packing".parse::<LayoutStrategy>().map(|s| LayoutConfig::default().with_strategy(s))?;
    let mut grid = LayoutManager::new(frame, config)?;
    for tile in &tiles {
        grid.add(tile, ItemOptions::default());
    }

    let report = grid.layout();
    println!("{}", report.to_json()?);

    Ok(())
}
