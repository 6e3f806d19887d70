//! Layout Errors

/// Configuration errors. These are the only failures the engine reports;
/// items that cannot be placed degrade to overflow warnings instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid layout region: {width}x{height} (both extents must be positive and finite)")]
    InvalidRegion { width: f64, height: f64 },

    #[error("Unknown layout strategy: {0}")]
    UnknownStrategy(String),
}
