//! Layout Configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::overlay::Color;
use crate::LayoutError;

/// Placement algorithm run by [`crate::LayoutManager::layout`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    /// Preferred positions first, then translate/scale conflicts away
    #[default]
    ConstraintBased,
    /// Row-major grid packing for many same-class items
    PackingBased,
}

impl LayoutStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConstraintBased => "constraint_based",
            Self::PackingBased => "packing_based",
        }
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutStrategy {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "constraint_based" | "constraint" => Ok(Self::ConstraintBased),
            "packing_based" | "packing" => Ok(Self::PackingBased),
            _ => Err(LayoutError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Layout manager configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Inset applied to the target region on every side
    pub padding: f64,

    /// Minimum clearance between two items
    pub min_item_padding: f64,

    /// Placement algorithm
    pub strategy: LayoutStrategy,

    /// Upper bound on collision-resolution passes
    pub max_iterations: usize,

    /// Color handed to the annotation factory for overflow markers
    pub overflow_color: Color,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 0.05,
            min_item_padding: 0.02,
            strategy: LayoutStrategy::ConstraintBased,
            max_iterations: 100,
            overflow_color: Color::RED,
        }
    }
}

impl LayoutConfig {
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_min_item_padding(mut self, min_item_padding: f64) -> Self {
        self.min_item_padding = min_item_padding;
        self
    }

    pub fn with_strategy(mut self, strategy: LayoutStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_overflow_color(mut self, color: Color) -> Self {
        self.overflow_color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.padding, 0.05);
        assert_eq!(config.min_item_padding, 0.02);
        assert!(config.min_item_padding < config.padding);
        assert_eq!(config.strategy, LayoutStrategy::ConstraintBased);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("constraint_based".parse::<LayoutStrategy>(), Ok(LayoutStrategy::ConstraintBased));
        assert_eq!("Packing-Based".parse::<LayoutStrategy>(), Ok(LayoutStrategy::PackingBased));
        assert_eq!("packing".parse::<LayoutStrategy>(), Ok(LayoutStrategy::PackingBased));
        assert_eq!(
            "force_directed".parse::<LayoutStrategy>(),
            Err(LayoutError::UnknownStrategy("force_directed".into()))
        );
    }

    #[test]
    fn test_strategy_display_roundtrip() {
        for strategy in [LayoutStrategy::ConstraintBased, LayoutStrategy::PackingBased] {
            assert_eq!(strategy.to_string().parse::<LayoutStrategy>(), Ok(strategy));
        }
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{ "strategy": "packing_based", "max_iterations": 10 }"#).unwrap();
        assert_eq!(config.strategy, LayoutStrategy::PackingBased);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.padding, 0.05);
    }

    #[test]
    fn test_deserialize_unknown_strategy_fails() {
        let result: Result<LayoutConfig, _> = serde_json::from_str(r#"{ "strategy": "spiral" }"#);
        assert!(result.is_err());
    }
}
