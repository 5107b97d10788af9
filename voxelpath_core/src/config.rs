// Data-driven search and smoothing configuration.
//
// All tunable parameters live here in `PathfinderConfig`, loaded from JSON.
// The search and smoother read their budgets and thresholds from these
// structs instead of hard-coding them. Every field has a serde default, so
// a config file only needs to mention what it changes (`{}` is a valid
// config).
//
// See also: `search.rs` which reads `SearchConfig`, `smoother.rs` which
// reads `SmoothingConfig`, and the service crate which loads the whole
// `PathfinderConfig` at startup.

use crate::types::MovementMode;
use serde::{Deserialize, Serialize};

/// Default node-expansion budget per search.
pub const DEFAULT_MAX_NODES: u32 = 100_000;
/// Default wall-clock budget per search, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Budgets and topology for a single search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of nodes expanded before giving up.
    pub max_nodes: u32,
    /// Wall-clock budget in milliseconds, measured from search start.
    pub timeout_ms: u64,
    /// Neighbor topology.
    pub mode: MovementMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            mode: MovementMode::Ground,
        }
    }
}

/// Thresholds for the four smoothing passes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// How many waypoints ahead the line-of-sight pass looks for a shortcut.
    pub lookahead: usize,
    /// Ground mode only: a shortcut is rejected if any step it replaces
    /// changes height by at least this much.
    pub max_elevation_change: u32,
    /// Longest leg (and longest prev-to-next distance) of a 3-point detour
    /// that the zigzag cleanup will remove.
    pub zigzag_max_span: f64,
    /// Largest |cross product| for which three points count as collinear.
    pub collinear_tolerance: i64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            lookahead: 12,
            max_elevation_change: 2,
            zigzag_max_span: 3.0,
            collinear_tolerance: 1,
        }
    }
}

/// Top-level configuration. Loaded from JSON, never mutated at runtime.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    pub search: SearchConfig,
    pub smoothing: SmoothingConfig,
}

impl PathfinderConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = PathfinderConfig::default();
        let json = config.to_json().unwrap();
        let restored = PathfinderConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config = PathfinderConfig::from_json("{}").unwrap();
        assert_eq!(config.search.max_nodes, DEFAULT_MAX_NODES);
        assert_eq!(config.search.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.search.mode, MovementMode::Ground);
        assert_eq!(config.smoothing.lookahead, 12);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let json = r#"{
            "search": { "max_nodes": 500, "mode": "Flight" },
            "smoothing": { "lookahead": 4 }
        }"#;
        let config = PathfinderConfig::from_json(json).unwrap();
        assert_eq!(config.search.max_nodes, 500);
        assert_eq!(config.search.mode, MovementMode::Flight);
        assert_eq!(config.search.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.smoothing.lookahead, 4);
        assert_eq!(config.smoothing.max_elevation_change, 2);
    }

    #[test]
    fn from_json_rejects_wrong_schema() {
        assert!(PathfinderConfig::from_json(r#"{"search": {"max_nodes": "lots"}}"#).is_err());
        assert!(PathfinderConfig::from_json("not valid json {{{").is_err());
    }
}
