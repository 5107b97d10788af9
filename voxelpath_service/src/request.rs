// Search requests as submitted to the service.
//
// A `SearchRequest` bundles everything one search needs besides the world:
// start cell, goal, budgets, topology and whether to smooth the result.
// Budgets default to `SearchConfig::default()` so scene files and callers
// only name what they change.
//
// See also: `service.rs` which executes requests, the core crate's
// `config.rs` for the defaults.

use serde::{Deserialize, Serialize};
use voxelpath_core::config::{DEFAULT_MAX_NODES, DEFAULT_TIMEOUT_MS, SearchConfig};
use voxelpath_core::goal::Goal;
use voxelpath_core::types::{MovementMode, VoxelCoord};

fn default_max_nodes() -> u32 {
    DEFAULT_MAX_NODES
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub start: VoxelCoord,
    pub goal: Goal,
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub mode: MovementMode,
    /// Run the smoother over a successful result before handing it back.
    #[serde(default)]
    pub smooth: bool,
}

impl SearchRequest {
    /// A ground-mode, unsmoothed request with default budgets.
    pub fn new(start: VoxelCoord, goal: Goal) -> Self {
        Self::with_config(start, goal, &SearchConfig::default())
    }

    /// A request whose budgets and mode come from `config`.
    pub fn with_config(start: VoxelCoord, goal: Goal, config: &SearchConfig) -> Self {
        Self {
            start,
            goal,
            max_nodes: config.max_nodes,
            timeout_ms: config.timeout_ms,
            mode: config.mode,
            smooth: false,
        }
    }

    pub fn mode(mut self, mode: MovementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn max_nodes(mut self, max_nodes: u32) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn smoothed(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_nodes: self.max_nodes,
            timeout_ms: self.timeout_ms,
            mode: self.mode,
        }
    }
}
