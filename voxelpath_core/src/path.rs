// Search results and path reconstruction.
//
// `PathResult` is the only thing a search hands back to its caller: a
// success flag, the waypoints from start to goal, how many nodes were
// expanded and how long it took. On failure the path is empty and
// `failure` records which budget stopped the search.
//
// `reconstruct_path()` walks the parent links of the node arena from the
// goal node back to the start and reverses them.
//
// See also: `search.rs` which builds results, `smoother.rs` which
// `PathResult::smoothed` delegates to.

use crate::config::SmoothingConfig;
use crate::node_table::{NodeId, NodeTable};
use crate::search::step_cost;
use crate::smoother;
use crate::types::{MovementMode, VoxelCoord};
use crate::world::GridAccess;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a search stopped without reaching its goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// Every reachable cell was expanded; the goal is unreachable.
    Exhausted,
    /// The node-expansion budget ran out first.
    NodeLimit,
    /// The wall-clock budget ran out first.
    TimedOut,
    /// The caller cancelled the search.
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exhausted => "no path",
            Self::NodeLimit => "node limit reached",
            Self::TimedOut => "timed out",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Outcome of one search.
///
/// Invariant: `success` implies a non-empty `path` whose first element is
/// the start cell and whose last element satisfies the goal. Failure implies
/// an empty `path` and `failure.is_some()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub success: bool,
    /// Waypoints from start to goal, inclusive. Empty on failure.
    pub path: Vec<VoxelCoord>,
    /// Number of nodes taken off the open set.
    pub nodes_evaluated: u32,
    /// Wall-clock time spent searching, in milliseconds.
    pub time_ms: u64,
    /// Set exactly when `success` is false.
    pub failure: Option<FailureReason>,
}

impl PathResult {
    pub fn found(path: Vec<VoxelCoord>, nodes_evaluated: u32, time_ms: u64) -> Self {
        debug_assert!(!path.is_empty(), "successful result needs a path");
        Self {
            success: true,
            path,
            nodes_evaluated,
            time_ms,
            failure: None,
        }
    }

    pub fn failure(reason: FailureReason, nodes_evaluated: u32, time_ms: u64) -> Self {
        Self {
            success: false,
            path: Vec::new(),
            nodes_evaluated,
            time_ms,
            failure: Some(reason),
        }
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn start(&self) -> Option<VoxelCoord> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<VoxelCoord> {
        self.path.last().copied()
    }

    /// Sum of per-step movement costs along the path under `mode`.
    /// Non-adjacent waypoints (left by smoothing) count their straight-line
    /// distance.
    pub fn travel_cost(&self, mode: MovementMode) -> f64 {
        self.path
            .windows(2)
            .map(|w| step_cost(w[0], w[1], mode))
            .sum()
    }

    /// A new result with the path run through the smoother. Failures and
    /// paths of two or fewer waypoints come back unchanged.
    pub fn smoothed<W: GridAccess + ?Sized>(
        &self,
        world: &W,
        mode: MovementMode,
        config: &SmoothingConfig,
    ) -> PathResult {
        if !self.success || self.path.len() <= 2 {
            return self.clone();
        }
        PathResult {
            path: smoother::smooth_path(&self.path, world, mode, config),
            ..self.clone()
        }
    }
}

/// Follow parent links from `goal` back to the root and return the cells
/// in start-to-goal order.
pub fn reconstruct_path(table: &NodeTable, goal: NodeId) -> Vec<VoxelCoord> {
    let mut cells = Vec::new();
    let mut current = Some(goal);
    while let Some(id) = current {
        let node = table.node(id);
        cells.push(node.coord());
        current = node.parent;
    }
    cells.reverse();
    cells
}
