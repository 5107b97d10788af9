// voxelpath_core: bounded A* search and path smoothing over a 3D voxel grid.
//
// Given read access to a voxel world, a start cell and a goal, this crate
// finds a path under node-count, wall-clock and cancellation budgets, and
// can simplify the result into fewer, straighter waypoints. It owns no
// threads; scheduling searches is the job of the service crate.
//
// Module overview:
// - `types.rs`:      VoxelCoord, MovementMode, VoxelType.
// - `coord_key.rs`:  Packing a VoxelCoord into a u64 node key.
// - `world.rs`:      GridAccess trait + dense in-memory VoxelWorld and its serde description.
// - `goal.rs`:       Goal variants (exact block, any-height column) and their heuristics.
// - `open_set.rs`:   Binary min-heap over node ids with decrease-key.
// - `node_table.rs`: Node arena keyed by packed coordinate, plus edge relaxation.
// - `search.rs`:     Neighbor topologies, step costs and the A* state machine.
// - `path.rs`:       PathResult, FailureReason, parent-link path reconstruction.
// - `smoother.rs`:   Four-pass waypoint simplification with repair.
// - `config.rs`:     PathfinderConfig: search budgets and smoothing thresholds.
// - `cancel.rs`:     CancelToken: shared cooperative cancellation flag.
//
// **Determinism.** For a fixed world, start, goal and config, the search
// expands nodes in the same order and returns the same path every time:
// equal-f ties pop in insertion order. Only the wall-clock budget can make
// two runs differ.

pub mod cancel;
pub mod config;
pub mod coord_key;
pub mod goal;
pub mod node_table;
pub mod open_set;
pub mod path;
pub mod search;
pub mod smoother;
pub mod types;
pub mod world;
