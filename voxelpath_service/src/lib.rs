// voxelpath_service: request surface for the voxelpath search core.
//
// Runs searches from `voxelpath_core` on one dedicated worker thread so the
// caller never blocks on A*. Only one search is current at a time: every
// submission cancels the one before it.
//
// Module overview:
// - `request.rs`: SearchRequest: start, goal, budgets, mode, smoothing flag.
// - `service.rs`: PathfinderService (worker thread, submit / is_busy /
//                 cancel / shutdown) and PathHandle (the pending result).
//
// The `pathfind` binary (`main.rs`) runs one request against a JSON scene
// file through the same service.

pub mod request;
pub mod service;

pub use request::SearchRequest;
pub use service::{PathHandle, PathfinderService};
