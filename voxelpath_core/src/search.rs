// A* search driver over a voxel grid.
//
// Runs A* from a start cell toward a `Goal`, expanding cells through one of
// two movement topologies:
//
// - **Ground** (`MovementMode::Ground`): the 8 horizontal neighbors at the
//   same height, the same 8 one step up or one step down, and straight up /
//   straight down. Every destination must be walkable (solid footing, clear
//   feet and head). Stepping up additionally needs headroom two cells above
//   the current cell. Vertical steps cost `VERTICAL_STEP_COST` on top of the
//   horizontal cost.
// - **Flight** (`MovementMode::Flight`): all 26 neighbors of the 3x3x3 cube.
//   A destination is valid when it and the cell above it are passable; no
//   footing needed. Cost is 1, sqrt(2) or sqrt(3) by the number of axes the
//   step moves along.
//
// A `Search` is a single-use state machine:
//
//   Ready -> Running -> Succeeded
//                    -> Failed(Exhausted | NodeLimit | TimedOut | Cancelled)
//
// Termination is guaranteed by the node budget and the wall-clock deadline.
// The cancel token and the deadline are polled every
// `CANCEL_CHECK_INTERVAL` expansions rather than every iteration, which
// keeps clock reads out of the hot loop at the price of a little latency.
//
// See also: `node_table.rs` for relaxation, `open_set.rs` for the heap,
// `goal.rs` for the heuristics, `path.rs` for the result type.

use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::coord_key::is_packable;
use crate::goal::Goal;
use crate::node_table::{NodeId, NodeTable};
use crate::open_set::OpenSet;
use crate::path::{FailureReason, PathResult, reconstruct_path};
use crate::types::{MovementMode, VoxelCoord};
use crate::world::GridAccess;
use log::{debug, trace};
use smallvec::SmallVec;
use std::f64::consts::SQRT_2;
use std::time::{Duration, Instant};

/// Expansions between polls of the cancel token and the deadline.
pub const CANCEL_CHECK_INTERVAL: u32 = 256;

pub const CARDINAL_COST: f64 = 1.0;
pub const DIAGONAL_2D_COST: f64 = SQRT_2;
pub const DIAGONAL_3D_COST: f64 = 1.732_050_807_568_877_2;
/// Extra cost of changing height by one cell in ground mode.
pub const VERTICAL_STEP_COST: f64 = 1.2;

const INITIAL_OPEN_CAPACITY: usize = 1024;
const INITIAL_TABLE_CAPACITY: usize = 4096;

/// Horizontal ground moves: (dx, dz, cost). Cardinals first.
const HORIZONTAL_OFFSETS: [(i32, i32, f64); 8] = [
    (1, 0, CARDINAL_COST),
    (-1, 0, CARDINAL_COST),
    (0, 1, CARDINAL_COST),
    (0, -1, CARDINAL_COST),
    (1, 1, DIAGONAL_2D_COST),
    (1, -1, DIAGONAL_2D_COST),
    (-1, 1, DIAGONAL_2D_COST),
    (-1, -1, DIAGONAL_2D_COST),
];

/// Flight moves: (dx, dy, dz, cost) for the 26 cells around the origin.
const FLIGHT_OFFSETS: [(i32, i32, i32, f64); 26] = flight_offsets();

const fn flight_offsets() -> [(i32, i32, i32, f64); 26] {
    let mut out = [(0, 0, 0, 0.0); 26];
    let mut i = 0;
    let mut dx = -1;
    while dx <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dz = -1;
            while dz <= 1 {
                if dx != 0 || dy != 0 || dz != 0 {
                    let axes = (dx != 0) as u32 + (dy != 0) as u32 + (dz != 0) as u32;
                    let cost = match axes {
                        1 => CARDINAL_COST,
                        2 => DIAGONAL_2D_COST,
                        _ => DIAGONAL_3D_COST,
                    };
                    out[i] = (dx, dy, dz, cost);
                    i += 1;
                }
                dz += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Movement topology
// ---------------------------------------------------------------------------

/// A reachable neighbor cell and the cost of the step to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub coord: VoxelCoord,
    pub cost: f64,
}

/// Every cell reachable from `from` in one step under `mode`.
///
/// Cells outside the packable key range count as impassable. `from` itself
/// must be packable, which keeps every offset below clear of `i32` overflow.
pub fn neighbors<W: GridAccess + ?Sized>(
    world: &W,
    from: VoxelCoord,
    mode: MovementMode,
) -> SmallVec<[Neighbor; 26]> {
    let mut out: SmallVec<[Neighbor; 26]> = SmallVec::new();
    match mode {
        MovementMode::Flight => {
            for &(dx, dy, dz, cost) in &FLIGHT_OFFSETS {
                let n = from.offset(dx, dy, dz);
                if world.is_passable(n) && world.is_passable(n.up()) {
                    out.push(Neighbor { coord: n, cost });
                }
            }
        }
        MovementMode::Ground => {
            let headroom = world.is_passable(from.offset(0, 2, 0));
            for &(dx, dz, cost) in &HORIZONTAL_OFFSETS {
                let level = from.offset(dx, 0, dz);
                if world.is_walkable(level) {
                    out.push(Neighbor { coord: level, cost });
                }
                let up = level.up();
                if headroom && world.is_walkable(up) {
                    out.push(Neighbor {
                        coord: up,
                        cost: cost + VERTICAL_STEP_COST,
                    });
                }
                let down = level.down();
                if world.is_walkable(down) {
                    out.push(Neighbor {
                        coord: down,
                        cost: cost + VERTICAL_STEP_COST,
                    });
                }
            }
            if world.is_walkable(from.down()) {
                out.push(Neighbor {
                    coord: from.down(),
                    cost: VERTICAL_STEP_COST,
                });
            }
            if headroom && world.is_walkable(from.up()) {
                out.push(Neighbor {
                    coord: from.up(),
                    cost: VERTICAL_STEP_COST,
                });
            }
        }
    }
    out.retain(|n| is_packable(n.coord));
    out
}

/// Cost of moving from `from` to `to` under `mode`.
///
/// Adjacent cells use the topology's step cost; anything farther apart is
/// charged its Euclidean distance.
pub fn step_cost(from: VoxelCoord, to: VoxelCoord, mode: MovementMode) -> f64 {
    let dx = to.x.abs_diff(from.x);
    let dy = to.y.abs_diff(from.y);
    let dz = to.z.abs_diff(from.z);
    if dx > 1 || dy > 1 || dz > 1 {
        let (fx, fy, fz) = (f64::from(dx), f64::from(dy), f64::from(dz));
        return (fx * fx + fy * fy + fz * fz).sqrt();
    }
    match mode {
        MovementMode::Flight => match dx + dy + dz {
            0 => 0.0,
            1 => CARDINAL_COST,
            2 => DIAGONAL_2D_COST,
            _ => DIAGONAL_3D_COST,
        },
        MovementMode::Ground => {
            let horizontal = match dx + dz {
                0 => 0.0,
                1 => CARDINAL_COST,
                _ => DIAGONAL_2D_COST,
            };
            if dy == 0 {
                horizontal
            } else {
                horizontal + VERTICAL_STEP_COST
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Search state machine
// ---------------------------------------------------------------------------

/// Lifecycle of a `Search`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Ready,
    Running,
    Succeeded,
    Failed(FailureReason),
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

/// One A* search. Owns all search-local state; dropped when the result is
/// produced.
pub struct Search<'w, W: GridAccess + ?Sized> {
    world: &'w W,
    start: VoxelCoord,
    goal: Goal,
    mode: MovementMode,
    max_nodes: u32,
    cancel: CancelToken,
    table: NodeTable,
    open: OpenSet,
    nodes_evaluated: u32,
    started: Instant,
    /// `None` when the timeout is too large to represent as an `Instant`.
    deadline: Option<Instant>,
    state: SearchState,
    goal_node: Option<NodeId>,
}

impl<'w, W: GridAccess + ?Sized> Search<'w, W> {
    /// Prepare a search. The wall clock starts here.
    pub fn new(
        world: &'w W,
        start: VoxelCoord,
        goal: Goal,
        config: &SearchConfig,
        cancel: &CancelToken,
    ) -> Self {
        let started = Instant::now();
        Self {
            world,
            start,
            goal,
            mode: config.mode,
            max_nodes: config.max_nodes,
            cancel: cancel.clone(),
            table: NodeTable::with_capacity(INITIAL_TABLE_CAPACITY),
            open: OpenSet::with_capacity(INITIAL_OPEN_CAPACITY),
            nodes_evaluated: 0,
            started,
            deadline: started.checked_add(Duration::from_millis(config.timeout_ms)),
            state: SearchState::Ready,
            goal_node: None,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn nodes_evaluated(&self) -> u32 {
        self.nodes_evaluated
    }

    /// Advance by one transition (seeding, or one loop iteration). No-op
    /// once terminal.
    pub fn step(&mut self) -> SearchState {
        match self.state {
            SearchState::Ready => self.begin(),
            SearchState::Running => self.iterate(),
            SearchState::Succeeded | SearchState::Failed(_) => {}
        }
        self.state
    }

    /// Drive the search to a terminal state and build the result.
    pub fn run(mut self) -> PathResult {
        trace!(
            "[Search] start={} goal={} mode={} max_nodes={}",
            self.start, self.goal, self.mode, self.max_nodes
        );
        while !self.step().is_terminal() {}
        self.into_result()
    }

    fn begin(&mut self) {
        if !is_packable(self.start) {
            debug!("[Search] start {} is outside the searchable range", self.start);
            self.state = SearchState::Failed(FailureReason::Exhausted);
            return;
        }
        let h = self.goal.heuristic(self.start);
        let id = self.table.insert(self.start, 0.0, h, None);
        if self.goal.is_reached(self.start) {
            // Counts as one evaluation even though nothing was queued.
            self.nodes_evaluated = 1;
            self.goal_node = Some(id);
            self.state = SearchState::Succeeded;
            return;
        }
        self.open.insert(self.table.nodes_mut(), id);
        self.state = SearchState::Running;
    }

    fn iterate(&mut self) {
        if self.open.is_empty() {
            self.state = SearchState::Failed(FailureReason::Exhausted);
            return;
        }
        if self.nodes_evaluated >= self.max_nodes {
            self.state = SearchState::Failed(FailureReason::NodeLimit);
            return;
        }
        if self.nodes_evaluated % CANCEL_CHECK_INTERVAL == 0 {
            if self.cancel.is_cancelled() {
                self.state = SearchState::Failed(FailureReason::Cancelled);
                return;
            }
            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                self.state = SearchState::Failed(FailureReason::TimedOut);
                return;
            }
        }

        let Some(current) = self.open.pop_min(self.table.nodes_mut()) else {
            self.state = SearchState::Failed(FailureReason::Exhausted);
            return;
        };
        self.nodes_evaluated += 1;

        let node = self.table.node(current);
        let coord = node.coord();
        let g = node.g;
        if self.goal.is_reached(coord) {
            self.goal_node = Some(current);
            self.state = SearchState::Succeeded;
            return;
        }

        let goal = self.goal;
        for n in neighbors(self.world, coord, self.mode) {
            self.table
                .relax(&mut self.open, n.coord, g + n.cost, current, |c| goal.heuristic(c));
        }
    }

    fn into_result(self) -> PathResult {
        let time_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let result = match (self.state, self.goal_node) {
            (SearchState::Succeeded, Some(goal)) => PathResult::found(
                reconstruct_path(&self.table, goal),
                self.nodes_evaluated,
                time_ms,
            ),
            (SearchState::Failed(reason), _) => {
                PathResult::failure(reason, self.nodes_evaluated, time_ms)
            }
            // `run` only stops on a terminal state, and success always
            // records the goal node.
            _ => PathResult::failure(FailureReason::Exhausted, self.nodes_evaluated, time_ms),
        };
        match result.failure {
            None => debug!(
                "[Search] found {} waypoints to {} after {} nodes in {} ms",
                result.path.len(),
                self.goal,
                result.nodes_evaluated,
                result.time_ms
            ),
            Some(reason) => debug!(
                "[Search] FAILED ({}) toward {} after {} nodes in {} ms",
                reason, self.goal, result.nodes_evaluated, result.time_ms
            ),
        }
        result
    }
}

/// Run one search to completion.
pub fn find_path<W: GridAccess + ?Sized>(
    world: &W,
    start: VoxelCoord,
    goal: Goal,
    config: &SearchConfig,
    cancel: &CancelToken,
) -> PathResult {
    Search::new(world, start, goal, config, cancel).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord_key::HORIZONTAL_MAX;
    use crate::types::VoxelType;
    use crate::world::VoxelWorld;

    fn config(mode: MovementMode) -> SearchConfig {
        SearchConfig {
            mode,
            ..SearchConfig::default()
        }
    }

    /// Flat solid floor at `floor_y`, two air layers above it.
    fn platform(min_x: i32, min_z: i32, size: u32, floor_y: i32) -> VoxelWorld {
        let mut world = VoxelWorld::with_origin(VoxelCoord::new(min_x, floor_y, min_z), size, 3, size);
        let max = size as i32 - 1;
        world.fill(
            VoxelCoord::new(min_x, floor_y, min_z),
            VoxelCoord::new(min_x + max, floor_y, min_z + max),
            VoxelType::Solid,
        );
        world
    }

    fn search(world: &VoxelWorld, start: VoxelCoord, goal: Goal, cfg: &SearchConfig) -> PathResult {
        find_path(world, start, goal, cfg, &CancelToken::new())
    }

    #[test]
    fn flight_offsets_cover_the_cube() {
        assert_eq!(FLIGHT_OFFSETS.len(), 26);
        let cardinals = FLIGHT_OFFSETS.iter().filter(|o| o.3 == CARDINAL_COST).count();
        let edges = FLIGHT_OFFSETS.iter().filter(|o| o.3 == DIAGONAL_2D_COST).count();
        let corners = FLIGHT_OFFSETS.iter().filter(|o| o.3 == DIAGONAL_3D_COST).count();
        assert_eq!((cardinals, edges, corners), (6, 12, 8));
        assert!(!FLIGHT_OFFSETS.iter().any(|o| o.0 == 0 && o.1 == 0 && o.2 == 0));
    }

    #[test]
    fn ground_neighbors_on_open_floor() {
        let world = platform(-2, -2, 5, 0);
        let n = neighbors(&world, VoxelCoord::new(0, 1, 0), MovementMode::Ground);
        assert_eq!(n.len(), 8);
        assert!(n.iter().all(|n| n.coord.y == 1));
    }

    #[test]
    fn flight_neighbors_in_open_air() {
        let world = VoxelWorld::new(5, 5, 5);
        let n = neighbors(&world, VoxelCoord::new(2, 2, 2), MovementMode::Flight);
        assert_eq!(n.len(), 26);
    }

    #[test]
    fn step_cost_by_topology() {
        let o = VoxelCoord::new(0, 0, 0);
        assert_eq!(step_cost(o, VoxelCoord::new(1, 0, 0), MovementMode::Ground), 1.0);
        let step_up = step_cost(o, VoxelCoord::new(1, 1, 0), MovementMode::Ground);
        assert!((step_up - 2.2).abs() < 1e-12);
        assert_eq!(step_cost(o, VoxelCoord::new(0, 1, 0), MovementMode::Ground), 1.2);
        assert_eq!(step_cost(o, VoxelCoord::new(1, 1, 1), MovementMode::Flight), DIAGONAL_3D_COST);
        assert_eq!(step_cost(o, VoxelCoord::new(3, 0, 4), MovementMode::Ground), 5.0);
    }

    #[test]
    fn goal_at_start_succeeds_without_search() {
        let world = platform(0, 0, 3, 0);
        let start = VoxelCoord::new(1, 1, 1);
        let result = search(&world, start, Goal::Block(start), &config(MovementMode::Ground));
        assert!(result.success);
        assert_eq!(result.path, vec![start]);
        assert_eq!(result.nodes_evaluated, 1);
    }

    #[test]
    fn goal_at_start_even_when_start_is_unwalkable() {
        // Goal check happens before any passability query.
        let world = VoxelWorld::new(1, 1, 1);
        let start = VoxelCoord::new(50, 50, 50);
        let result = search(&world, start, Goal::column(50, 50), &config(MovementMode::Ground));
        assert!(result.success);
        assert_eq!(result.path, vec![start]);
    }

    #[test]
    fn platform_diagonal_path() {
        // 5x5 walkable platform standing at y=64.
        let world = platform(0, 0, 5, 63);
        let result = search(
            &world,
            VoxelCoord::new(0, 64, 0),
            Goal::block(4, 64, 4),
            &config(MovementMode::Ground),
        );
        assert!(result.success);
        assert_eq!(result.path.len(), 5);
        assert!(result.nodes_evaluated <= 25);
        assert_eq!(result.start(), Some(VoxelCoord::new(0, 64, 0)));
        assert_eq!(result.end(), Some(VoxelCoord::new(4, 64, 4)));
        for w in result.path.windows(2) {
            assert_eq!((w[1].x - w[0].x, w[1].z - w[0].z), (1, 1));
        }
    }

    #[test]
    fn open_plane_cost_is_octile_optimal() {
        let world = platform(-6, -6, 16, 0);
        let result = search(
            &world,
            VoxelCoord::new(0, 1, 0),
            Goal::block(4, 1, 4),
            &config(MovementMode::Ground),
        );
        assert!(result.success);
        assert!(result.travel_cost(MovementMode::Ground) <= 4.0 * SQRT_2 + 1e-9);
    }

    #[test]
    fn node_cap_of_one() {
        let world = platform(0, 0, 8, 0);
        let cfg = SearchConfig {
            max_nodes: 1,
            ..config(MovementMode::Ground)
        };
        let result = search(&world, VoxelCoord::new(0, 1, 0), Goal::block(7, 1, 7), &cfg);
        assert!(!result.success);
        assert!(result.path.is_empty());
        assert_eq!(result.nodes_evaluated, 1);
        assert_eq!(result.failure, Some(FailureReason::NodeLimit));
    }

    #[test]
    fn enclosed_goal_exhausts_reachable_cells() {
        // A 3x2 pocket of valid flight cells at y=0 (y=1 has no headroom
        // inside the world box), a solid wall at x=3, the goal behind it.
        let mut world = VoxelWorld::new(5, 2, 2);
        world.fill(VoxelCoord::new(3, 0, 0), VoxelCoord::new(3, 1, 1), VoxelType::Solid);
        let result = search(
            &world,
            VoxelCoord::new(0, 0, 0),
            Goal::block(4, 0, 0),
            &config(MovementMode::Flight),
        );
        assert!(!result.success);
        assert!(result.path.is_empty());
        assert_eq!(result.nodes_evaluated, 6);
        assert_eq!(result.failure, Some(FailureReason::Exhausted));
    }

    #[test]
    fn cancelled_before_start() {
        let world = platform(0, 0, 8, 0);
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = find_path(
            &world,
            VoxelCoord::new(0, 1, 0),
            Goal::block(7, 1, 7),
            &config(MovementMode::Ground),
            &cancel,
        );
        assert!(!result.success);
        assert_eq!(result.nodes_evaluated, 0);
        assert_eq!(result.failure, Some(FailureReason::Cancelled));
    }

    #[test]
    fn zero_timeout_times_out() {
        let world = platform(0, 0, 8, 0);
        let cfg = SearchConfig {
            timeout_ms: 0,
            ..config(MovementMode::Ground)
        };
        let result = search(&world, VoxelCoord::new(0, 1, 0), Goal::block(7, 1, 7), &cfg);
        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureReason::TimedOut));
    }

    /// A one-cell-wide floor straddling the positive edge of the packable
    /// x range: x in `HORIZONTAL_MAX - 2 ..= HORIZONTAL_MAX + 3`.
    fn packable_edge_strip() -> VoxelWorld {
        let min_x = HORIZONTAL_MAX - 2;
        let mut world = VoxelWorld::with_origin(VoxelCoord::new(min_x, 0, 0), 6, 3, 1);
        world.fill(
            VoxelCoord::new(min_x, 0, 0),
            VoxelCoord::new(min_x + 5, 0, 0),
            VoxelType::Solid,
        );
        world
    }

    #[test]
    fn cells_past_the_packable_edge_are_impassable() {
        let world = packable_edge_strip();
        let edge = VoxelCoord::new(HORIZONTAL_MAX, 1, 0);
        let n = neighbors(&world, edge, MovementMode::Ground);
        let coords: Vec<_> = n.iter().map(|n| n.coord).collect();
        assert_eq!(coords, vec![VoxelCoord::new(HORIZONTAL_MAX - 1, 1, 0)]);

        // The goal is walkable, but only through cells that cannot be keyed.
        let result = search(
            &world,
            edge,
            Goal::block(HORIZONTAL_MAX + 2, 1, 0),
            &config(MovementMode::Ground),
        );
        assert_eq!(result.failure, Some(FailureReason::Exhausted));
        assert_eq!(result.nodes_evaluated, 3);
        assert!(result.path.is_empty());
    }

    #[test]
    fn search_up_to_the_packable_edge_succeeds() {
        let world = packable_edge_strip();
        let result = search(
            &world,
            VoxelCoord::new(HORIZONTAL_MAX, 1, 0),
            Goal::block(HORIZONTAL_MAX - 2, 1, 0),
            &config(MovementMode::Ground),
        );
        assert!(result.success);
        assert_eq!(
            result.path,
            vec![
                VoxelCoord::new(HORIZONTAL_MAX, 1, 0),
                VoxelCoord::new(HORIZONTAL_MAX - 1, 1, 0),
                VoxelCoord::new(HORIZONTAL_MAX - 2, 1, 0),
            ]
        );
    }

    #[test]
    fn start_outside_the_packable_range_fails() {
        let world = packable_edge_strip();
        let start = VoxelCoord::new(HORIZONTAL_MAX + 1, 1, 0);
        let result = search(&world, start, Goal::Block(start), &config(MovementMode::Ground));
        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureReason::Exhausted));
        assert_eq!(result.nodes_evaluated, 0);
    }

    #[test]
    fn goal_at_the_far_end_of_the_i32_range_does_not_overflow() {
        let world = platform(-2, -2, 5, 0);
        let start = VoxelCoord::new(-2, 1, 0);
        let goal = Goal::column(i32::MAX, 0);
        let result = search(&world, start, goal, &config(MovementMode::Ground));
        assert_eq!(result.failure, Some(FailureReason::Exhausted));
        assert_eq!(result.nodes_evaluated, 25);

        let a = VoxelCoord::new(i32::MAX, 0, i32::MIN);
        let b = VoxelCoord::new(i32::MIN, 0, i32::MAX);
        assert!(step_cost(a, b, MovementMode::Flight).is_finite());
    }

    #[test]
    fn ground_steps_up_one_block() {
        let mut world = VoxelWorld::new(6, 4, 1);
        world.fill(VoxelCoord::new(0, 0, 0), VoxelCoord::new(5, 0, 0), VoxelType::Solid);
        world.fill(VoxelCoord::new(3, 1, 0), VoxelCoord::new(5, 1, 0), VoxelType::Solid);
        let result = search(
            &world,
            VoxelCoord::new(0, 1, 0),
            Goal::block(5, 2, 0),
            &config(MovementMode::Ground),
        );
        assert!(result.success);
        assert_eq!(result.path.len(), 6);
        assert!(result.path.windows(2).any(|w| w[1].y == w[0].y + 1));
    }

    #[test]
    fn ground_cannot_climb_two_blocks() {
        let mut world = VoxelWorld::new(6, 5, 1);
        world.fill(VoxelCoord::new(0, 0, 0), VoxelCoord::new(5, 0, 0), VoxelType::Solid);
        world.fill(VoxelCoord::new(3, 1, 0), VoxelCoord::new(3, 2, 0), VoxelType::Solid);
        let result = search(
            &world,
            VoxelCoord::new(0, 1, 0),
            Goal::block(5, 1, 0),
            &config(MovementMode::Ground),
        );
        assert!(!result.success);
        assert_eq!(result.failure, Some(FailureReason::Exhausted));
        assert_eq!(result.nodes_evaluated, 3);
    }

    #[test]
    fn ground_step_up_needs_headroom() {
        // Same single step as `ground_steps_up_one_block`, but a ceiling
        // two above the lower floor blocks the jump.
        let mut world = VoxelWorld::new(6, 5, 1);
        world.fill(VoxelCoord::new(0, 0, 0), VoxelCoord::new(5, 0, 0), VoxelType::Solid);
        world.fill(VoxelCoord::new(3, 1, 0), VoxelCoord::new(5, 1, 0), VoxelType::Solid);
        world.fill(VoxelCoord::new(0, 3, 0), VoxelCoord::new(2, 3, 0), VoxelType::Solid);
        let result = search(
            &world,
            VoxelCoord::new(0, 1, 0),
            Goal::block(5, 2, 0),
            &config(MovementMode::Ground),
        );
        assert!(!result.success);
    }

    #[test]
    fn column_goal_accepts_any_height() {
        let mut world = VoxelWorld::new(6, 4, 1);
        world.fill(VoxelCoord::new(0, 0, 0), VoxelCoord::new(5, 0, 0), VoxelType::Solid);
        world.fill(VoxelCoord::new(3, 1, 0), VoxelCoord::new(5, 1, 0), VoxelType::Solid);
        let result = search(
            &world,
            VoxelCoord::new(0, 1, 0),
            Goal::column(5, 0),
            &config(MovementMode::Ground),
        );
        assert!(result.success);
        assert_eq!(result.end(), Some(VoxelCoord::new(5, 2, 0)));
    }

    #[test]
    fn flight_takes_space_diagonals() {
        let world = VoxelWorld::new(5, 5, 5);
        let result = search(
            &world,
            VoxelCoord::new(0, 0, 0),
            Goal::block(3, 3, 3),
            &config(MovementMode::Flight),
        );
        assert!(result.success);
        assert_eq!(result.path.len(), 4);
        let cost = result.travel_cost(MovementMode::Flight);
        assert!((cost - 3.0 * DIAGONAL_3D_COST).abs() < 1e-9);
    }

    #[test]
    fn flight_ignores_footing() {
        // No floor at all: ground mode fails, flight succeeds.
        let world = VoxelWorld::new(6, 4, 6);
        let start = VoxelCoord::new(0, 1, 0);
        let goal = Goal::block(5, 2, 5);
        assert!(!search(&world, start, goal, &config(MovementMode::Ground)).success);
        assert!(search(&world, start, goal, &config(MovementMode::Flight)).success);
    }

    #[test]
    fn search_is_deterministic() {
        let mut world = platform(0, 0, 12, 0);
        world.fill(VoxelCoord::new(4, 1, 0), VoxelCoord::new(4, 2, 9), VoxelType::Solid);
        let start = VoxelCoord::new(0, 1, 5);
        let goal = Goal::block(10, 1, 5);
        let cfg = config(MovementMode::Ground);
        let a = search(&world, start, goal, &cfg);
        let b = search(&world, start, goal, &cfg);
        assert!(a.success);
        assert_eq!(a.path, b.path);
        assert_eq!(a.nodes_evaluated, b.nodes_evaluated);
    }

    #[test]
    fn state_machine_transitions() {
        let world = platform(0, 0, 4, 0);
        let mut s = Search::new(
            &world,
            VoxelCoord::new(0, 1, 0),
            Goal::block(1, 1, 0),
            &config(MovementMode::Ground),
            &CancelToken::new(),
        );
        assert_eq!(s.state(), SearchState::Ready);
        assert_eq!(s.step(), SearchState::Running);
        // Expand the start.
        assert_eq!(s.step(), SearchState::Running);
        // Pop the goal.
        assert_eq!(s.step(), SearchState::Succeeded);
        assert_eq!(s.nodes_evaluated(), 2);
        // Terminal states are sticky.
        assert_eq!(s.step(), SearchState::Succeeded);
        let result = s.run();
        assert!(result.success);
        assert_eq!(result.path.len(), 2);
    }
}
