// Search goals: what counts as "arrived" and how far away it still is.
//
// A goal answers two questions about a cell: `is_reached` (stop the search
// here) and `heuristic` (an estimate of the remaining cost). Two variants:
//
// - `Goal::Block`: one exact cell. Heuristic is the 3D octile distance,
//   which is the exact cost of the cheapest 26-neighbor move sequence on an
//   empty grid and so never overestimates.
// - `Goal::Column`: any height at a given (x, z). Height is ignored
//   entirely, so the heuristic is the 2D octile distance over x/z.
//
// Both heuristics stay admissible under ground movement too, since ground
// moves cost at least as much as the flight move with the same offset.
//
// See also: `search.rs` for the move costs these estimates are measured
// against.

use crate::types::VoxelCoord;
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use std::fmt;

/// sqrt(3) - sqrt(2): extra cost of a 3-axis step over a 2-axis step.
const SQRT3_MINUS_SQRT2: f64 = 0.317_837_245_195_782_05;
/// sqrt(2) - 1: extra cost of a 2-axis step over a 1-axis step.
const SQRT2_MINUS_ONE: f64 = 0.414_213_562_373_095_15;

/// Target of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    /// Reach exactly this cell.
    Block(VoxelCoord),
    /// Reach any cell in the vertical column at (x, z).
    Column { x: i32, z: i32 },
}

impl Goal {
    pub fn block(x: i32, y: i32, z: i32) -> Self {
        Self::Block(VoxelCoord::new(x, y, z))
    }

    pub fn column(x: i32, z: i32) -> Self {
        Self::Column { x, z }
    }

    /// Whether `coord` satisfies this goal.
    #[inline]
    pub fn is_reached(&self, coord: VoxelCoord) -> bool {
        match *self {
            Goal::Block(target) => coord == target,
            Goal::Column { x, z } => coord.x == x && coord.z == z,
        }
    }

    /// Admissible estimate of the remaining cost from `coord`.
    #[inline]
    pub fn heuristic(&self, coord: VoxelCoord) -> f64 {
        match *self {
            Goal::Block(target) => octile_3d(
                coord.x.abs_diff(target.x),
                coord.y.abs_diff(target.y),
                coord.z.abs_diff(target.z),
            ),
            Goal::Column { x, z } => {
                octile_2d(coord.x.abs_diff(x), coord.z.abs_diff(z))
            }
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Block(target) => write!(f, "block {target}"),
            Goal::Column { x, z } => write!(f, "column ({x}, *, {z})"),
        }
    }
}

/// Cheapest 26-neighbor cost to cover the given per-axis distances.
///
/// With the distances sorted `a <= b <= c`: `a` three-axis steps, `b - a`
/// two-axis steps and `c - b` one-axis steps.
fn octile_3d(dx: u32, dy: u32, dz: u32) -> f64 {
    let mut d = [dx, dy, dz];
    d.sort_unstable();
    let [a, b, c] = d;
    f64::from(a) * SQRT3_MINUS_SQRT2 + f64::from(b) * SQRT2_MINUS_ONE + f64::from(c)
}

/// Cheapest 8-neighbor cost to cover the given horizontal distances.
fn octile_2d(dx: u32, dz: u32) -> f64 {
    let (lo, hi) = if dx < dz { (dx, dz) } else { (dz, dx) };
    f64::from(lo) * SQRT_2 + f64::from(hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQRT_3: f64 = 1.732_050_807_568_877_2;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn block_goal_reached_only_at_exact_cell() {
        let goal = Goal::block(4, 64, 4);
        assert!(goal.is_reached(VoxelCoord::new(4, 64, 4)));
        assert!(!goal.is_reached(VoxelCoord::new(4, 65, 4)));
        assert!(!goal.is_reached(VoxelCoord::new(3, 64, 4)));
    }

    #[test]
    fn heuristic_handles_opposite_ends_of_the_i32_range() {
        let far = VoxelCoord::new(i32::MIN, i32::MIN, i32::MIN);
        let h = Goal::block(i32::MAX, i32::MAX, i32::MAX).heuristic(far);
        let expected = f64::from(u32::MAX) * SQRT_3;
        assert!((h / expected - 1.0).abs() < 1e-12);
        let h = Goal::column(i32::MAX, 0).heuristic(VoxelCoord::new(-2, 1, 0));
        assert!(approx(h, f64::from(i32::MAX) + 2.0));
    }

    #[test]
    fn column_goal_ignores_height() {
        let goal = Goal::column(-7, 12);
        assert!(goal.is_reached(VoxelCoord::new(-7, -40, 12)));
        assert!(goal.is_reached(VoxelCoord::new(-7, 300, 12)));
        assert!(!goal.is_reached(VoxelCoord::new(-7, 0, 11)));
        assert_eq!(
            goal.heuristic(VoxelCoord::new(0, 0, 0)),
            goal.heuristic(VoxelCoord::new(0, 200, 0))
        );
    }

    #[test]
    fn heuristic_is_zero_at_goal() {
        assert_eq!(Goal::block(1, 2, 3).heuristic(VoxelCoord::new(1, 2, 3)), 0.0);
        assert_eq!(Goal::column(1, 3).heuristic(VoxelCoord::new(1, 99, 3)), 0.0);
    }

    #[test]
    fn block_heuristic_matches_single_steps() {
        let goal = Goal::block(0, 0, 0);
        assert!(approx(goal.heuristic(VoxelCoord::new(1, 0, 0)), 1.0));
        assert!(approx(goal.heuristic(VoxelCoord::new(1, 0, 1)), SQRT_2));
        assert!(approx(goal.heuristic(VoxelCoord::new(1, -1, 1)), SQRT_3));
    }

    #[test]
    fn block_heuristic_is_order_independent() {
        let goal = Goal::block(0, 0, 0);
        let h = goal.heuristic(VoxelCoord::new(2, 5, 9));
        assert!(approx(h, goal.heuristic(VoxelCoord::new(9, 2, 5))));
        assert!(approx(h, goal.heuristic(VoxelCoord::new(-5, -9, 2))));
        // 2 three-axis steps, 3 two-axis steps, 4 one-axis steps.
        assert!(approx(h, 2.0 * SQRT_3 + 3.0 * SQRT_2 + 4.0));
    }

    #[test]
    fn column_heuristic_is_planar_octile() {
        let goal = Goal::column(0, 0);
        // 3 diagonals plus 4 straight steps.
        assert!(approx(goal.heuristic(VoxelCoord::new(7, 10, -3)), 3.0 * SQRT_2 + 4.0));
    }

    #[test]
    fn goal_serializes_with_variant_tag() {
        let goal = Goal::column(3, -4);
        let json = serde_json::to_string(&goal).unwrap();
        let restored: Goal = serde_json::from_str(&json).unwrap();
        assert_eq!(goal, restored);
        let block: Goal = serde_json::from_str(r#"{"Block":{"x":1,"y":2,"z":3}}"#).unwrap();
        assert_eq!(block, Goal::block(1, 2, 3));
    }
}
