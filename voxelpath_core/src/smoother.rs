// Path smoothing: turns a raw cell-by-cell A* path into fewer, straighter
// waypoints without changing its endpoints.
//
// Four passes, each consuming the previous one's output:
//
// 1. **Line of sight.** From each kept waypoint, look up to `lookahead`
//    waypoints ahead (farthest first) and jump to the farthest one with a
//    clear straight line. Ground mode refuses any jump over a stretch whose
//    per-step height change reaches `max_elevation_change`, so shortcuts
//    never cut across a cliff edge.
// 2. **Clean and straighten.** Drop a waypoint that is part of a short
//    back-and-forth zigzag, a wiggling 4-point detour, or an almost
//    collinear triple, as long as the shortcut stays walkable.
// 3. **Diagonal cut.** Collapse an L-shaped turn (a pure-X leg then a pure-Z
//    leg, or the reverse, at one height) into a single diagonal leg.
// 4. **Validate and repair.** Re-walk the result. Any consecutive pair that
//    is no longer walkable gets the intermediate cells from the raw path
//    spliced back in between.
//
// Passes 2 and 3 leave paths of three or fewer waypoints alone. The whole
// pipeline leaves paths of two or fewer waypoints alone.
//
// "Walkable" between two waypoints means both ends are standable under the
// movement mode and either they are within one cell on every axis or every
// cell sampled along the straight line between them is standable. Samples
// are taken at unit steps along the dominant axis, rounding half to even.
//
// See also: `search.rs` for the raw paths this consumes, `config.rs` for
// `SmoothingConfig`.

use crate::config::SmoothingConfig;
use crate::types::{MovementMode, VoxelCoord};
use crate::world::GridAccess;
use log::trace;

/// Smooth `path` for a walker moving under `mode`.
///
/// The first and last waypoints are always preserved, and the result is
/// never empty for non-empty input.
pub fn smooth_path<W: GridAccess + ?Sized>(
    path: &[VoxelCoord],
    world: &W,
    mode: MovementMode,
    config: &SmoothingConfig,
) -> Vec<VoxelCoord> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let smoother = Smoother {
        world,
        mode,
        config,
    };
    let sighted = smoother.line_of_sight_pass(path);
    let cleaned = smoother.clean_pass(&sighted);
    let cut = smoother.diagonal_pass(&cleaned);
    let repaired = smoother.repair_pass(&cut, path);
    trace!(
        "[Smoother] {} -> {} -> {} -> {} -> {} waypoints",
        path.len(),
        sighted.len(),
        cleaned.len(),
        cut.len(),
        repaired.len()
    );
    repaired
}

/// Whether a walker can occupy `coord` under `mode`.
///
/// Flight needs the cell and the one above it passable; ground needs the
/// cell walkable.
pub fn is_position_walkable<W: GridAccess + ?Sized>(
    world: &W,
    coord: VoxelCoord,
    mode: MovementMode,
) -> bool {
    match mode {
        MovementMode::Flight => world.is_passable(coord) && world.is_passable(coord.up()),
        MovementMode::Ground => world.is_walkable(coord),
    }
}

/// Whether every cell sampled on the straight line from `from` to `to`
/// (both ends included) is standable under `mode`.
pub fn has_line_of_sight<W: GridAccess + ?Sized>(
    world: &W,
    from: VoxelCoord,
    to: VoxelCoord,
    mode: MovementMode,
) -> bool {
    // Deltas in i64: two i32 coordinates can be up to 2^32 - 1 apart.
    let dx = i64::from(to.x) - i64::from(from.x);
    let dy = i64::from(to.y) - i64::from(from.y);
    let dz = i64::from(to.z) - i64::from(from.z);
    let steps = dx.abs().max(dy.abs()).max(dz.abs());
    if steps == 0 {
        return true;
    }

    let n = steps as f64;
    let (step_x, step_y, step_z) = (dx as f64 / n, dy as f64 / n, dz as f64 / n);
    let (mut x, mut y, mut z) = (f64::from(from.x), f64::from(from.y), f64::from(from.z));
    for _ in 0..=steps {
        let sample = VoxelCoord::new(
            x.round_ties_even() as i32,
            y.round_ties_even() as i32,
            z.round_ties_even() as i32,
        );
        if !is_position_walkable(world, sample, mode) {
            return false;
        }
        x += step_x;
        y += step_y;
        z += step_z;
    }
    true
}

/// Whether a walker can go straight from `from` to `to` under `mode`.
pub fn is_segment_walkable<W: GridAccess + ?Sized>(
    world: &W,
    from: VoxelCoord,
    to: VoxelCoord,
    mode: MovementMode,
) -> bool {
    if !is_position_walkable(world, from, mode) || !is_position_walkable(world, to, mode) {
        return false;
    }
    if from.chebyshev_distance(to) <= 1 {
        return true;
    }
    has_line_of_sight(world, from, to, mode)
}

struct Smoother<'a, W: GridAccess + ?Sized> {
    world: &'a W,
    mode: MovementMode,
    config: &'a SmoothingConfig,
}

impl<W: GridAccess + ?Sized> Smoother<'_, W> {
    fn walkable(&self, from: VoxelCoord, to: VoxelCoord) -> bool {
        is_segment_walkable(self.world, from, to, self.mode)
    }

    // -----------------------------------------------------------------------
    // Pass 1: line of sight
    // -----------------------------------------------------------------------

    fn line_of_sight_pass(&self, path: &[VoxelCoord]) -> Vec<VoxelCoord> {
        let mut out = vec![path[0]];
        let last = path.len() - 1;
        let mut i = 0;
        while i < last {
            let max_skip = self.config.lookahead.min(last - i);
            let furthest = (2..=max_skip)
                .rev()
                .map(|skip| i + skip)
                .find(|&target| {
                    !self.crosses_cliff(&path[i..=target])
                        && has_line_of_sight(self.world, path[i], path[target], self.mode)
                })
                .unwrap_or(i + 1);
            out.push(path[furthest]);
            i = furthest;
        }
        out
    }

    /// Ground only: whether any step in `stretch` changes height by at least
    /// `max_elevation_change`.
    fn crosses_cliff(&self, stretch: &[VoxelCoord]) -> bool {
        if self.mode.is_flight() {
            return false;
        }
        stretch
            .windows(2)
            .any(|w| w[1].y.abs_diff(w[0].y) >= self.config.max_elevation_change)
    }

    // -----------------------------------------------------------------------
    // Pass 2: clean and straighten
    // -----------------------------------------------------------------------

    fn clean_pass(&self, path: &[VoxelCoord]) -> Vec<VoxelCoord> {
        if path.len() <= 3 {
            return path.to_vec();
        }
        let mut out = vec![path[0]];
        let mut i = 1;
        while i < path.len() - 1 {
            let prev = out[out.len() - 1];
            let current = path[i];
            let next = path[i + 1];

            if self.is_zigzag(prev, current, next) && self.walkable(prev, next) {
                i += 1;
                continue;
            }
            let wiggle = path
                .get(i + 2)
                .is_some_and(|&after| is_wiggle(prev, current, next, after) && self.walkable(prev, after));
            if wiggle {
                i += 2;
                continue;
            }
            if self.is_almost_straight(prev, current, next) && self.walkable(prev, next) {
                i += 1;
                continue;
            }
            out.push(current);
            i += 1;
        }
        out.push(path[path.len() - 1]);
        out
    }

    /// A short same-height detour: the walk reverses along X or Z and `prev`
    /// and `next` are close, or it doubles straight back along one axis
    /// with both legs short.
    fn is_zigzag(&self, prev: VoxelCoord, current: VoxelCoord, next: VoxelCoord) -> bool {
        if prev.y != current.y || current.y != next.y {
            return false;
        }
        let span = self.config.zigzag_max_span;
        let (d1x, d1z) = (current.x - prev.x, current.z - prev.z);
        let (d2x, d2z) = (next.x - current.x, next.z - current.z);

        let reversed_x = d1x != 0 && d2x == -d1x;
        let reversed_z = d1z != 0 && d2z == -d1z;
        if reversed_x || reversed_z {
            return horizontal_length(next.x - prev.x, next.z - prev.z) <= span;
        }

        let doubled_back = (d1x == -d2x && d1z == 0 && d2z == 0) || (d1z == -d2z && d1x == 0 && d2x == 0);
        doubled_back && horizontal_length(d1x, d1z) <= span && horizontal_length(d2x, d2z) <= span
    }

    /// Whether `current` sits within `collinear_tolerance` (as a horizontal
    /// cross product) of the line from `prev` to `next`.
    fn is_almost_straight(&self, prev: VoxelCoord, current: VoxelCoord, next: VoxelCoord) -> bool {
        let (ax, az) = (i64::from(current.x - prev.x), i64::from(current.z - prev.z));
        let (bx, bz) = (i64::from(next.x - prev.x), i64::from(next.z - prev.z));
        (ax * bz - az * bx).abs() <= self.config.collinear_tolerance
    }

    // -----------------------------------------------------------------------
    // Pass 3: diagonal cut
    // -----------------------------------------------------------------------

    fn diagonal_pass(&self, path: &[VoxelCoord]) -> Vec<VoxelCoord> {
        if path.len() <= 3 {
            return path.to_vec();
        }
        let last = path[path.len() - 1];
        let mut out = vec![path[0]];
        let mut i = 1;
        while i < path.len() - 1 {
            let prev = out[out.len() - 1];
            let current = path[i];
            let next = path[i + 1];

            let (d1x, d1z) = (current.x - prev.x, current.z - prev.z);
            let (d2x, d2z) = (next.x - current.x, next.z - current.z);
            let perpendicular = (d1x != 0 && d1z == 0 && d2x == 0 && d2z != 0)
                || (d1x == 0 && d1z != 0 && d2x != 0 && d2z == 0);

            if perpendicular && prev.y == current.y && current.y == next.y {
                // The corner-cutting target lands on `next`; the turn becomes
                // one diagonal leg.
                let diagonal = prev.offset(d1x + d2x, 0, d1z + d2z);
                if is_position_walkable(self.world, diagonal, self.mode)
                    && self.walkable(prev, diagonal)
                    && self.walkable(diagonal, next)
                {
                    out.push(diagonal);
                    i += 2;
                    continue;
                }
            }
            out.push(current);
            i += 1;
        }
        if out[out.len() - 1] != last {
            out.push(last);
        }
        out
    }

    // -----------------------------------------------------------------------
    // Pass 4: validate and repair
    // -----------------------------------------------------------------------

    fn repair_pass(&self, path: &[VoxelCoord], raw: &[VoxelCoord]) -> Vec<VoxelCoord> {
        let mut out = vec![path[0]];
        for &to in &path[1..] {
            let from = out[out.len() - 1];
            if !self.walkable(from, to) {
                out.extend_from_slice(between(raw, from, to));
            }
            out.push(to);
        }
        out
    }
}

/// Cells strictly between the last occurrences of `from` and `to` in `raw`,
/// or nothing if either is missing or they are out of order.
fn between(raw: &[VoxelCoord], from: VoxelCoord, to: VoxelCoord) -> &[VoxelCoord] {
    let from_idx = raw.iter().rposition(|&c| c == from);
    let to_idx = raw.iter().rposition(|&c| c == to);
    match (from_idx, to_idx) {
        (Some(f), Some(t)) if t > f => &raw[f + 1..t],
        _ => &[],
    }
}

/// A same-height 4-point window whose walked Manhattan length exceeds the
/// direct Manhattan length by more than one cell, spanning at least three.
fn is_wiggle(p1: VoxelCoord, p2: VoxelCoord, p3: VoxelCoord, p4: VoxelCoord) -> bool {
    if p1.y != p2.y || p2.y != p3.y || p3.y != p4.y {
        return false;
    }
    // Same height, so the Manhattan distance is purely horizontal.
    if p1.manhattan_distance(p4) < 3 {
        return false;
    }
    let walked = p1.manhattan_distance(p2) + p2.manhattan_distance(p3) + p3.manhattan_distance(p4);
    walked > p1.manhattan_distance(p4) + 1
}

fn horizontal_length(dx: i32, dz: i32) -> f64 {
    f64::from(dx).hypot(f64::from(dz))
}
