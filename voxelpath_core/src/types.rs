// Core types shared across the search engine.
//
// Defines spatial coordinates (`VoxelCoord`), the voxel material enum used
// by the in-memory world, and the movement topology selector
// (`MovementMode`). All types derive `Serialize` and `Deserialize` so they
// can appear in config files, scene files and JSON results.
//
// See also: `coord_key.rs` for packing a `VoxelCoord` into a `u64` node key,
// `world.rs` for the grid that stores `VoxelType`s, `search.rs` for the two
// movement topologies selected by `MovementMode`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D voxel grid. Each component is in voxel units.
///
/// The coordinate system uses right-handed conventions:
/// - X: east  (positive) / west  (negative)
/// - Y: up    (positive) / down  (negative)
/// - Z: south (positive) / north (negative)
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The coordinate offset by `(dx, dy, dz)`.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The cell directly above.
    pub const fn up(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// The cell directly below.
    pub const fn down(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Manhattan distance between two coordinates. Widened to `u64` so any
    /// pair of `i32` coordinates fits.
    pub fn manhattan_distance(self, other: Self) -> u64 {
        u64::from(self.x.abs_diff(other.x))
            + u64::from(self.y.abs_diff(other.y))
            + u64::from(self.z.abs_diff(other.z))
    }

    /// Largest per-axis distance (Chebyshev distance).
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x
            .abs_diff(other.x)
            .max(self.y.abs_diff(other.y))
            .max(self.z.abs_diff(other.z))
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Movement topology
// ---------------------------------------------------------------------------

/// Which neighbor topology the search uses. Fixed for the whole search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementMode {
    /// Walking: 8 horizontal directions plus step-up / step-down, every
    /// visited cell must have solid footing.
    #[default]
    Ground,
    /// Flying or swimming: all 26 neighbors, no footing requirement.
    Flight,
}

impl MovementMode {
    pub fn is_flight(self) -> bool {
        self == Self::Flight
    }
}

impl fmt::Display for MovementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ground => write!(f, "ground"),
            Self::Flight => write!(f, "flight"),
        }
    }
}

// ---------------------------------------------------------------------------
// Voxel types
// ---------------------------------------------------------------------------

/// The material of a single voxel in the in-memory world grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoxelType {
    #[default]
    Air,
    /// Blocks movement and can be stood on.
    Solid,
    /// Plants, vines and the like: passable, but offers no footing.
    Foliage,
}

impl VoxelType {
    /// Whether a creature can occupy this voxel.
    pub fn is_passable(self) -> bool {
        !self.is_solid()
    }

    /// Whether this voxel blocks movement and provides footing.
    pub fn is_solid(self) -> bool {
        self == Self::Solid
    }
}
