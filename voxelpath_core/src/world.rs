// Grid access for the search, plus a dense in-memory voxel world.
//
// The search never owns world data. It asks a `GridAccess` implementation
// three questions per cell: is it passable (a creature can occupy it), is it
// solid (a creature can stand on it), and, derived from those two, is it
// walkable (solid footing below, clear at feet and head height). Every
// implementation must fail closed: a cell it cannot answer for is neither
// passable nor solid, so the search degrades to "no path" instead of
// wandering into unknown space.
//
// `VoxelWorld` is the in-memory implementation used by tests, benches and
// the CLI. It is a flat `Vec<VoxelType>` indexed by
// `x + z * size_x + y * size_x * size_z` relative to a signed origin, giving
// O(1) reads anywhere in its box. Everything outside the box is unknown.
//
// `WorldSpec` is the serde description of a `VoxelWorld` (origin, size and a
// list of filled boxes) used by scene files.
//
// See also: `search.rs` and `smoother.rs`, the two consumers of
// `GridAccess`.

use crate::types::{VoxelCoord, VoxelType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Grid access trait
// ---------------------------------------------------------------------------

/// Read-only per-cell passability queries.
///
/// Implementations must be side-effect free for the duration of a search and
/// must answer `false` for cells they know nothing about.
pub trait GridAccess {
    /// Whether a creature can occupy `coord`.
    fn is_passable(&self, coord: VoxelCoord) -> bool;

    /// Whether `coord` blocks movement and can be stood on.
    fn is_solid(&self, coord: VoxelCoord) -> bool;

    /// Solid footing directly below, clear at foot level and at head level.
    fn is_walkable(&self, coord: VoxelCoord) -> bool {
        self.is_solid(coord.down()) && self.is_passable(coord) && self.is_passable(coord.up())
    }
}

impl<T: GridAccess + ?Sized> GridAccess for &T {
    fn is_passable(&self, coord: VoxelCoord) -> bool {
        (**self).is_passable(coord)
    }

    fn is_solid(&self, coord: VoxelCoord) -> bool {
        (**self).is_solid(coord)
    }

    fn is_walkable(&self, coord: VoxelCoord) -> bool {
        (**self).is_walkable(coord)
    }
}

impl<T: GridAccess + ?Sized> GridAccess for Arc<T> {
    fn is_passable(&self, coord: VoxelCoord) -> bool {
        (**self).is_passable(coord)
    }

    fn is_solid(&self, coord: VoxelCoord) -> bool {
        (**self).is_solid(coord)
    }

    fn is_walkable(&self, coord: VoxelCoord) -> bool {
        (**self).is_walkable(coord)
    }
}

// ---------------------------------------------------------------------------
// Dense voxel world
// ---------------------------------------------------------------------------

/// Dense 3D voxel grid covering the box `origin .. origin + size`.
#[derive(Clone, Debug, Default)]
pub struct VoxelWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z, with
    /// coordinates taken relative to `origin`.
    voxels: Vec<VoxelType>,
    pub origin: VoxelCoord,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

impl VoxelWorld {
    /// Create a world with its minimum corner at (0, 0, 0), filled with `Air`.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        Self::with_origin(VoxelCoord::new(0, 0, 0), size_x, size_y, size_z)
    }

    /// Create a world with its minimum corner at `origin`, filled with `Air`.
    pub fn with_origin(origin: VoxelCoord, size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            voxels: vec![VoxelType::Air; total],
            origin,
            size_x,
            size_y,
            size_z,
        }
    }

    /// Check whether a coordinate is within the world box.
    pub fn in_bounds(&self, coord: VoxelCoord) -> bool {
        self.index(coord).is_some()
    }

    /// Convert a coordinate to a flat index. Returns `None` if out of bounds.
    fn index(&self, coord: VoxelCoord) -> Option<usize> {
        let x = i64::from(coord.x) - i64::from(self.origin.x);
        let y = i64::from(coord.y) - i64::from(self.origin.y);
        let z = i64::from(coord.z) - i64::from(self.origin.z);
        if x < 0
            || y < 0
            || z < 0
            || x >= i64::from(self.size_x)
            || y >= i64::from(self.size_y)
            || z >= i64::from(self.size_z)
        {
            return None;
        }
        let sx = self.size_x as usize;
        let sz = self.size_z as usize;
        Some(x as usize + z as usize * sx + y as usize * sx * sz)
    }

    /// Read a voxel. Returns `None` for out-of-bounds coordinates.
    pub fn get(&self, coord: VoxelCoord) -> Option<VoxelType> {
        self.index(coord).map(|i| self.voxels[i])
    }

    /// Write a voxel. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, coord: VoxelCoord, voxel: VoxelType) {
        if let Some(i) = self.index(coord) {
            self.voxels[i] = voxel;
        }
    }

    /// Fill the inclusive box between two corners (in any order).
    pub fn fill(&mut self, a: VoxelCoord, b: VoxelCoord, voxel: VoxelType) {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            for z in a.z.min(b.z)..=a.z.max(b.z) {
                for x in a.x.min(b.x)..=a.x.max(b.x) {
                    self.set(VoxelCoord::new(x, y, z), voxel);
                }
            }
        }
    }

    /// Build a world from its serde description.
    pub fn from_spec(spec: &WorldSpec) -> Self {
        let (sx, sy, sz) = spec.size;
        let mut world = Self::with_origin(spec.origin, sx, sy, sz);
        for region in &spec.regions {
            world.fill(region.min, region.max, region.voxel);
        }
        world
    }
}

impl GridAccess for VoxelWorld {
    fn is_passable(&self, coord: VoxelCoord) -> bool {
        self.get(coord).is_some_and(VoxelType::is_passable)
    }

    fn is_solid(&self, coord: VoxelCoord) -> bool {
        self.get(coord).is_some_and(VoxelType::is_solid)
    }
}

// ---------------------------------------------------------------------------
// Serde description
// ---------------------------------------------------------------------------

/// An inclusive box of one voxel type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillRegion {
    pub min: VoxelCoord,
    pub max: VoxelCoord,
    #[serde(default = "default_fill_voxel")]
    pub voxel: VoxelType,
}

fn default_fill_voxel() -> VoxelType {
    VoxelType::Solid
}

/// Serializable description of a `VoxelWorld`: an all-air box with
/// regions painted over it in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSpec {
    pub origin: VoxelCoord,
    /// World dimensions in voxels (x, y, z).
    pub size: (u32, u32, u32),
    #[serde(default)]
    pub regions: Vec<FillRegion>,
}
