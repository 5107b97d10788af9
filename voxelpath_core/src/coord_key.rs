// Dense coordinate packing for search-node identity.
//
// A `VoxelCoord` is packed into a single `u64` so the node table can be a
// flat hash map keyed by integers. Field layout, high bit to low bit:
//
//   | x: 26 bits | z: 26 bits | y: 12 bits |
//
// which is the usual block-position layout of block-based voxel engines.
// Each field is stored two's-complement and recovered with sign-extending
// shifts, so the round trip is exact for x, z in [-2^25, 2^25 - 1] and
// y in [-2^11, 2^11 - 1]. Coordinates outside those ranges would alias
// (the field wraps), so the search treats them as impassable and never
// packs one.
//
// See also: `node_table.rs`, the consumer of packed keys, and `search.rs`,
// which filters cells through `is_packable`.

use crate::types::VoxelCoord;

const X_BITS: u32 = 26;
const Z_BITS: u32 = 26;
const Y_BITS: u32 = 12;

const Z_SHIFT: u32 = Y_BITS;
const X_SHIFT: u32 = Y_BITS + Z_BITS;

const Y_MASK: i64 = (1 << Y_BITS) - 1;
const Z_MASK: i64 = (1 << Z_BITS) - 1;

/// Smallest / largest x and z that survive a round trip.
pub const HORIZONTAL_MIN: i32 = -(1 << (X_BITS - 1));
pub const HORIZONTAL_MAX: i32 = (1 << (X_BITS - 1)) - 1;
/// Smallest / largest y that survive a round trip.
pub const VERTICAL_MIN: i32 = -(1 << (Y_BITS - 1));
pub const VERTICAL_MAX: i32 = (1 << (Y_BITS - 1)) - 1;

/// Pack a coordinate into a 64-bit key.
#[inline]
pub fn pack(coord: VoxelCoord) -> u64 {
    let x = i64::from(coord.x) << X_SHIFT;
    let z = (i64::from(coord.z) & Z_MASK) << Z_SHIFT;
    let y = i64::from(coord.y) & Y_MASK;
    (x | z | y) as u64
}

/// Unpack a key produced by [`pack`]. Pure shifts, no allocation.
#[inline]
pub fn unpack(key: u64) -> VoxelCoord {
    let k = key as i64;
    // Shift each field to the top of the word, then arithmetic-shift it
    // back down so the field's sign bit is extended.
    let x = k >> X_SHIFT;
    let z = (k << (64 - Z_SHIFT - Z_BITS)) >> (64 - Z_BITS);
    let y = (k << (64 - Y_BITS)) >> (64 - Y_BITS);
    VoxelCoord::new(x as i32, y as i32, z as i32)
}

/// Whether `coord` lies inside the losslessly packable range.
pub fn is_packable(coord: VoxelCoord) -> bool {
    (HORIZONTAL_MIN..=HORIZONTAL_MAX).contains(&coord.x)
        && (HORIZONTAL_MIN..=HORIZONTAL_MAX).contains(&coord.z)
        && (VERTICAL_MIN..=VERTICAL_MAX).contains(&coord.y)
}
