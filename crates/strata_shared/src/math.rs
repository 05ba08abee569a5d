//! Vector and grid types.
//!
//! World space is an unbounded integer grid of voxels. It is cut into
//! fixed-size chunks:
//!
//! ```text
//! world = chunk * size + grid        (component-wise)
//! chunk = floor(world / size)        (floor division, also for negatives)
//! grid  = world mod size             (always in [0, size))
//! index = z + y * size.z + x * size.y * size.z
//! ```

use std::ops::{Add, Mul, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

// =============================================================================
// FLOAT VECTOR
// =============================================================================

/// 3D vector - observer position, vertex position, normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns the voxel containing this point.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn floor(self) -> IVec3 {
        IVec3::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

// =============================================================================
// INTEGER VECTOR
// =============================================================================

/// Integer 3D vector - voxel positions in world or chunk-local space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IVec3 {
    /// X component
    pub x: i32,
    /// Y component
    pub y: i32,
    /// Z component
    pub z: i32,
}

impl IVec3 {
    /// Zero vector
    pub const ZERO: Self = Self::new(0, 0, 0);
    /// One voxel up.
    pub const UP: Self = Self::new(0, 1, 0);

    /// Creates a new IVec3
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the component along `axis` (0 = x, 1 = y, 2 = z).
    #[inline]
    #[must_use]
    pub const fn axis(self, axis: usize) -> i32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Returns a copy with the component along `axis` replaced.
    #[inline]
    #[must_use]
    pub const fn with_axis(mut self, axis: usize, value: i32) -> Self {
        match axis {
            0 => self.x = value,
            1 => self.y = value,
            _ => self.z = value,
        }
        self
    }

    /// Returns a copy with `delta` added along `axis`.
    #[inline]
    #[must_use]
    pub const fn offset_axis(self, axis: usize, delta: i32) -> Self {
        self.with_axis(axis, self.axis(axis) + delta)
    }

    /// Squared length, widened so it cannot overflow.
    #[inline]
    #[must_use]
    pub const fn length_squared(self) -> i64 {
        let x = self.x as i64;
        let y = self.y as i64;
        let z = self.z as i64;
        x * x + y * y + z * z
    }
}

impl Add for IVec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for IVec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

// =============================================================================
// CHUNK SIZE
// =============================================================================

/// Dimensions of a chunk in voxels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkSize {
    /// Width (x).
    pub x: usize,
    /// Height (y).
    pub y: usize,
    /// Depth (z).
    pub z: usize,
}

impl ChunkSize {
    /// Creates a chunk size.
    #[inline]
    #[must_use]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Total voxels per chunk.
    #[inline]
    #[must_use]
    pub const fn volume(self) -> usize {
        self.x * self.y * self.z
    }

    /// Returns the extent along `axis` (0 = x, 1 = y, 2 = z).
    #[inline]
    #[must_use]
    pub const fn axis(self, axis: usize) -> usize {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Returns the size as a signed vector.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x as i32, self.y as i32, self.z as i32)
    }

    /// Returns true if `grid` lies inside the chunk.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn contains(self, grid: IVec3) -> bool {
        grid.x >= 0
            && grid.y >= 0
            && grid.z >= 0
            && (grid.x as usize) < self.x
            && (grid.y as usize) < self.y
            && (grid.z as usize) < self.z
    }

    /// Flat index of an in-bounds local position.
    ///
    /// Callers check [`ChunkSize::contains`] first; use
    /// [`ChunkSize::try_index`] when that is not guaranteed.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn index(self, grid: IVec3) -> usize {
        grid.z as usize + grid.y as usize * self.z + grid.x as usize * self.y * self.z
    }

    /// Flat index, or `None` if the position is outside the chunk.
    #[inline]
    #[must_use]
    pub const fn try_index(self, grid: IVec3) -> Option<usize> {
        if self.contains(grid) {
            Some(self.index(grid))
        } else {
            None
        }
    }

    /// Local position of a flat index.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn position(self, index: usize) -> IVec3 {
        IVec3::new(
            (index / (self.y * self.z)) as i32,
            ((index / self.z) % self.y) as i32,
            (index % self.z) as i32,
        )
    }

    /// Local position of a world voxel inside the chunk at `chunk`.
    #[inline]
    #[must_use]
    pub const fn to_grid(self, world: IVec3, chunk: ChunkCoord) -> IVec3 {
        let size = self.as_ivec3();
        IVec3::new(
            (world.x - chunk.x * size.x).rem_euclid(size.x),
            (world.y - chunk.y * size.y).rem_euclid(size.y),
            (world.z - chunk.z * size.z).rem_euclid(size.z),
        )
    }
}

// =============================================================================
// CHUNK COORDINATE
// =============================================================================

/// Chunk coordinate (identifies a chunk in the chunk grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not voxels).
    pub x: i32,
    /// Y coordinate (in chunks).
    pub y: i32,
    /// Z coordinate (in chunks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Converts a world voxel position to the chunk containing it.
    #[inline]
    #[must_use]
    pub const fn from_world(world: IVec3, size: ChunkSize) -> Self {
        let size = size.as_ivec3();
        Self {
            x: world.x.div_euclid(size.x),
            y: world.y.div_euclid(size.y),
            z: world.z.div_euclid(size.z),
        }
    }

    /// World position of the chunk's origin voxel.
    #[inline]
    #[must_use]
    pub const fn origin(self, size: ChunkSize) -> IVec3 {
        let size = size.as_ivec3();
        IVec3::new(self.x * size.x, self.y * size.y, self.z * size.z)
    }

    /// Returns the coordinate shifted by a chunk offset.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Component-wise difference `other - self`.
    #[inline]
    #[must_use]
    pub const fn delta(self, other: Self) -> IVec3 {
        IVec3::new(other.x - self.x, other.y - self.y, other.z - self.z)
    }

    /// Squared distance in chunk units.
    #[inline]
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i64 {
        self.delta(other).length_squared()
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{},{}]", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: ChunkSize = ChunkSize::new(16, 128, 16);

    #[test]
    fn test_chunk_coord_from_world() {
        let c = |x, y, z| ChunkCoord::from_world(IVec3::new(x, y, z), SIZE);
        assert_eq!(c(0, 0, 0), ChunkCoord::new(0, 0, 0));
        assert_eq!(c(15, 127, 15), ChunkCoord::new(0, 0, 0));
        assert_eq!(c(16, 128, 16), ChunkCoord::new(1, 1, 1));
        assert_eq!(c(-1, -1, -1), ChunkCoord::new(-1, -1, -1));
        assert_eq!(c(-16, 0, -16), ChunkCoord::new(-1, 0, -1));
        assert_eq!(c(-17, 0, -17), ChunkCoord::new(-2, 0, -2));
    }

    #[test]
    fn test_to_grid_is_positive_modulus() {
        let world = IVec3::new(-1, 5, -17);
        let chunk = ChunkCoord::from_world(world, SIZE);
        let grid = SIZE.to_grid(world, chunk);
        assert_eq!(grid, IVec3::new(15, 5, 15));
        assert_eq!(chunk.origin(SIZE) + grid, world);
    }

    #[test]
    fn test_index_layout_is_z_fastest() {
        assert_eq!(SIZE.index(IVec3::new(0, 0, 1)), 1);
        assert_eq!(SIZE.index(IVec3::new(0, 1, 0)), 16);
        assert_eq!(SIZE.index(IVec3::new(1, 0, 0)), 128 * 16);
    }

    #[test]
    fn test_index_position_inverse() {
        let size = ChunkSize::new(3, 5, 4);
        for index in 0..size.volume() {
            let position = size.position(index);
            assert!(size.contains(position));
            assert_eq!(size.index(position), index);
        }
    }

    #[test]
    fn test_contains_rejects_outside() {
        assert!(!SIZE.contains(IVec3::new(-1, 0, 0)));
        assert!(!SIZE.contains(IVec3::new(16, 0, 0)));
        assert!(!SIZE.contains(IVec3::new(0, 128, 0)));
        assert_eq!(SIZE.try_index(IVec3::new(0, 0, 16)), None);
    }

    #[test]
    fn test_distance_squared() {
        let a = ChunkCoord::new(0, 0, 0);
        let b = ChunkCoord::new(5, 0, 0);
        assert_eq!(a.distance_squared(b), 25);
        assert_eq!(b.distance_squared(a), 25);
    }

    #[test]
    fn test_vec3_floor_handles_negatives() {
        assert_eq!(Vec3::new(-0.5, 1.9, 3.0).floor(), IVec3::new(-1, 1, 3));
    }
}
