//! Face directions.
//!
//! Every face-oriented algorithm (AO sampling, greedy sweeps, quad
//! emission) works in a direction-local frame of three aligned axes:
//!
//! ```text
//! direction   index  aligned X  aligned Y  aligned Z (depth)  sign
//! right (+x)    0        z          y            x             +1
//! left  (-x)    1        z          y            x             -1
//! top   (+y)    2        x          z            y             +1
//! bottom(-y)    3        x          z            y             -1
//! front (+z)    4        x          y            z             +1
//! back  (-z)    5        x          y            z             -1
//! ```

use crate::math::IVec3;

/// One of the six cube face directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    /// +X
    Right = 0,
    /// -X
    Left = 1,
    /// +Y
    Top = 2,
    /// -Y
    Bottom = 3,
    /// +Z
    Front = 4,
    /// -Z
    Back = 5,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Self; 6] = [
        Self::Right,
        Self::Left,
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
    ];

    const ALIGNED_X: [usize; 6] = [2, 2, 0, 0, 0, 0];
    const ALIGNED_Y: [usize; 6] = [1, 1, 2, 2, 1, 1];
    const ALIGNED_Z: [usize; 6] = [0, 0, 1, 1, 2, 2];
    const SIGN: [i32; 6] = [1, -1, 1, -1, 1, -1];

    /// Index in `0..6`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Converts from an index in `0..6`.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 6 {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// World axis running along the face's local X.
    #[inline]
    #[must_use]
    pub const fn aligned_x(self) -> usize {
        Self::ALIGNED_X[self as usize]
    }

    /// World axis running along the face's local Y.
    #[inline]
    #[must_use]
    pub const fn aligned_y(self) -> usize {
        Self::ALIGNED_Y[self as usize]
    }

    /// World axis the face points along (sweep depth axis).
    #[inline]
    #[must_use]
    pub const fn aligned_z(self) -> usize {
        Self::ALIGNED_Z[self as usize]
    }

    /// +1 for positive directions, -1 for negative ones.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i32 {
        Self::SIGN[self as usize]
    }

    /// Unit offset towards the neighbour this face looks at.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> IVec3 {
        IVec3::ZERO.with_axis(self.aligned_z(), self.sign())
    }

    /// The opposite direction.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::ALL[(self as usize) ^ 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(Direction::Right.offset(), IVec3::new(1, 0, 0));
        assert_eq!(Direction::Left.offset(), IVec3::new(-1, 0, 0));
        assert_eq!(Direction::Top.offset(), IVec3::new(0, 1, 0));
        assert_eq!(Direction::Bottom.offset(), IVec3::new(0, -1, 0));
        assert_eq!(Direction::Front.offset(), IVec3::new(0, 0, 1));
        assert_eq!(Direction::Back.offset(), IVec3::new(0, 0, -1));
    }

    #[test]
    fn test_aligned_axes_are_a_permutation() {
        for direction in Direction::ALL {
            let mut axes = [direction.aligned_x(), direction.aligned_y(), direction.aligned_z()];
            axes.sort_unstable();
            assert_eq!(axes, [0, 1, 2], "{direction:?}");
        }
    }

    #[test]
    fn test_opposite() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            let sum = direction.offset() + direction.opposite().offset();
            assert_eq!(sum, IVec3::ZERO);
        }
    }
}
