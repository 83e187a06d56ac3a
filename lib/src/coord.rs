//! Coordinates on the plane.

use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The coordinates of a cell.
///
/// The `y`-axis points downwards, as in RLE.
///
/// Coordinates are ordered by `x` first, then by `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord {
    /// The `x`-coordinate.
    pub x: i32,
    /// The `y`-coordinate.
    pub y: i32,
}

impl Coord {
    /// The origin.
    pub const ORIGIN: Self = Coord { x: 0, y: 0 };

    /// Creates a new coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Adds two coordinates, or `None` on overflow.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Coord::new(self.x.checked_add(rhs.x)?, self.y.checked_add(rhs.y)?))
    }
}

impl From<(i32, i32)> for Coord {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Coord { x, y }
    }
}

impl Add for Coord {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Coord {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Coord {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Coord {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Coord {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Coord::new(-self.x, -self.y)
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
