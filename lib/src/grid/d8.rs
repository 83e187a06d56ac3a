//! Rotations, reflections and symmetries of rectangles, i.e., the
//! [dihedral group _D_<sub>8</sub>](https://en.wikipedia.org/wiki/Examples_of_groups#dihedral_group_of_order_8).
//!
//! 8 transformations are the 8 elements of _D_<sub>8</sub>;
//! 10 symmetries are its 10 subgroups.

use crate::coord::Coord;
use educe::Educe;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rotation or reflection of a rectangle.
///
/// `R` means counterclockwise rotations around the centre of the rectangle;
/// the number is the angle in degrees.
///
/// `F` means reflections (flips); the symbol is the axis of reflection.
#[derive(Clone, Copy, Debug, Educe, PartialEq, Eq, Hash)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Transform {
    /// `Id`.
    #[educe(Default)]
    Id,
    /// `R90`.
    #[cfg_attr(feature = "serde", serde(rename = "R90"))]
    Rotate90,
    /// `R180`.
    #[cfg_attr(feature = "serde", serde(rename = "R180"))]
    Rotate180,
    /// `R270`.
    #[cfg_attr(feature = "serde", serde(rename = "R270"))]
    Rotate270,
    /// `F-`, across the middle row.
    #[cfg_attr(feature = "serde", serde(rename = "F-"))]
    FlipRow,
    /// `F|`, across the middle column.
    #[cfg_attr(feature = "serde", serde(rename = "F|"))]
    FlipCol,
    /// `F\`, across the diagonal.
    #[cfg_attr(feature = "serde", serde(rename = "F\\"))]
    FlipDiag,
    /// `F/`, across the antidiagonal.
    #[cfg_attr(feature = "serde", serde(rename = "F/"))]
    FlipAntidiag,
}

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Id" => Ok(Transform::Id),
            "R90" => Ok(Transform::Rotate90),
            "R180" => Ok(Transform::Rotate180),
            "R270" => Ok(Transform::Rotate270),
            "F-" => Ok(Transform::FlipRow),
            "F|" => Ok(Transform::FlipCol),
            "F\\" => Ok(Transform::FlipDiag),
            "F/" => Ok(Transform::FlipAntidiag),
            _ => Err(format!("invalid transform: {}", s)),
        }
    }
}

impl Display for Transform {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let s = match self {
            Transform::Id => "Id",
            Transform::Rotate90 => "R90",
            Transform::Rotate180 => "R180",
            Transform::Rotate270 => "R270",
            Transform::FlipRow => "F-",
            Transform::FlipCol => "F|",
            Transform::FlipDiag => "F\\",
            Transform::FlipAntidiag => "F/",
        };
        f.write_str(s)
    }
}

impl Transform {
    /// Whether the transformation swaps the width and the height.
    ///
    /// Returns `true` for `R90`, `R270`, `F\` and `F/`.
    pub fn square_world(self) -> bool {
        matches!(
            self,
            Transform::Rotate90 | Transform::Rotate270 | Transform::FlipDiag | Transform::FlipAntidiag
        )
    }

    /// Maps a coordinate in a `width × height` rectangle whose top-left
    /// corner is the origin.
    ///
    /// Transformations that swap the sides map into a `height × width` rectangle.
    pub fn act_on(self, coord: Coord, width: i32, height: i32) -> Coord {
        let Coord { x, y } = coord;
        let (x, y) = match self {
            Transform::Id => (x, y),
            Transform::Rotate90 => (y, width - 1 - x),
            Transform::Rotate180 => (width - 1 - x, height - 1 - y),
            Transform::Rotate270 => (height - 1 - y, x),
            Transform::FlipRow => (x, height - 1 - y),
            Transform::FlipCol => (width - 1 - x, y),
            Transform::FlipDiag => (y, x),
            Transform::FlipAntidiag => (height - 1 - y, width - 1 - x),
        };
        Coord::new(x, y)
    }
}

/// Symmetries of a soup.
///
/// The notations follow Oscar Cunningham's
/// [Logic Life Search](https://github.com/OscarCunningham/logic-life-search).
/// See the [Life Wiki](https://conwaylife.com/wiki/Symmetry) for details.
#[derive(Clone, Copy, Debug, Educe, PartialEq, Eq, Hash)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Symmetry {
    /// `C1`, no symmetry.
    #[educe(Default)]
    C1,
    /// `C2`, 180° rotation.
    C2,
    /// `C4`, 90° rotation.
    C4,
    /// `D2-`, reflection across the middle row.
    #[cfg_attr(feature = "serde", serde(rename = "D2-"))]
    D2Row,
    /// `D2|`, reflection across the middle column.
    #[cfg_attr(feature = "serde", serde(rename = "D2|"))]
    D2Col,
    /// `D2\`, reflection across the diagonal.
    #[cfg_attr(feature = "serde", serde(rename = "D2\\"))]
    D2Diag,
    /// `D2/`, reflection across the antidiagonal.
    #[cfg_attr(feature = "serde", serde(rename = "D2/"))]
    D2Antidiag,
    /// `D4+`, reflections across the middle row and column.
    #[cfg_attr(feature = "serde", serde(rename = "D4+"))]
    D4Ortho,
    /// `D4X`, reflections across both diagonals.
    #[cfg_attr(feature = "serde", serde(rename = "D4X"))]
    D4Diag,
    /// `D8`, all 8 transformations.
    D8,
}

impl FromStr for Symmetry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C1" => Ok(Symmetry::C1),
            "C2" => Ok(Symmetry::C2),
            "C4" => Ok(Symmetry::C4),
            "D2-" => Ok(Symmetry::D2Row),
            "D2|" => Ok(Symmetry::D2Col),
            "D2\\" => Ok(Symmetry::D2Diag),
            "D2/" => Ok(Symmetry::D2Antidiag),
            "D4+" => Ok(Symmetry::D4Ortho),
            "D4X" => Ok(Symmetry::D4Diag),
            "D8" => Ok(Symmetry::D8),
            _ => Err(format!("invalid symmetry: {}", s)),
        }
    }
}

impl Display for Symmetry {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let s = match self {
            Symmetry::C1 => "C1",
            Symmetry::C2 => "C2",
            Symmetry::C4 => "C4",
            Symmetry::D2Row => "D2-",
            Symmetry::D2Col => "D2|",
            Symmetry::D2Diag => "D2\\",
            Symmetry::D2Antidiag => "D2/",
            Symmetry::D4Ortho => "D4+",
            Symmetry::D4Diag => "D4X",
            Symmetry::D8 => "D8",
        };
        f.write_str(s)
    }
}

impl Symmetry {
    /// Whether a soup with this symmetry must be square.
    ///
    /// Returns `true` for `C4`, `D2\`, `D2/`, `D4X` and `D8`.
    pub fn square_world(self) -> bool {
        self.members().into_iter().any(Transform::square_world)
    }

    /// Transformations contained in the symmetry group.
    pub fn members(self) -> Vec<Transform> {
        use Transform::*;
        match self {
            Symmetry::C1 => vec![Id],
            Symmetry::C2 => vec![Id, Rotate180],
            Symmetry::C4 => vec![Id, Rotate90, Rotate180, Rotate270],
            Symmetry::D2Row => vec![Id, FlipRow],
            Symmetry::D2Col => vec![Id, FlipCol],
            Symmetry::D2Diag => vec![Id, FlipDiag],
            Symmetry::D2Antidiag => vec![Id, FlipAntidiag],
            Symmetry::D4Ortho => vec![Id, FlipRow, FlipCol, Rotate180],
            Symmetry::D4Diag => vec![Id, FlipDiag, FlipAntidiag, Rotate180],
            Symmetry::D8 => vec![
                Id,
                Rotate90,
                Rotate180,
                Rotate270,
                FlipRow,
                FlipCol,
                FlipDiag,
                FlipAntidiag,
            ],
        }
    }
}
