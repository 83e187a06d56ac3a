//! Neighbourhoods of range-`r` rules.

use crate::{cells::State, coord::Coord, error::Error};
use auto_enums::auto_enum;
use std::fmt::{self, Display, Formatter};

/// The largest supported range.
pub const MAX_RANGE: i32 = 100;

/// How the neighbourhood was written.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Shape {
    /// A single-character symbol like `M` or `N`.
    Symbol(char),
    /// `@` followed by a hexadecimal bit mask, as in CoordCA.
    CoordCa(String),
    /// `W` followed by hexadecimal weights, as in LifeViewer.
    Weights(String),
}

/// A neighbourhood: a list of offsets, possibly with weights.
///
/// The offsets are listed in the order that rules expect the neighbours.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Neighbourhood {
    range: i32,
    shape: Shape,
    offsets: Vec<Coord>,
    weights: Option<Vec<i32>>,
}

/// Whether the offset `(i, j)` is in the neighbourhood of the symbol.
///
/// Returns `None` for unknown symbols.
fn symbol_contains(symbol: char, r: i32, i: i32, j: i32) -> Option<bool> {
    let contains = match symbol {
        'M' | 'G' => true,
        'N' => i.abs() + j.abs() <= r,
        'H' => {
            (i >= 0 && j >= 0) || (i <= 0 && j <= 0) || (i <= r + j && j < 0) || (i >= j - r && j > 0)
        }
        '2' => i * i + j * j <= r * r,
        'C' => i * i + j * j <= r * r + r,
        '+' => i == 0 || j == 0,
        'X' => i.abs() == j.abs(),
        '*' => i == 0 || j == 0 || i.abs() == j.abs(),
        '#' => i.abs() == 1 || j.abs() == 1,
        'B' => i.abs() % 2 != j.abs() % 2,
        'b' => i.abs() % 2 == j.abs() % 2,
        'A' => i == j || i == 0 || j == 0,
        '3' => (j <= 0 && i <= 0 && (i == 0 || j == 0)) || (j > 0 && i == j),
        _ => return None,
    };
    Some(contains)
}

impl Neighbourhood {
    /// The range-`r` Moore neighbourhood.
    pub fn moore(range: i32) -> Result<Self, Error> {
        Neighbourhood::from_symbol('M', range)
    }

    /// A neighbourhood given by a single-character symbol.
    ///
    /// `M` Moore, `N` von Neumann, `H` hexagonal, `2` Euclidean,
    /// `C` circular, `+` cross, `X` saltire, `*` star, `#` hash,
    /// `B` checkerboard, `b` aligned checkerboard, `G` Gaussian,
    /// `A` asterisk, `3` tripod.
    pub fn from_symbol(symbol: char, range: i32) -> Result<Self, Error> {
        check_range(range)?;
        let invalid = || Error::InvalidNeighbourhood(symbol.to_string());
        let mut offsets = Vec::new();
        for i in -range..=range {
            for j in -range..=range {
                if (i, j) != (0, 0) && symbol_contains(symbol, range, i, j).ok_or_else(invalid)? {
                    offsets.push(Coord::new(i, j));
                }
            }
        }
        let weights = if symbol == 'G' {
            Some(
                offsets
                    .iter()
                    .map(|c| (range + 1 - c.x.abs()) * (range + 1 - c.y.abs()))
                    .collect(),
            )
        } else {
            None
        };
        Ok(Neighbourhood {
            range,
            shape: Shape::Symbol(symbol),
            offsets,
            weights,
        })
    }

    /// A CoordCA neighbourhood.
    ///
    /// The hexadecimal digits give `(2r + 1)² - 1` bits, one for every cell
    /// of the square except the centre, column by column. Missing leading
    /// digits are zeros, and extra leading zeros are ignored; the canonical
    /// form has exactly as many digits as the bits need.
    pub fn from_coord_ca(hex: &str, range: i32) -> Result<Self, Error> {
        check_range(range)?;
        let invalid = || Error::InvalidNeighbourhood(format!("@{}", hex));
        let side = 2 * range + 1;
        let len = (side * side - 1) as usize;
        let mut bits = Vec::with_capacity(hex.len() * 4);
        for c in hex.chars() {
            let digit = c.to_digit(16).ok_or_else(invalid)?;
            bits.extend((0..4).rev().map(|k| digit >> k & 1 == 1));
        }
        let excess = bits.len().saturating_sub(len);
        if bits[..excess].contains(&true) {
            return Err(invalid());
        }
        let mut padded = vec![false; len.saturating_sub(bits.len())];
        padded.extend(&bits[excess..]);

        let mut offsets = Vec::new();
        for i in -range..=range {
            for j in -range..=range {
                if (i, j) == (0, 0) {
                    continue;
                }
                let mut index = ((i + range) * side + j + range) as usize;
                if index > len / 2 {
                    index -= 1;
                }
                if padded[index] {
                    offsets.push(Coord::new(i, j));
                }
            }
        }

        let mut digits = vec![false; (4 - len % 4) % 4];
        digits.extend(&padded);
        let canonical = digits
            .chunks(4)
            .map(|chunk| format!("{:X}", chunk.iter().fold(0, |d, &b| d << 1 | b as u8)))
            .collect();
        Ok(Neighbourhood {
            range,
            shape: Shape::CoordCa(canonical),
            offsets,
            weights: None,
        })
    }

    /// A weighted neighbourhood in LifeViewer notation.
    ///
    /// Either one hexadecimal digit per cell of the `(2r + 1)²` square,
    /// row by row, where `8`–`F` are negative; or two digits per cell,
    /// where `80`–`FF` are negative. Cells with zero weight are left out.
    pub fn from_weights(hex: &str, range: i32) -> Result<Self, Error> {
        check_range(range)?;
        let invalid = || Error::InvalidNeighbourhood(format!("W{}", hex));
        let side = 2 * range + 1;
        let cells = (side * side) as usize;
        let digits = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as i32))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        let weights: Vec<i32> = if digits.len() == cells {
            digits
                .into_iter()
                .map(|w| if w >= 8 { -(w - 8) } else { w })
                .collect()
        } else if digits.len() == 2 * cells {
            digits
                .chunks(2)
                .map(|pair| pair[0] * 16 + pair[1])
                .map(|w| if w >= 128 { -(w - 128) } else { w })
                .collect()
        } else {
            return Err(invalid());
        };

        let (offsets, weights) = weights
            .into_iter()
            .enumerate()
            .filter(|&(_, w)| w != 0)
            .map(|(i, w)| {
                let i = i as i32;
                (Coord::new(i % side - range, i / side - range), w)
            })
            .unzip();
        Ok(Neighbourhood {
            range,
            shape: Shape::Weights(hex.to_ascii_uppercase()),
            offsets,
            weights: Some(weights),
        })
    }

    /// Parses the part of a rule string after `N`.
    pub fn parse(input: &str, range: i32) -> Result<Self, Error> {
        if let Some(hex) = input.strip_prefix('@') {
            Neighbourhood::from_coord_ca(hex, range)
        } else if let Some(hex) = input.strip_prefix('W') {
            Neighbourhood::from_weights(hex, range)
        } else {
            let mut chars = input.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => Neighbourhood::from_symbol(symbol, range),
                _ => Err(Error::InvalidNeighbourhood(input.to_owned())),
            }
        }
    }

    /// The range.
    #[inline]
    pub fn range(&self) -> i32 {
        self.range
    }

    /// The offsets of the neighbours.
    #[inline]
    pub fn offsets(&self) -> &[Coord] {
        &self.offsets
    }

    /// The weights of the neighbours, if the neighbourhood is weighted.
    #[inline]
    pub fn weights(&self) -> Option<&[i32]> {
        self.weights.as_deref()
    }

    /// The offsets paired with their weights.
    #[auto_enum(Iterator)]
    pub fn weighted_offsets(&self) -> impl Iterator<Item = (Coord, i32)> + '_ {
        match &self.weights {
            Some(weights) => self.offsets.iter().copied().zip(weights.iter().copied()),
            None => self.offsets.iter().map(|&c| (c, 1)),
        }
    }

    /// The largest possible neighbourhood sum.
    pub fn max_count(&self) -> i32 {
        self.weighted_offsets().map(|(_, w)| w.max(0)).sum()
    }

    /// The weighted sum of the neighbours satisfying `counts`.
    pub fn count<F: Fn(State) -> bool>(&self, neighbours: &[State], counts: F) -> i32 {
        match &self.weights {
            Some(weights) => neighbours
                .iter()
                .zip(weights)
                .filter(|(&s, _)| counts(s))
                .map(|(_, &w)| w)
                .sum(),
            None => neighbours.iter().filter(|&&s| counts(s)).count() as i32,
        }
    }

    /// The suffix in classic `B/S` notation, if this is a range-1 Moore,
    /// von Neumann or hexagonal neighbourhood.
    pub fn classic_suffix(&self) -> Option<&'static str> {
        match (self.range, &self.shape) {
            (1, Shape::Symbol('M')) => Some(""),
            (1, Shape::Symbol('N')) => Some("V"),
            (1, Shape::Symbol('H')) => Some("H"),
            _ => None,
        }
    }
}

fn check_range(range: i32) -> Result<(), Error> {
    if (1..=MAX_RANGE).contains(&range) {
        Ok(())
    } else {
        Err(Error::InvalidRule(format!("range {}", range)))
    }
}

/// The part of a rule string after `N`.
impl Display for Neighbourhood {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.shape {
            Shape::Symbol(symbol) => write!(f, "{}", symbol),
            Shape::CoordCa(hex) => write!(f, "@{}", hex),
            Shape::Weights(hex) => write!(f, "W{}", hex),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() -> Result<(), Error> {
        assert_eq!(Neighbourhood::moore(1)?.offsets().len(), 8);
        assert_eq!(Neighbourhood::moore(2)?.offsets().len(), 24);
        assert_eq!(Neighbourhood::from_symbol('N', 2)?.offsets().len(), 12);
        assert_eq!(Neighbourhood::from_symbol('H', 1)?.offsets().len(), 6);
        assert_eq!(Neighbourhood::from_symbol('+', 2)?.offsets().len(), 8);
        assert_eq!(Neighbourhood::from_symbol('X', 2)?.offsets().len(), 8);
        assert_eq!(Neighbourhood::from_symbol('*', 2)?.offsets().len(), 16);
        assert_eq!(Neighbourhood::from_symbol('2', 2)?.offsets().len(), 12);
        assert_eq!(Neighbourhood::from_symbol('C', 2)?.offsets().len(), 20);
        assert!(Neighbourhood::from_symbol('Q', 1).is_err());
        assert!(Neighbourhood::moore(0).is_err());
        Ok(())
    }

    #[test]
    fn coord_ca() -> Result<(), Error> {
        let moore = Neighbourhood::from_coord_ca("FF", 1)?;
        assert_eq!(moore.offsets(), Neighbourhood::moore(1)?.offsets());
        let von_neumann = Neighbourhood::from_coord_ca("5A", 1)?;
        assert_eq!(
            von_neumann.offsets(),
            &[
                Coord::new(-1, 0),
                Coord::new(0, -1),
                Coord::new(0, 1),
                Coord::new(1, 0)
            ]
        );
        assert_eq!(von_neumann.to_string(), "@5A");
        assert!(Neighbourhood::from_coord_ca("FFF", 1).is_err());
        assert!(Neighbourhood::from_coord_ca("1FF", 1).is_err());
        Ok(())
    }

    #[test]
    fn coord_ca_leading_zeros() -> Result<(), Error> {
        let moore = Neighbourhood::from_coord_ca("FF", 1)?;
        assert_eq!(Neighbourhood::from_coord_ca("0FF", 1)?, moore);
        assert_eq!(Neighbourhood::from_coord_ca("000ff", 1)?, moore);
        assert_eq!(Neighbourhood::parse("@0FF", 1)?.to_string(), "@FF");

        let short = Neighbourhood::from_coord_ca("A", 1)?;
        assert_eq!(short.to_string(), "@0A");
        assert_eq!(short, Neighbourhood::from_coord_ca("0A", 1)?);
        assert_eq!(short.offsets(), &[Coord::new(0, 1), Coord::new(1, 0)]);

        let range_two = Neighbourhood::from_coord_ca("0000000000FF", 2)?;
        assert_eq!(range_two.to_string(), "@0000FF");
        Ok(())
    }

    #[test]
    fn weights() -> Result<(), Error> {
        let n = Neighbourhood::from_weights("111101111", 1)?;
        assert_eq!(n.offsets().len(), 8);
        assert_eq!(n.max_count(), 8);
        let n = Neighbourhood::from_weights("121202121", 1)?;
        assert_eq!(n.max_count(), 12);
        let n = Neighbourhood::from_weights("919000000", 1)?;
        assert_eq!(n.weights(), Some(&[-1, 1, -1][..]));
        assert_eq!(n.max_count(), 1);
        assert_eq!(
            n.count(&[State(1), State(1), State(0)], |s| s.is_alive()),
            0
        );
        Ok(())
    }

    #[test]
    fn gaussian() -> Result<(), Error> {
        let n = Neighbourhood::from_symbol('G', 1)?;
        assert_eq!(n.max_count(), 4 * 2 + 4 * 1);
        Ok(())
    }
}
