//! Hensel notation for isotropic non-totalistic transitions
//! in the range-1 Moore neighbourhood.
//!
//! Neighbours are numbered clockwise starting from the top-left corner:
//!
//! ```plaintext
//! 0 1 2
//! 7 . 3
//! 6 5 4
//! ```

use crate::coord::Coord;
use std::sync::OnceLock;

/// The neighbourhood, in the order above.
pub(crate) const RING: [Coord; 8] = [
    Coord { x: -1, y: -1 },
    Coord { x: 0, y: -1 },
    Coord { x: 1, y: -1 },
    Coord { x: 1, y: 0 },
    Coord { x: 1, y: 1 },
    Coord { x: 0, y: 1 },
    Coord { x: -1, y: 1 },
    Coord { x: -1, y: 0 },
];

/// A representative of every letter, for every number of living neighbours.
///
/// Character `k` of the pattern is the state of neighbour `k`.
pub(crate) const LETTERS: [&[(char, &str)]; 9] = [
    &[('a', "00000000")],
    &[('c', "10000000"), ('e', "01000000")],
    &[
        ('c', "10100000"),
        ('e', "01000001"),
        ('k', "01001000"),
        ('a', "11000000"),
        ('i', "01000100"),
        ('n', "10001000"),
    ],
    &[
        ('c', "10101000"),
        ('e', "01010001"),
        ('k', "01001001"),
        ('a', "11000001"),
        ('i', "10000011"),
        ('n', "10100001"),
        ('y', "10100100"),
        ('q', "10001001"),
        ('j', "00110100"),
        ('r', "01100100"),
    ],
    &[
        ('c', "10101010"),
        ('e', "01010101"),
        ('k', "01101001"),
        ('a', "10000111"),
        ('i', "10110001"),
        ('n', "10001011"),
        ('y', "10100110"),
        ('q', "11001001"),
        ('j', "00110101"),
        ('r', "01110100"),
        ('t', "11100100"),
        ('w', "10001101"),
        ('z', "11001100"),
    ],
    &[
        ('c', "01010111"),
        ('e', "10101110"),
        ('k', "10110110"),
        ('a', "00111110"),
        ('i', "01111100"),
        ('n', "01011110"),
        ('y', "01011011"),
        ('q', "01110110"),
        ('j', "11001011"),
        ('r', "10011011"),
    ],
    &[
        ('c', "01011111"),
        ('e', "10111110"),
        ('k', "10110111"),
        ('a', "00111111"),
        ('i', "10111011"),
        ('n', "01110111"),
    ],
    &[('c', "01111111"), ('e', "10111111")],
    &[('a', "11111111")],
];

/// The neighbours as bits of a byte: bit `k` is neighbour `k`.
fn pattern_bits(pattern: &str) -> u8 {
    pattern
        .bytes()
        .enumerate()
        .filter(|&(_, b)| b == b'1')
        .fold(0, |bits, (k, _)| bits | 1 << k)
}

/// A quarter turn: neighbour `k` moves to `k - 2`.
fn rotate(bits: u8) -> u8 {
    bits.rotate_right(2)
}

/// A reflection across the vertical axis.
fn reflect(bits: u8) -> u8 {
    const IMAGE: [usize; 8] = [2, 1, 0, 7, 6, 5, 4, 3];
    (0..8)
        .filter(|&k| bits >> IMAGE[k] & 1 == 1)
        .fold(0, |acc, k| acc | 1 << k)
}

/// All 8 images of a configuration under rotations and reflections.
fn orbit(bits: u8) -> impl Iterator<Item = u8> {
    let mut images = [0; 8];
    let mut current = bits;
    for i in 0..4 {
        images[2 * i] = current;
        images[2 * i + 1] = reflect(current);
        current = rotate(current);
    }
    IntoIterator::into_iter(images)
}

/// The class of every configuration: the number of living neighbours
/// and the index of its letter in [`LETTERS`].
fn classes() -> &'static [(u8, u8); 256] {
    static CLASSES: OnceLock<[(u8, u8); 256]> = OnceLock::new();
    CLASSES.get_or_init(|| {
        let mut classes = [(u8::MAX, u8::MAX); 256];
        for (count, letters) in LETTERS.iter().enumerate() {
            for (index, (_, pattern)) in letters.iter().enumerate() {
                for image in orbit(pattern_bits(pattern)) {
                    classes[image as usize] = (count as u8, index as u8);
                }
            }
        }
        classes
    })
}

/// Converts a `ca-rules` neighbourhood byte, whose bits from high to low
/// are the neighbours read row by row, into bits of [`RING`].
#[inline]
pub(crate) fn ring_bits(byte: u8) -> u8 {
    const RING_INDEX: [u8; 8] = [4, 5, 6, 3, 7, 2, 1, 0];
    (0..8)
        .filter(|&bit| byte >> bit & 1 == 1)
        .fold(0, |bits, bit| bits | 1 << RING_INDEX[bit])
}

/// The class of the configuration whose living neighbours are the bits of `bits`.
#[inline]
pub(crate) fn classify(bits: u8) -> (usize, usize) {
    let (count, index) = classes()[bits as usize];
    (count as usize, index as usize)
}

/// A set of isotropic transitions.
///
/// Bit `i` of entry `n` is the `i`-th letter of [`LETTERS`] for `n`
/// living neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct HenselSet(pub(crate) [u16; 9]);

impl HenselSet {
    /// All transitions.
    pub(crate) fn full() -> Self {
        let mut set = HenselSet::default();
        for (count, letters) in LETTERS.iter().enumerate() {
            set.0[count] = (1 << letters.len()) - 1;
        }
        set
    }

    #[inline]
    pub(crate) fn contains(&self, (count, index): (usize, usize)) -> bool {
        self.0[count] >> index & 1 == 1
    }

    pub(crate) fn insert(&mut self, (count, index): (usize, usize)) {
        self.0[count] |= 1 << index;
    }

    pub(crate) fn remove(&mut self, (count, index): (usize, usize)) {
        self.0[count] &= !(1 << index);
    }

    pub(crate) fn is_subset(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a & !b == 0)
    }

    /// All transitions in the set, as `(count, index)`.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        LETTERS.iter().enumerate().flat_map(move |(count, letters)| {
            (0..letters.len())
                .filter(move |&index| self.contains((count, index)))
                .map(move |index| (count, index))
        })
    }

    /// Collects the neighbourhood bytes of a `ca-rules` non-totalistic
    /// parser into classes.
    ///
    /// Returns `None` when the bytes are not a union of whole classes,
    /// as with a non-isotropic `MAP` rule.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut present = [false; 256];
        let mut set = HenselSet::default();
        for &byte in bytes {
            present[byte as usize] = true;
            set.insert(classify(ring_bits(byte)));
        }
        (0..=255_u8)
            .all(|byte| present[byte as usize] == set.contains(classify(ring_bits(byte))))
            .then(|| set)
    }
}

/// Writes the canonical form: a count alone when all of its letters are
/// present, the missing letters after `-` when more than half are present,
/// and the present letters otherwise. Letters are sorted alphabetically.
impl std::fmt::Display for HenselSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (count, letters) in LETTERS.iter().enumerate() {
            let (present, missing): (Vec<_>, Vec<_>) = letters
                .iter()
                .enumerate()
                .map(|(index, &(letter, _))| (letter, self.contains((count, index))))
                .partition(|&(_, p)| p);
            let sorted = |list: Vec<(char, bool)>| {
                let mut letters: Vec<_> = list.into_iter().map(|(l, _)| l).collect();
                letters.sort_unstable();
                letters.into_iter().collect::<String>()
            };
            if present.is_empty() {
                continue;
            }
            write!(f, "{}", count)?;
            if missing.is_empty() {
                continue;
            }
            if present.len() * 2 > letters.len() {
                write!(f, "-{}", sorted(missing))?;
            } else {
                write!(f, "{}", sorted(present))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_configuration_has_a_class() {
        let mut seen = vec![Vec::new(); 9];
        for bits in 0..=255_u8 {
            let (count, index) = classify(bits);
            assert_eq!(count, bits.count_ones() as usize);
            assert!(index < LETTERS[count].len());
            seen[count].push(index);
        }
        for (count, letters) in LETTERS.iter().enumerate() {
            for index in 0..letters.len() {
                assert!(seen[count].contains(&index));
            }
        }
    }

    #[test]
    fn ring_bits_follow_the_ring() {
        // NW, N, NE, W, E, SW, S, SE from the highest bit.
        let order = [0, 1, 2, 7, 3, 6, 5, 4];
        for (bit, &k) in order.iter().rev().enumerate() {
            assert_eq!(ring_bits(1 << bit), 1 << k);
        }
        assert_eq!(ring_bits(0xff), 0xff);
    }

    #[test]
    fn whole_classes_only() {
        let corners = [0x01, 0x04, 0x20, 0x80];
        let set = HenselSet::from_bytes(&corners).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(1, 0)]);
        assert!(HenselSet::from_bytes(&corners[..3]).is_none());
        assert_eq!(HenselSet::from_bytes(&[]), Some(HenselSet::default()));
    }
}
