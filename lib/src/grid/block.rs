//! Dense square tiles of cells.

use crate::{cells::State, coord::Coord};

/// The side length of a [`Block`].
pub const BLOCK_SIZE: i32 = 8;

const AREA: usize = (BLOCK_SIZE * BLOCK_SIZE) as usize;

/// Rounds a coordinate down to the origin of the block containing it.
///
/// Uses floor division so that negative coordinates land in the right block.
#[inline]
pub(crate) fn block_origin(coord: Coord) -> Coord {
    Coord::new(
        coord.x.div_euclid(BLOCK_SIZE) * BLOCK_SIZE,
        coord.y.div_euclid(BLOCK_SIZE) * BLOCK_SIZE,
    )
}

/// A `BLOCK_SIZE × BLOCK_SIZE` tile of cell states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    origin: Coord,
    cells: [State; AREA],
    population: usize,
}

impl Block {
    /// Creates an empty block anchored at `origin`.
    pub(crate) fn new(origin: Coord) -> Self {
        Block {
            origin,
            cells: [State::default(); AREA],
            population: 0,
        }
    }

    /// The top-left corner of the block.
    #[inline]
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// The number of non-zero cells in the block.
    #[inline]
    pub fn population(&self) -> usize {
        self.population
    }

    #[inline]
    fn index(&self, coord: Coord) -> usize {
        let x = coord.x.rem_euclid(BLOCK_SIZE);
        let y = coord.y.rem_euclid(BLOCK_SIZE);
        (y * BLOCK_SIZE + x) as usize
    }

    /// Gets the raw state of a cell inside this block.
    #[inline]
    pub(crate) fn get(&self, coord: Coord) -> State {
        self.cells[self.index(coord)]
    }

    /// Sets the raw state of a cell inside this block,
    /// keeping the population count exact.
    #[inline]
    pub(crate) fn set(&mut self, coord: Coord, state: State) {
        let index = self.index(coord);
        let old = self.cells[index];
        match (old.is_alive(), state.is_alive()) {
            (false, true) => self.population += 1,
            (true, false) => self.population -= 1,
            _ => (),
        }
        self.cells[index] = state;
    }

    /// Iterates over the non-zero cells in row-major order.
    pub(crate) fn cells(&self) -> impl Iterator<Item = (Coord, State)> + '_ {
        let origin = self.origin;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_alive())
            .map(move |(i, &state)| {
                let i = i as i32;
                (
                    Coord::new(origin.x + i % BLOCK_SIZE, origin.y + i / BLOCK_SIZE),
                    state,
                )
            })
    }
}
