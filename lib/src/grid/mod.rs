//! Sparse, unbounded grids of cells.
//!
//! A [`Grid`] stores its cells in [`Block`]s of `8 × 8` cells,
//! indexed by the coordinates of their top-left corners.
//! Blocks are only created when a non-background state is written into them.

mod block;
mod d8;
mod rle;
mod soup;

pub use block::{Block, BLOCK_SIZE};
pub use d8::{Symmetry, Transform};

use crate::{
    cells::{State, DEAD},
    coord::Coord,
};
use block::block_origin;
use std::collections::HashMap;

/// The seed of the translation-invariant hash.
const HASH_SEED: i32 = 31_415_962;
/// The multiplier of the translation-invariant hash.
const HASH_MULTIPLIER: i32 = 1_000_003;

/// A sparse grid of cells.
///
/// The grid stores states relative to its `background`:
/// writing the background state stores `0`, and reading an absent
/// or zero cell returns the background. This keeps the storage sparse
/// even when the infinite background is alive.
#[derive(Debug, Default)]
pub struct Grid {
    blocks: HashMap<Coord, Block>,
    background: State,
    start: Coord,
    end: Coord,
}

impl Grid {
    /// Creates an empty grid with a dead background.
    pub fn new() -> Self {
        Grid::default()
    }

    /// The background state.
    #[inline]
    pub fn background(&self) -> State {
        self.background
    }

    /// Sets the background state.
    ///
    /// The stored cells are not touched; only the interpretation of `0` changes.
    #[inline]
    pub fn set_background(&mut self, background: State) {
        self.background = background;
    }

    /// Swaps the background state with `0`.
    #[inline]
    fn convert(&self, state: State) -> State {
        if state == self.background {
            DEAD
        } else if state == DEAD {
            self.background
        } else {
            state
        }
    }

    #[inline]
    pub(crate) fn get_raw(&self, coord: Coord) -> State {
        self.blocks
            .get(&block_origin(coord))
            .map_or(DEAD, |block| block.get(coord))
    }

    pub(crate) fn set_raw(&mut self, coord: Coord, state: State) {
        let origin = block_origin(coord);
        if let Some(block) = self.blocks.get_mut(&origin) {
            block.set(coord, state);
        } else if state.is_alive() {
            let mut block = Block::new(origin);
            block.set(coord, state);
            self.blocks.insert(origin, block);
        }
    }

    /// Gets the state of a cell.
    #[inline]
    pub fn get_cell(&self, coord: Coord) -> State {
        self.convert(self.get_raw(coord))
    }

    /// Sets the state of a cell.
    ///
    /// No block is created when the state is the background.
    #[inline]
    pub fn set_cell(&mut self, coord: Coord, state: State) {
        let state = self.convert(state);
        self.set_raw(coord, state);
    }

    /// The number of stored non-zero cells.
    pub fn population(&self) -> usize {
        self.blocks.values().map(Block::population).sum()
    }

    /// Whether the grid has no stored non-zero cells.
    pub fn is_empty(&self) -> bool {
        self.blocks.values().all(|block| block.population() == 0)
    }

    /// The blocks with at least one non-zero cell.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values().filter(|block| block.population() > 0)
    }

    /// Iterates over the coordinates and states of all stored non-zero cells,
    /// in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, State)> + '_ {
        self.blocks()
            .flat_map(Block::cells)
            .map(move |(coord, state)| (coord, self.convert(state)))
    }

    /// The coordinates and raw states of all stored non-zero cells,
    /// sorted by `x` first, then by `y`.
    fn sorted_cells(&self) -> Vec<(Coord, State)> {
        let mut cells: Vec<_> = self.blocks().flat_map(Block::cells).collect();
        cells.sort_unstable();
        cells
    }

    /// Recomputes the bounding box of all stored non-zero cells.
    ///
    /// Only blocks with non-zero population are scanned.
    /// An empty grid gets the degenerate box `(0, 0)–(0, 0)`.
    pub fn update_bounds(&mut self) {
        let (start, end) = self.compute_bounds();
        self.start = start;
        self.end = end;
    }

    pub(crate) fn compute_bounds(&self) -> (Coord, Coord) {
        let mut bounds: Option<(Coord, Coord)> = None;
        for (coord, _) in self.blocks().flat_map(Block::cells) {
            bounds = Some(match bounds {
                None => (coord, coord),
                Some((start, end)) => (
                    Coord::new(start.x.min(coord.x), start.y.min(coord.y)),
                    Coord::new(end.x.max(coord.x), end.y.max(coord.y)),
                ),
            });
        }
        bounds.unwrap_or((Coord::ORIGIN, Coord::ORIGIN))
    }

    /// The bounding box computed by the last [`update_bounds`](Grid::update_bounds),
    /// as `(top-left, bottom-right)`, both inclusive.
    #[inline]
    pub fn bounds(&self) -> (Coord, Coord) {
        (self.start, self.end)
    }

    /// Copies every cell of `pattern` into this grid, shifted by `offset`.
    pub fn insert_cells(&mut self, pattern: &Grid, offset: Coord) {
        for (coord, state) in pattern.cells() {
            self.set_cell(coord + offset, state);
        }
    }

    /// Clears all cells in the rectangle from `start` to `end`, inclusive.
    pub fn clear_cells(&mut self, start: Coord, end: Coord) {
        let inside = |c: Coord| c.x >= start.x && c.x <= end.x && c.y >= start.y && c.y <= end.y;
        self.blocks.retain(|&origin, _| {
            !(inside(origin) && inside(origin + Coord::new(BLOCK_SIZE - 1, BLOCK_SIZE - 1)))
        });
        let cells: Vec<_> = self
            .blocks()
            .flat_map(Block::cells)
            .map(|(coord, _)| coord)
            .filter(|&coord| inside(coord))
            .collect();
        for coord in cells {
            self.set_raw(coord, DEAD);
        }
    }

    /// Removes every cell.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.start = Coord::ORIGIN;
        self.end = Coord::ORIGIN;
    }

    /// Copies the rectangle from `start` to `end`, inclusive, into a new grid.
    pub fn sub_grid(&self, start: Coord, end: Coord) -> Grid {
        let mut grid = Grid::new();
        for (coord, state) in self.cells() {
            if coord.x >= start.x && coord.x <= end.x && coord.y >= start.y && coord.y <= end.y {
                grid.set_cell(coord, state);
            }
        }
        grid
    }

    /// A deep copy of the grid.
    ///
    /// Blocks with zero population are not copied.
    pub fn deep_copy(&self) -> Grid {
        Grid {
            blocks: self
                .blocks
                .iter()
                .filter(|(_, block)| block.population() > 0)
                .map(|(&origin, block)| (origin, block.clone()))
                .collect(),
            background: self.background,
            start: self.start,
            end: self.end,
        }
    }

    /// A hash of the pattern that does not depend on its position.
    ///
    /// Every non-zero cell is folded in row-major order, relative to the
    /// top-left corner of the bounding box. Equal hashes do not imply
    /// equal patterns; use [`slow_equals`](Grid::slow_equals) to confirm.
    pub fn hash_code(&self) -> i32 {
        let mut cells: Vec<_> = self.blocks().flat_map(Block::cells).collect();
        let min_x = cells.iter().map(|(c, _)| c.x).min().unwrap_or(0);
        let min_y = cells.iter().map(|(c, _)| c.y).min().unwrap_or(0);
        cells.sort_unstable_by_key(|(c, _)| (c.y, c.x));
        cells.into_iter().fold(HASH_SEED, |hash, (coord, state)| {
            let hash = hash.wrapping_mul(HASH_MULTIPLIER) ^ (coord.y - min_y);
            let hash = hash.wrapping_mul(HASH_MULTIPLIER) ^ (coord.x - min_x);
            hash.wrapping_mul(HASH_MULTIPLIER) ^ state.0 as i32
        })
    }

    /// Whether `other` is exactly this pattern translated by `displacement`.
    ///
    /// Both cell lists are sorted, and every pair of corresponding cells
    /// must have the same state and differ by exactly `displacement`.
    pub fn slow_equals(&self, other: &Grid, displacement: Coord) -> bool {
        let cells = self.sorted_cells();
        let other_cells = other.sorted_cells();
        cells.len() == other_cells.len()
            && cells.iter().zip(&other_cells).all(|(&(c0, s0), &(c1, s1))| {
                s0 == s1 && c1 - c0 == displacement
            })
    }

    /// Reflects the rectangle from `start` to `end` across its middle column.
    pub fn reflect_x(&mut self, start: Coord, end: Coord) {
        self.remap(start, end, start, end, |c| Coord::new(end.x - c.x + start.x, c.y));
    }

    /// Reflects the rectangle from `start` to `end` across its middle row.
    pub fn reflect_y(&mut self, start: Coord, end: Coord) {
        self.remap(start, end, start, end, |c| Coord::new(c.x, end.y - c.y + start.y));
    }

    /// Rotates the rectangle from `start` to `end` clockwise about its centre.
    ///
    /// Odd-sized sides are padded by one cell so that the centre is a cell.
    pub fn rotate_cw(&mut self, start: Coord, end: Coord) {
        let (end, center) = rotation_center(start, end);
        self.remap(start, end, start, end, |c| {
            let d = c - center;
            Coord::new(center.x - d.y, center.y + d.x)
        });
    }

    /// Rotates the rectangle from `start` to `end` counterclockwise about its centre.
    ///
    /// Odd-sized sides are padded by one cell so that the centre is a cell.
    pub fn rotate_ccw(&mut self, start: Coord, end: Coord) {
        let (end, center) = rotation_center(start, end);
        self.remap(start, end, start, end, |c| {
            let d = c - center;
            Coord::new(center.x + d.y, center.y - d.x)
        });
    }

    /// Applies a [`Transform`] to the rectangle from `start` to `end`.
    ///
    /// The image is anchored at `start`. For a non-square rectangle,
    /// rotations by 90° and diagonal flips produce the transposed rectangle.
    pub fn transform(&mut self, transform: Transform, start: Coord, end: Coord) {
        let width = end.x - start.x + 1;
        let height = end.y - start.y + 1;
        let image_end = if transform.square_world() {
            start + Coord::new(height - 1, width - 1)
        } else {
            end
        };
        self.remap(start, end, start, image_end, |c| {
            start + transform.act_on(c - start, width, height)
        });
    }

    /// Moves every cell in `start..=end` to `f(cell)`, reading from a copy
    /// so that overlapping source and target never alias.
    fn remap<F: Fn(Coord) -> Coord>(
        &mut self,
        start: Coord,
        end: Coord,
        clear_start: Coord,
        clear_end: Coord,
        f: F,
    ) {
        let copy = self.deep_copy();
        self.clear_cells(start, end);
        self.clear_cells(clear_start, clear_end);
        for (coord, state) in copy.blocks().flat_map(Block::cells) {
            if coord.x >= start.x && coord.x <= end.x && coord.y >= start.y && coord.y <= end.y {
                self.set_raw(f(coord), state);
            }
        }
    }
}

/// Pads odd-sized sides and returns the new end and the centre.
fn rotation_center(start: Coord, mut end: Coord) -> (Coord, Coord) {
    if (end.x - start.x) % 2 == 1 {
        end.x += 1;
    }
    if (end.y - start.y) % 2 == 1 {
        end.y += 1;
    }
    let center = Coord::new(
        (end.x - start.x) / 2 + start.x,
        (end.y - start.y) / 2 + start.y,
    );
    (end, center)
}

impl Clone for Grid {
    fn clone(&self) -> Self {
        self.deep_copy()
    }
}

/// Two grids are equal when they contain the same cells with the same states.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.population() == other.population()
            && self.cells().all(|(coord, state)| other.get_cell(coord) == state)
    }
}

impl Eq for Grid {}
