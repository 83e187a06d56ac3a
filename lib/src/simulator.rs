//! Running a rule on a grid.

use crate::{
    cells::{State, DEAD},
    coord::Coord,
    grid::Grid,
    rules::{Rule, RuleSpace},
};
use log::debug;
use std::collections::HashSet;

/// A [`Grid`] evolving under a [`Rule`].
///
/// The grid stores states relative to the current background of the rule,
/// so a rule with `B0` still keeps only finitely many cells.
///
/// The simulator keeps one set of recently changed cells for every phase of
/// the alternating period of the rule; only these cells and their
/// neighbourhoods are evaluated in each step.
#[derive(Clone, Debug)]
pub struct Simulator<R = RuleSpace> {
    grid: Grid,
    rule: R,
    generation: usize,
    changed: Vec<HashSet<Coord>>,
}

impl<R: Rule> Simulator<R> {
    /// Creates a simulator with an empty grid at generation `0`.
    pub fn new(rule: R) -> Self {
        Simulator::with_grid(rule, Grid::new())
    }

    /// Creates a simulator at generation `0` from a pattern.
    ///
    /// The pattern is read with its own background; every cell of it
    /// will be evaluated in the first step.
    pub fn with_grid(rule: R, pattern: Grid) -> Self {
        let mut simulator = Simulator {
            grid: Grid::new(),
            changed: vec![HashSet::new(); rule.alternating_period()],
            rule,
            generation: 0,
        };
        simulator.insert_cells(&pattern, Coord::ORIGIN);
        simulator
    }

    /// The rule.
    #[inline]
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Replaces the rule.
    ///
    /// Every stored cell is marked as changed, and cells with states
    /// the new rule does not have are cleared.
    pub fn set_rule(&mut self, rule: R) {
        debug!("Switching rule from {} to {}", self.rule, rule);
        let cells: Vec<_> = self.grid.cells().collect();
        let mut changed = vec![HashSet::new(); rule.alternating_period()];
        for (coord, state) in cells {
            if state.0 >= rule.num_states() {
                self.grid.set_cell(coord, DEAD);
            }
            changed[0].insert(coord);
        }
        self.changed = changed;
        self.rule = rule;
    }

    /// The current generation.
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Sets the generation counter.
    #[inline]
    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// The grid, storing states relative to the current background.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The cells that changed in the last step.
    #[inline]
    pub fn cells_changed(&self) -> &HashSet<Coord> {
        &self.changed[0]
    }

    /// The actual state of the background at the current generation.
    #[inline]
    pub fn background(&self) -> State {
        self.rule.convert_state(DEAD, self.generation)
    }

    /// The stored state of a cell, relative to the current background.
    #[inline]
    pub fn get_cell(&self, coord: Coord) -> State {
        self.grid.get_cell(coord)
    }

    /// The actual state of a cell.
    #[inline]
    pub fn actual_cell(&self, coord: Coord) -> State {
        self.rule.convert_state(self.grid.get_cell(coord), self.generation)
    }

    /// Sets the stored state of a cell and marks it as changed.
    pub fn set_cell(&mut self, coord: Coord, state: State) {
        self.grid.set_cell(coord, state);
        self.mark_changed(coord);
    }

    /// Copies every cell of `pattern`, shifted by `offset`, marking them as changed.
    pub fn insert_cells(&mut self, pattern: &Grid, offset: Coord) {
        for (coord, state) in pattern.cells() {
            self.set_cell(coord + offset, state);
        }
    }

    /// Clears the rectangle from `start` to `end`, inclusive.
    ///
    /// The cells that were not `0` are marked as changed.
    pub fn clear_cells(&mut self, start: Coord, end: Coord) {
        let cleared: Vec<_> = self
            .grid
            .cells()
            .map(|(coord, _)| coord)
            .filter(|c| c.x >= start.x && c.x <= end.x && c.y >= start.y && c.y <= end.y)
            .collect();
        self.grid.clear_cells(start, end);
        for coord in cleared {
            self.mark_changed(coord);
        }
    }

    fn mark_changed(&mut self, coord: Coord) {
        if self.changed.is_empty() {
            self.changed.push(HashSet::new());
        }
        self.changed[0].insert(coord);
    }

    /// The number of stored non-zero cells.
    #[inline]
    pub fn population(&self) -> usize {
        self.grid.population()
    }

    /// Advances one generation.
    pub fn step(&mut self) {
        self.rule
            .step(&mut self.grid, &mut self.changed, self.generation);
        self.generation += 1;
    }

    /// Advances `n` generations.
    pub fn step_by(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// A copy of the grid that holds actual states, with the background
    /// of the current generation.
    pub fn snapshot(&self) -> Grid {
        let mut snapshot = self.grid.deep_copy();
        snapshot.set_background(self.background());
        snapshot
    }

    /// Encodes the rectangle from `start` to `end` as the body of an RLE.
    ///
    /// Two-state rules use `o` and `b`.
    pub fn to_rle(&self, start: Coord, end: Coord) -> String {
        let rle = self.grid.to_rle(start, end);
        if self.rule.num_states() == 2 {
            rle.replace('A', "o").replace('.', "b")
        } else {
            rle
        }
    }
}
