//! Cellular automata rules.
//!
//! Every rule space implements [`Rule`], which is all the [`Simulator`](crate::Simulator)
//! needs. Some rule spaces also implement the optional capabilities
//! [`MinMax`] (min / max rule inference) and [`TableExport`].
//!
//! [`RuleSpace`] is the closed set of all supported rule spaces;
//! parsing a rule string into a [`RuleSpace`] tries each of them in turn.
//!
//! For the notations of rule strings, please see
//! [this article on LifeWiki](https://conwaylife.com/wiki/Rulestring).

mod alternating;
mod cyclic;
mod deficient;
mod generations;
mod hensel;
mod hrot;
mod int;
mod neighbourhood;
mod one_dim;
mod regenerating;
mod space;
mod sums;
mod table;

pub use alternating::Alternating;
pub use cyclic::CyclicHrot;
pub use deficient::DeficientHrot;
pub use generations::HrotGenerations;
pub use hrot::Hrot;
pub use int::Int;
pub use neighbourhood::Neighbourhood;
pub use one_dim::OneDimensional;
pub use regenerating::RegeneratingGenerations;
pub use space::RuleSpace;
pub use table::{RuleTable, TableNeighbourhood, TableSymmetry};

use crate::{
    cells::{State, DEAD},
    coord::Coord,
    error::Error,
    grid::Grid,
};
use log::trace;
use rand::Rng;
use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    str::FromStr,
};

/// A cellular automaton rule.
///
/// States passed to and returned from [`transition`](Rule::transition) are
/// actual states. A [`Grid`] under simulation stores states relative to the
/// current background; [`convert_state`](Rule::convert_state) translates
/// between the two.
pub trait Rule: Clone + Display + FromStr<Err = Error> {
    /// The number of states.
    fn num_states(&self) -> usize;

    /// The neighbourhood used at the given generation, in the order
    /// that [`transition`](Rule::transition) expects the neighbours.
    fn neighbourhood(&self, generation: usize) -> &[Coord];

    /// The transition function.
    ///
    /// Given the states of the neighbours and of the cell itself,
    /// returns the state of the cell in the next generation.
    fn transition(&self, neighbours: &[State], state: State, generation: usize) -> State;

    /// The actual state of the infinite background, indexed by
    /// `generation % background().len()`.
    ///
    /// It is `[DEAD]` for rules without `B0`.
    fn background(&self) -> &[State];

    /// The number of generations after which the neighbourhood,
    /// the transition function and the background repeat.
    fn alternating_period(&self) -> usize {
        self.background().len()
    }

    /// Swaps `0` and the background state of the given generation.
    ///
    /// Converts stored states into actual states and back.
    fn convert_state(&self, state: State, generation: usize) -> State {
        let background = self.background();
        let bg = background[generation % background.len()];
        if state == DEAD {
            bg
        } else if state == bg {
            DEAD
        } else {
            state
        }
    }

    /// Advances the cells of `grid` by one generation.
    ///
    /// `changed` holds one set per phase of the alternating period;
    /// see [`step_cells`].
    fn step(&self, grid: &mut Grid, changed: &mut Vec<HashSet<Coord>>, generation: usize) {
        step_cells(self, grid, changed, generation, |_| false);
    }

    /// The display colour of a state, as `(red, green, blue)`.
    fn colour(&self, state: State) -> (u8, u8, u8) {
        let n = self.num_states();
        match state.0 {
            0 => (0, 0, 0),
            _ if n <= 2 => (255, 255, 255),
            s => (255, (255 * (s - 1).min(n - 2) / (n - 2)) as u8, 0),
        }
    }
}

/// Min / max rule inference.
pub trait MinMax: Rule {
    /// The tightest and the loosest rules in this rule space that produce
    /// the given sequence of consecutive generations.
    ///
    /// The grids must carry the actual background (see
    /// [`Grid::set_background`]). The first grid is at `first_generation`.
    fn min_max(&self, grids: &[Grid], first_generation: usize) -> Result<(Self, Self), Error>;

    /// Whether `min` and `max` are of the same rule space as `self`,
    /// with compatible parameters, and `min` is contained in `max`.
    fn valid_min_max(&self, min: &Self, max: &Self) -> bool;

    /// Whether this rule lies between `min` and `max`.
    ///
    /// Fails with [`Error::IncompatibleMinMax`] if the pair is not valid.
    fn between_min_max(&self, min: &Self, max: &Self) -> Result<bool, Error>;

    /// A random rule between `min` and `max`.
    ///
    /// Every transition in `min` is kept, every transition in `max` but not
    /// in `min` is kept with probability `1/2`.
    fn randomise<G: Rng + ?Sized>(&self, min: &Self, max: &Self, rng: &mut G) -> Result<Self, Error>;
}

/// Export to a transition table.
pub trait TableExport: Rule {
    /// Generates the transition table of the rule.
    fn rule_table(&self) -> Result<RuleTable, Error>;
}

/// Parses a rule string and returns its canonical form.
///
/// ```
/// use rcasim_lib::rules::canonicalize;
/// assert_eq!(canonicalize("23/3").unwrap(), "B3/S23");
/// ```
pub fn canonicalize(rule_string: &str) -> Result<String, Error> {
    Ok(rule_string.parse::<RuleSpace>()?.to_string())
}

/// The incremental stepping algorithm shared by all rules.
///
/// The candidate cells are the cells in any of the `changed` sets and
/// every cell whose neighbourhood contains one of them. When the alternating
/// period is larger than `1`, every stored non-zero cell and its neighbourhood
/// is added as well, since a cell may keep its stored state while its actual
/// state follows the changing background.
///
/// Cells in which `frozen` returns `true` for the stored state never change.
///
/// A changed cell goes into `changed[0]`. An unchanged candidate moves from
/// the first set containing it to the next one, and drops out after the last.
pub fn step_cells<R, F>(
    rule: &R,
    grid: &mut Grid,
    changed: &mut Vec<HashSet<Coord>>,
    generation: usize,
    frozen: F,
) where
    R: Rule + ?Sized,
    F: Fn(State) -> bool,
{
    let period = rule.alternating_period();
    if changed.len() != period {
        *changed = vec![HashSet::new(); period];
        changed[0].extend(grid.cells().map(|(coord, _)| coord));
    }

    let neighbourhood = rule.neighbourhood(generation);
    let mut candidates = HashSet::new();
    let mut add = |cell: Coord| {
        candidates.insert(cell);
        for &offset in neighbourhood {
            candidates.insert(cell - offset);
        }
    };
    for set in changed.iter() {
        set.iter().copied().for_each(&mut add);
    }
    if period > 1 {
        grid.cells().map(|(coord, _)| coord).for_each(&mut add);
    }

    let mut neighbours = Vec::with_capacity(neighbourhood.len());
    let mut updates = Vec::new();
    let mut unchanged = Vec::new();
    for cell in candidates {
        let prev = grid.get_cell(cell);
        if frozen(prev) {
            unchanged.push(cell);
            continue;
        }
        neighbours.clear();
        neighbours.extend(
            neighbourhood
                .iter()
                .map(|&offset| rule.convert_state(grid.get_cell(cell + offset), generation)),
        );
        let actual = rule.transition(&neighbours, rule.convert_state(prev, generation), generation);
        let next = rule.convert_state(actual, generation + 1);
        if next != prev {
            updates.push((cell, next));
        } else {
            unchanged.push(cell);
        }
    }

    for cell in unchanged {
        if let Some(i) = changed.iter().position(|set| set.contains(&cell)) {
            changed[i].remove(&cell);
            if i + 1 < period {
                changed[i + 1].insert(cell);
            }
        }
    }
    for (cell, state) in updates {
        grid.set_cell(cell, state);
        changed[0].insert(cell);
    }
}

/// Computes the actual background states of a rule.
///
/// Starting from a dead universe at generation `0`, `next(state, generation)`
/// gives the background of the following generation. The result is the
/// eventual cycle, indexed by `generation % len`.
pub(crate) fn background_cycle<F>(period: usize, mut next: F) -> Vec<State>
where
    F: FnMut(State, usize) -> State,
{
    let period = period.max(1);
    let mut seen = HashMap::new();
    let mut states = Vec::new();
    let mut state = DEAD;
    let mut generation = 0;
    let (first, len) = loop {
        if let Some(&first) = seen.get(&(state, generation % period)) {
            break (first, generation - first);
        }
        seen.insert((state, generation % period), generation);
        states.push(state);
        state = next(state, generation);
        generation += 1;
    };
    (0..len)
        .map(|k| states[first + (k + len - first % len) % len])
        .collect()
}

/// The background of a rule whose neighbourhood and transition function
/// are already set up.
pub(crate) fn uniform_background<R: Rule + ?Sized>(rule: &R, period: usize) -> Vec<State> {
    background_cycle(period, |state, generation| {
        let neighbours = vec![state; rule.neighbourhood(generation).len()];
        rule.transition(&neighbours, state, generation)
    })
}

/// A cell transition seen between two consecutive grids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Observation {
    /// The state of the cell.
    pub(crate) state: State,
    /// The states of its neighbours, in neighbourhood order.
    pub(crate) neighbours: Vec<State>,
    /// The state of the cell in the next grid.
    pub(crate) next: State,
}

/// Collects every cell transition in a sequence of consecutive grids.
///
/// Only cells near the live cells are examined; cells further away see
/// a uniform background, which the nearest examined cells already cover.
pub(crate) fn observations<R: Rule + ?Sized>(
    rule: &R,
    grids: &[Grid],
    first_generation: usize,
) -> Vec<Observation> {
    let mut result = Vec::new();
    for (i, pair) in grids.windows(2).enumerate() {
        let (grid, next) = (&pair[0], &pair[1]);
        let neighbourhood = rule.neighbourhood(first_generation + i);
        let margin = neighbourhood
            .iter()
            .map(|c| c.x.abs().max(c.y.abs()))
            .max()
            .unwrap_or(0)
            + 1;
        let (start, end) = grid.compute_bounds();
        for x in start.x - margin..=end.x + margin {
            for y in start.y - margin..=end.y + margin {
                let cell = Coord::new(x, y);
                result.push(Observation {
                    state: grid.get_cell(cell),
                    neighbours: neighbourhood
                        .iter()
                        .map(|&offset| grid.get_cell(cell + offset))
                        .collect(),
                    next: next.get_cell(cell),
                });
            }
        }
    }
    trace!("Collected {} cell transitions", result.len());
    result
}

/// Keeps each element of `max` that is not in `min` with probability `1/2`.
pub(crate) fn random_between<T, G>(min: &[T], max: &[T], rng: &mut G) -> Vec<T>
where
    T: Clone + PartialEq,
    G: Rng + ?Sized,
{
    max.iter()
        .filter(|t| min.contains(t) || rng.gen_bool(0.5))
        .cloned()
        .collect()
}
