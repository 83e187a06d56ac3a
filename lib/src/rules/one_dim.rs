//! One-dimensional rules in Wolfram notation.
//!
//! Each row of the grid is one generation: a cell is computed from the
//! `2r + 1` cells above it, and never changes afterwards.

use super::{
    neighbourhood::MAX_RANGE,
    step_cells,
    sums::{split_fields, take_field, take_number},
    uniform_background, Rule,
};
use crate::{
    cells::{State, DEAD},
    coord::Coord,
    error::Error,
    grid::Grid,
};
use std::{
    collections::HashSet,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The largest supported number of neighbourhood configurations.
const MAX_CONFIGURATIONS: usize = 1 << 20;

/// A one-dimensional rule, like `W110` or `R2,C3,W123456`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OneDimensional {
    range: i32,
    num_states: usize,
    /// The rule number in decimal, without leading zeros.
    rule_number: String,
    /// The next state of every configuration of the cells above,
    /// read as a base-`num_states` number with the leftmost cell first.
    table: Vec<State>,
    neighbourhood: Vec<Coord>,
    background: Vec<State>,
}

/// The digits of a decimal number in base `base`, least significant first,
/// keeping at most `len` of them and padding with zeros.
fn to_base(decimal: &str, base: usize, len: usize) -> Vec<usize> {
    let mut number: Vec<usize> = decimal.bytes().map(|b| (b - b'0') as usize).collect();
    let mut digits = Vec::with_capacity(len);
    while digits.len() < len && number.iter().any(|&d| d != 0) {
        let mut remainder = 0;
        for d in number.iter_mut() {
            let current = remainder * 10 + *d;
            *d = current / base;
            remainder = current % base;
        }
        digits.push(remainder);
    }
    digits.resize(len, 0);
    digits
}

impl OneDimensional {
    fn new(range: i32, num_states: usize, rule_number: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidRule(format!("R{},C{},W{}", range, num_states, rule_number));
        if !(1..=MAX_RANGE).contains(&range)
            || num_states < 2
            || rule_number.is_empty()
            || !rule_number.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let configurations = (0..2 * range + 1).try_fold(1_usize, |acc, _| {
            acc.checked_mul(num_states)
                .filter(|&n| n <= MAX_CONFIGURATIONS)
        });
        let configurations = configurations.ok_or_else(invalid)?;
        let trimmed = rule_number.trim_start_matches('0');
        let rule_number = if trimmed.is_empty() { "0" } else { trimmed };
        let table = to_base(rule_number, num_states, configurations)
            .into_iter()
            .map(State)
            .collect();
        let mut rule = OneDimensional {
            range,
            num_states,
            rule_number: rule_number.to_owned(),
            table,
            neighbourhood: (-range..=range).map(|i| Coord::new(i, -1)).collect(),
            background: vec![DEAD],
        };
        rule.background = uniform_background(&rule, 1);
        Ok(rule)
    }
}

impl FromStr for OneDimensional {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if let Some(number) = input.strip_prefix('W') {
            return OneDimensional::new(1, 2, number);
        }
        let invalid = || Error::InvalidRule(input.to_owned());
        let mut fields = split_fields(input)?;
        let range = take_number(&mut fields, 'R', input)? as i32;
        let num_states = take_number(&mut fields, 'C', input)? as usize;
        let number = match take_field(&mut fields, 'W').as_deref() {
            Some([number]) if fields.is_empty() => number.to_owned(),
            _ => return Err(invalid()),
        };
        OneDimensional::new(range, num_states, &number)
    }
}

impl Display for OneDimensional {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.range == 1 && self.num_states == 2 {
            write!(f, "W{}", self.rule_number)
        } else {
            write!(f, "R{},C{},W{}", self.range, self.num_states, self.rule_number)
        }
    }
}

impl Rule for OneDimensional {
    fn num_states(&self) -> usize {
        self.num_states
    }

    fn neighbourhood(&self, _generation: usize) -> &[Coord] {
        &self.neighbourhood
    }

    fn transition(&self, neighbours: &[State], _state: State, _generation: usize) -> State {
        let index = neighbours
            .iter()
            .fold(0, |acc, s| acc * self.num_states + s.0.min(self.num_states - 1));
        self.table.get(index).copied().unwrap_or(DEAD)
    }

    fn background(&self) -> &[State] {
        &self.background
    }

    /// Cells that already hold a state are never recomputed.
    fn step(&self, grid: &mut Grid, changed: &mut Vec<HashSet<Coord>>, generation: usize) {
        step_cells(self, grid, changed, generation, State::is_alive);
    }
}
