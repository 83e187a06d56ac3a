//! Deficient HROT rules.

use super::{
    hrot::{parse_hrot_fields, write_hrot_fields},
    neighbourhood::Neighbourhood,
    observations, random_between,
    sums::{split_fields, take_number, Sums},
    uniform_background, MinMax, Rule,
};
use crate::{
    cells::{State, ALIVE, DEAD},
    coord::Coord,
    error::Error,
    grid::Grid,
};
use rand::Rng;
use std::{
    collections::HashSet,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A deficient HROT rule.
///
/// A cell born with neighbourhood sum `n` remembers `n` in its state,
/// and forbids its dead neighbours from being born with the same sum.
/// States `2, 3, ...` stand for the birth conditions in increasing order.
///
/// With permanent deficiency (`D1`) a surviving cell keeps its state;
/// otherwise it becomes plain alive (state `1`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeficientHrot {
    neighbourhood: Neighbourhood,
    birth: Sums,
    survival: Sums,
    permanent: bool,
    background: Vec<State>,
}

impl DeficientHrot {
    fn build(neighbourhood: Neighbourhood, birth: Sums, survival: Sums, permanent: bool) -> Self {
        let mut rule = DeficientHrot {
            neighbourhood,
            birth,
            survival,
            permanent,
            background: vec![DEAD],
        };
        rule.background = uniform_background(&rule, 1);
        rule
    }

    fn with_sums(&self, birth: Sums, survival: Sums) -> Self {
        DeficientHrot::build(self.neighbourhood.clone(), birth, survival, self.permanent)
    }

    /// The state of a cell born with the given sum.
    fn born_state(&self, sum: i32) -> Option<State> {
        self.birth
            .iter()
            .position(|&b| b == sum)
            .map(|index| State(index + 2))
    }

    /// The birth sum remembered by a state.
    fn remembered_sum(&self, state: State) -> Option<i32> {
        state
            .0
            .checked_sub(2)
            .and_then(|index| self.birth.iter().nth(index).copied())
    }

    /// The neighbourhood sum and the sums forbidden by the neighbours.
    fn sum_and_forbidden(&self, neighbours: &[State]) -> (i32, HashSet<i32>) {
        let sum = self.neighbourhood.count(neighbours, State::is_alive);
        let forbidden = neighbours
            .iter()
            .filter_map(|&s| self.remembered_sum(s))
            .collect();
        (sum, forbidden)
    }

    fn max_sums(&self) -> Sums {
        (0..=self.neighbourhood.max_count()).collect()
    }
}

impl FromStr for DeficientHrot {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut fields = split_fields(input)?;
        let (neighbourhood, birth, survival) = parse_hrot_fields(input, &mut fields)?;
        let permanent = match take_number(&mut fields, 'D', input)? {
            0 => false,
            1 => true,
            _ => return Err(Error::InvalidRule(input.to_owned())),
        };
        if !fields.is_empty() {
            return Err(Error::InvalidRule(input.to_owned()));
        }
        Ok(DeficientHrot::build(neighbourhood, birth, survival, permanent))
    }
}

impl Display for DeficientHrot {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "R{},D{},",
            self.neighbourhood.range(),
            self.permanent as u8
        )?;
        write_hrot_fields(f, &self.neighbourhood, &self.birth, &self.survival)
    }
}

impl Rule for DeficientHrot {
    fn num_states(&self) -> usize {
        self.birth.len() + 2
    }

    fn neighbourhood(&self, _generation: usize) -> &[Coord] {
        self.neighbourhood.offsets()
    }

    fn transition(&self, neighbours: &[State], state: State, _generation: usize) -> State {
        let (sum, forbidden) = self.sum_and_forbidden(neighbours);
        if state == DEAD {
            match self.born_state(sum) {
                Some(born) if !forbidden.contains(&sum) => born,
                _ => DEAD,
            }
        } else if self.survival.contains(&sum) {
            if self.permanent {
                state
            } else {
                ALIVE
            }
        } else {
            DEAD
        }
    }

    fn background(&self) -> &[State] {
        &self.background
    }
}

impl MinMax for DeficientHrot {
    fn min_max(&self, grids: &[Grid], first_generation: usize) -> Result<(Self, Self), Error> {
        let mut min_birth = Sums::new();
        let mut min_survival = Sums::new();
        let mut max_birth = self.max_sums();
        let mut max_survival = self.max_sums();
        for obs in observations(self, grids, first_generation) {
            let (sum, forbidden) = self.sum_and_forbidden(&obs.neighbours);
            match (obs.state.is_alive(), obs.next.is_alive()) {
                (false, true) => {
                    min_birth.insert(sum);
                }
                (false, false) if !forbidden.contains(&sum) => {
                    max_birth.remove(&sum);
                }
                (true, true) => {
                    min_survival.insert(sum);
                }
                (true, false) => {
                    max_survival.remove(&sum);
                }
                _ => (),
            }
        }
        Ok((
            self.with_sums(min_birth, min_survival),
            self.with_sums(max_birth, max_survival),
        ))
    }

    fn valid_min_max(&self, min: &Self, max: &Self) -> bool {
        [min, max].iter().all(|rule| {
            rule.neighbourhood == self.neighbourhood && rule.permanent == self.permanent
        }) && min.birth.is_subset(&max.birth)
            && min.survival.is_subset(&max.survival)
    }

    fn between_min_max(&self, min: &Self, max: &Self) -> Result<bool, Error> {
        if !self.valid_min_max(min, max) {
            return Err(Error::IncompatibleMinMax);
        }
        Ok(min.birth.is_subset(&self.birth)
            && self.birth.is_subset(&max.birth)
            && min.survival.is_subset(&self.survival)
            && self.survival.is_subset(&max.survival))
    }

    fn randomise<G: Rng + ?Sized>(&self, min: &Self, max: &Self, rng: &mut G) -> Result<Self, Error> {
        if !self.valid_min_max(min, max) {
            return Err(Error::IncompatibleMinMax);
        }
        let mut pick = |min: &Sums, max: &Sums| -> Sums {
            let min: Vec<_> = min.iter().copied().collect();
            let max: Vec<_> = max.iter().copied().collect();
            random_between(&min, &max, &mut *rng).into_iter().collect()
        };
        let birth = pick(&min.birth, &max.birth);
        let survival = pick(&min.survival, &max.survival);
        Ok(self.with_sums(birth, survival))
    }
}
