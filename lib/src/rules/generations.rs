//! Generations rules with higher-range neighbourhoods.

use super::{
    hrot::{classic_sums, parse_hrot_fields, write_hrot_fields},
    neighbourhood::Neighbourhood,
    observations, random_between,
    sums::{split_fields, take_number, write_digits, Sums},
    table::{RuleTable, TableNeighbourhood, TableSymmetry},
    uniform_background, MinMax, Rule, TableExport,
};
use crate::{
    cells::{State, ALIVE, DEAD, MAX_STATES},
    coord::Coord,
    error::Error,
    grid::Grid,
};
use ca_rules::{ParseHexGen, ParseLifeGen, ParseNeumannGen};
use rand::Rng;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Birth and survival digits and the number of states of a classic
/// Generations rule string.
struct ClassicGen {
    b: Vec<u8>,
    s: Vec<u8>,
    gen: usize,
}

impl ParseLifeGen for ClassicGen {
    fn from_bsg(b: Vec<u8>, s: Vec<u8>, gen: usize) -> Self {
        ClassicGen { b, s, gen }
    }
}

impl ParseNeumannGen for ClassicGen {
    fn from_bsg(b: Vec<u8>, s: Vec<u8>, gen: usize) -> Self {
        ClassicGen { b, s, gen }
    }
}

impl ParseHexGen for ClassicGen {
    fn from_bsg(b: Vec<u8>, s: Vec<u8>, gen: usize) -> Self {
        ClassicGen { b, s, gen }
    }
}

/// Parses a classic Generations rule string like `23/3/3`, `B3/S23/C3`
/// or `B2/S013/3V`, trying the Moore neighbourhood first.
fn parse_classic_gen(input: &str) -> Result<(Neighbourhood, ClassicGen), Error> {
    match <ClassicGen as ParseLifeGen>::parse_rule(input) {
        Ok(rule) => Ok((Neighbourhood::moore(1)?, rule)),
        Err(e) => match (
            <ClassicGen as ParseNeumannGen>::parse_rule(input),
            <ClassicGen as ParseHexGen>::parse_rule(input),
        ) {
            (Ok(rule), _) => Ok((Neighbourhood::from_symbol('N', 1)?, rule)),
            (_, Ok(rule)) => Ok((Neighbourhood::from_symbol('H', 1)?, rule)),
            _ => Err(e.into()),
        },
    }
}

/// A Generations rule.
///
/// State `1` is alive and follows the birth and survival conditions,
/// counting only living neighbours. A living cell that does not survive
/// starts dying: it goes through the states `2, 3, ..., n - 1` and then
/// back to `0`, one state per generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HrotGenerations {
    neighbourhood: Neighbourhood,
    birth: Sums,
    survival: Sums,
    num_states: usize,
    /// Whether the rule string is written as `23/3/3`.
    classic: bool,
    background: Vec<State>,
}

impl HrotGenerations {
    /// Creates a rule from its parts.
    pub fn new(
        neighbourhood: Neighbourhood,
        birth: Sums,
        survival: Sums,
        num_states: usize,
    ) -> Result<Self, Error> {
        let classic = neighbourhood.classic_suffix().is_some();
        HrotGenerations::with_notation(neighbourhood, birth, survival, num_states, classic)
    }

    fn with_notation(
        neighbourhood: Neighbourhood,
        birth: Sums,
        survival: Sums,
        num_states: usize,
        classic: bool,
    ) -> Result<Self, Error> {
        if !(2..=MAX_STATES).contains(&num_states) {
            return Err(Error::InvalidRule(format!("{} states", num_states)));
        }
        let mut rule = HrotGenerations {
            neighbourhood,
            birth,
            survival,
            num_states,
            classic,
            background: vec![DEAD],
        };
        rule.background = uniform_background(&rule, 1);
        Ok(rule)
    }

    fn with_sums(&self, birth: Sums, survival: Sums) -> Self {
        let mut rule = HrotGenerations {
            birth,
            survival,
            background: vec![DEAD],
            ..self.clone()
        };
        rule.background = uniform_background(&rule, 1);
        rule
    }

    /// The state a living cell goes to when it does not survive.
    fn dying(&self) -> State {
        State(2 % self.num_states)
    }

    fn max_sums(&self) -> Sums {
        (0..=self.neighbourhood.max_count()).collect()
    }
}

impl FromStr for HrotGenerations {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.starts_with('R') {
            let mut fields = split_fields(input)?;
            let (neighbourhood, birth, survival) = parse_hrot_fields(input, &mut fields)?;
            let num_states = take_number(&mut fields, 'C', input)? as usize;
            if !fields.is_empty() {
                return Err(Error::InvalidRule(input.to_owned()));
            }
            HrotGenerations::with_notation(neighbourhood, birth, survival, num_states, false)
        } else {
            let (neighbourhood, ClassicGen { b, s, gen }) = parse_classic_gen(input)?;
            let max = neighbourhood.max_count();
            let birth = classic_sums(b, max, input)?;
            let survival = classic_sums(s, max, input)?;
            HrotGenerations::with_notation(neighbourhood, birth, survival, gen, true)
        }
    }
}

impl Display for HrotGenerations {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.neighbourhood.classic_suffix() {
            Some(suffix) if self.classic => write!(
                f,
                "{}/{}/{}{}",
                write_digits(&self.survival),
                write_digits(&self.birth),
                self.num_states,
                suffix
            ),
            _ => {
                write!(f, "R{},C{},", self.neighbourhood.range(), self.num_states)?;
                write_hrot_fields(f, &self.neighbourhood, &self.birth, &self.survival)
            }
        }
    }
}

impl Rule for HrotGenerations {
    fn num_states(&self) -> usize {
        self.num_states
    }

    fn neighbourhood(&self, _generation: usize) -> &[Coord] {
        self.neighbourhood.offsets()
    }

    fn transition(&self, neighbours: &[State], state: State, _generation: usize) -> State {
        match state {
            DEAD => {
                let sum = self.neighbourhood.count(neighbours, |s| s == ALIVE);
                if self.birth.contains(&sum) {
                    ALIVE
                } else {
                    DEAD
                }
            }
            ALIVE => {
                let sum = self.neighbourhood.count(neighbours, |s| s == ALIVE);
                if self.survival.contains(&sum) {
                    ALIVE
                } else {
                    self.dying()
                }
            }
            State(s) => State((s + 1) % self.num_states),
        }
    }

    fn background(&self) -> &[State] {
        &self.background
    }
}

impl MinMax for HrotGenerations {
    fn min_max(&self, grids: &[Grid], first_generation: usize) -> Result<(Self, Self), Error> {
        let mut min_birth = Sums::new();
        let mut min_survival = Sums::new();
        let mut max_birth = self.max_sums();
        let mut max_survival = self.max_sums();
        for obs in observations(self, grids, first_generation) {
            if obs.state.0 >= 2 {
                continue;
            }
            let sum = self.neighbourhood.count(&obs.neighbours, |s| s == ALIVE);
            match (obs.state, obs.next) {
                (DEAD, ALIVE) => min_birth.insert(sum),
                (DEAD, _) => max_birth.remove(&sum),
                (_, ALIVE) => min_survival.insert(sum),
                _ => max_survival.remove(&sum),
            };
        }
        Ok((
            self.with_sums(min_birth, min_survival),
            self.with_sums(max_birth, max_survival),
        ))
    }

    fn valid_min_max(&self, min: &Self, max: &Self) -> bool {
        [min, max].iter().all(|rule| {
            rule.neighbourhood == self.neighbourhood && rule.num_states == self.num_states
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

impl TableExport for HrotGenerations {
    fn rule_table(&self) -> Result<RuleTable, Error> {
        if self.background.len() > 1 {
            return Err(Error::Unsupported("tables of B0 rules"));
        }
        let symmetry = match self.neighbourhood.weights() {
            Some(_) => TableSymmetry::None,
            None => TableSymmetry::Permute,
        };
        let neighbourhood = TableNeighbourhood::Custom(self.neighbourhood.offsets().to_vec());
        let mut table = RuleTable::new(&self.to_string(), self.num_states, neighbourhood, symmetry);
        let all: Vec<_> = (0..self.num_states).collect();
        let not_alive: Vec<_> = all.iter().copied().filter(|&s| s != 1).collect();
        table.add_variables("any", &all);
        table.add_variables("dead", &not_alive);
        let off = |k| format!("dead{}", k);
        table.add_sums(&self.neighbourhood, &self.birth, "0", "1", off, "1")?;
        table.add_sums(&self.neighbourhood, &self.survival, "1", "1", off, "1")?;
        table.add_default("1", "any", &self.dying().0.to_string());
        for s in 2..self.num_states {
            table.add_default(&s.to_string(), "any", &((s + 1) % self.num_states).to_string());
        }
        Ok(table)
    }
}
