//! Regenerating Generations rules with higher-range neighbourhoods.

use super::{
    hrot::parse_hrot_fields,
    neighbourhood::Neighbourhood,
    observations, random_between,
    sums::{parse_sums, split_fields, take_number, write_sums, Sums},
    table::{RuleTable, TableNeighbourhood, TableSymmetry},
    uniform_background, MinMax, Rule, TableExport,
};
use crate::{
    cells::{State, ALIVE, DEAD, MAX_STATES},
    coord::Coord,
    error::Error,
    grid::Grid,
};
use rand::Rng;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The four sets of conditions of a rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Conditions {
    birth: Sums,
    survival: Sums,
    regen_birth: Sums,
    regen_survival: Sums,
}

impl Conditions {
    fn all(sums: Sums) -> Self {
        Conditions {
            birth: sums.clone(),
            survival: sums.clone(),
            regen_birth: sums.clone(),
            regen_survival: sums,
        }
    }

    fn sets(&self) -> impl Iterator<Item = &Sums> {
        IntoIterator::into_iter([
            &self.birth,
            &self.survival,
            &self.regen_birth,
            &self.regen_survival,
        ])
    }

    fn is_subset(&self, other: &Self) -> bool {
        self.sets().zip(other.sets()).all(|(a, b)| a.is_subset(b))
    }
}

/// A Regenerating Generations rule.
///
/// As in Generations, a living cell that does not survive starts dying and
/// goes through the states `2, 3, ..., n - 1` back to `0`. A dying cell
/// whose sum is in `RB` recovers by one state instead, and one whose sum is
/// in `RS` stays where it is. Dead cells are born into state `L`.
///
/// Only living cells (state `1`) count towards the sums.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegeneratingGenerations {
    neighbourhood: Neighbourhood,
    conditions: Conditions,
    num_states: usize,
    birth_state: State,
    background: Vec<State>,
}

/// Splits the `RB` and `RS` fields off a rule string, since [`split_fields`]
/// would read them as `R`.
///
/// Returns the other fields joined back together, then the items of `RB`
/// and of `RS`.
fn split_regenerating(input: &str) -> Result<(String, Vec<&str>, Vec<&str>), Error> {
    let invalid = || Error::InvalidRule(input.to_owned());
    let mut rest = Vec::new();
    let mut regen_birth: Option<Vec<&str>> = None;
    let mut regen_survival: Option<Vec<&str>> = None;
    let mut in_birth = None;
    for token in input.split(',').filter(|t| !t.is_empty()) {
        let field = if token.starts_with("RB") {
            Some(true)
        } else if token.starts_with("RS") {
            Some(false)
        } else {
            None
        };
        match (field, in_birth) {
            (Some(birth), _) => {
                let slot = if birth {
                    &mut regen_birth
                } else {
                    &mut regen_survival
                };
                if slot.is_some() {
                    return Err(invalid());
                }
                let items = &token[2..];
                *slot = Some(if items.is_empty() { Vec::new() } else { vec![items] });
                in_birth = Some(birth);
            }
            (None, Some(birth)) if token.starts_with(|c: char| c.is_ascii_digit()) => {
                let slot = if birth {
                    &mut regen_birth
                } else {
                    &mut regen_survival
                };
                slot.get_or_insert_with(Vec::new).push(token);
            }
            (None, _) => {
                in_birth = None;
                rest.push(token);
            }
        }
    }
    match (regen_birth, regen_survival) {
        (Some(regen_birth), Some(regen_survival)) => {
            Ok((rest.join(","), regen_birth, regen_survival))
        }
        _ => Err(invalid()),
    }
}

impl RegeneratingGenerations {
    fn build(
        neighbourhood: Neighbourhood,
        conditions: Conditions,
        num_states: usize,
        birth_state: usize,
    ) -> Result<Self, Error> {
        if !(2..=MAX_STATES).contains(&num_states) {
            return Err(Error::InvalidRule(format!("{} states", num_states)));
        }
        if !(1..num_states).contains(&birth_state) {
            return Err(Error::InvalidRule(format!("birth state {}", birth_state)));
        }
        let mut rule = RegeneratingGenerations {
            neighbourhood,
            conditions,
            num_states,
            birth_state: State(birth_state),
            background: vec![DEAD],
        };
        rule.background = uniform_background(&rule, 1);
        Ok(rule)
    }

    fn with_conditions(&self, conditions: Conditions) -> Self {
        let mut rule = RegeneratingGenerations {
            conditions,
            background: vec![DEAD],
            ..self.clone()
        };
        rule.background = uniform_background(&rule, 1);
        rule
    }

    fn max_sums(&self) -> Sums {
        (0..=self.neighbourhood.max_count()).collect()
    }
}

impl FromStr for RegeneratingGenerations {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (rest, regen_birth, regen_survival) = split_regenerating(input)?;
        let mut fields = split_fields(&rest)?;
        let (neighbourhood, birth, survival) = parse_hrot_fields(input, &mut fields)?;
        let num_states = take_number(&mut fields, 'G', input)? as usize;
        let birth_state = take_number(&mut fields, 'L', input)? as usize;
        if !fields.is_empty() {
            return Err(Error::InvalidRule(input.to_owned()));
        }
        let max = neighbourhood.max_count();
        let conditions = Conditions {
            birth,
            survival,
            regen_birth: parse_sums(regen_birth, max)?,
            regen_survival: parse_sums(regen_survival, max)?,
        };
        RegeneratingGenerations::build(neighbourhood, conditions, num_states, birth_state)
    }
}

impl Display for RegeneratingGenerations {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let c = &self.conditions;
        write!(
            f,
            "R{},G{},L{},B{}S{}RB{}RS{}N{}",
            self.neighbourhood.range(),
            self.num_states,
            self.birth_state.0,
            write_sums(&c.birth),
            write_sums(&c.survival),
            write_sums(&c.regen_birth),
            write_sums(&c.regen_survival),
            self.neighbourhood
        )
    }
}

impl Rule for RegeneratingGenerations {
    fn num_states(&self) -> usize {
        self.num_states
    }

    fn neighbourhood(&self, _generation: usize) -> &[Coord] {
        self.neighbourhood.offsets()
    }

    fn transition(&self, neighbours: &[State], state: State, _generation: usize) -> State {
        let sum = self.neighbourhood.count(neighbours, |s| s == ALIVE);
        let c = &self.conditions;
        match state {
            DEAD if c.birth.contains(&sum) => self.birth_state,
            DEAD => DEAD,
            ALIVE if c.survival.contains(&sum) => ALIVE,
            State(s) if s > 1 && c.regen_birth.contains(&sum) => State(s - 1),
            State(s) if s > 1 && c.regen_survival.contains(&sum) => state,
            State(s) => State((s + 1) % self.num_states),
        }
    }

    fn background(&self) -> &[State] {
        &self.background
    }
}

impl MinMax for RegeneratingGenerations {
    fn min_max(&self, grids: &[Grid], first_generation: usize) -> Result<(Self, Self), Error> {
        let mut min = Conditions::default();
        let mut max = Conditions::all(self.max_sums());
        for obs in observations(self, grids, first_generation) {
            let sum = self.neighbourhood.count(&obs.neighbours, |s| s == ALIVE);
            match (obs.state, obs.next) {
                (DEAD, next) if next == self.birth_state => {
                    min.birth.insert(sum);
                }
                (DEAD, _) => {
                    max.birth.remove(&sum);
                }
                (ALIVE, ALIVE) => {
                    min.survival.insert(sum);
                }
                (ALIVE, _) => {
                    max.survival.remove(&sum);
                }
                (State(s), State(t)) if t + 1 == s => {
                    min.regen_birth.insert(sum);
                }
                (State(s), State(t)) if t == s => {
                    max.regen_birth.remove(&sum);
                    min.regen_survival.insert(sum);
                }
                _ => {
                    max.regen_birth.remove(&sum);
                    max.regen_survival.remove(&sum);
                }
            }
        }
        Ok((self.with_conditions(min), self.with_conditions(max)))
    }

    fn valid_min_max(&self, min: &Self, max: &Self) -> bool {
        [min, max].iter().all(|rule| {
            rule.neighbourhood == self.neighbourhood
                && rule.num_states == self.num_states
                && rule.birth_state == self.birth_state
        }) && min.conditions.is_subset(&max.conditions)
    }

    fn between_min_max(&self, min: &Self, max: &Self) -> Result<bool, Error> {
        if !self.valid_min_max(min, max) {
            return Err(Error::IncompatibleMinMax);
        }
        Ok(min.conditions.is_subset(&self.conditions)
            && self.conditions.is_subset(&max.conditions))
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
        let (a, b) = (&min.conditions, &max.conditions);
        let conditions = Conditions {
            birth: pick(&a.birth, &b.birth),
            survival: pick(&a.survival, &b.survival),
            regen_birth: pick(&a.regen_birth, &b.regen_birth),
            regen_survival: pick(&a.regen_survival, &b.regen_survival),
        };
        Ok(self.with_conditions(conditions))
    }
}

impl TableExport for RegeneratingGenerations {
    fn rule_table(&self) -> Result<RuleTable, Error> {
        if self.background != [DEAD] {
            return Err(Error::Unsupported("tables of B0 rules"));
        }
        let symmetry = match self.neighbourhood.weights() {
            Some(_) => TableSymmetry::None,
            None => TableSymmetry::Permute,
        };
        let n = self.num_states;
        let neighbourhood = TableNeighbourhood::Custom(self.neighbourhood.offsets().to_vec());
        let mut table = RuleTable::new(&self.to_string(), n, neighbourhood, symmetry);
        let all: Vec<_> = (0..n).collect();
        let not_alive: Vec<_> = all.iter().copied().filter(|&s| s != 1).collect();
        table.add_variables("any", &all);
        table.add_variables("dead", &not_alive);

        let off = |k| format!("dead{}", k);
        let c = &self.conditions;
        let born = self.birth_state.0.to_string();
        table.add_sums(&self.neighbourhood, &c.birth, "0", "1", off, &born)?;
        table.add_sums(&self.neighbourhood, &c.survival, "1", "1", off, "1")?;
        for s in 2..n {
            let (state, recovered) = (s.to_string(), (s - 1).to_string());
            table.add_sums(&self.neighbourhood, &c.regen_birth, &state, "1", off, &recovered)?;
            table.add_sums(&self.neighbourhood, &c.regen_survival, &state, "1", off, &state)?;
        }
        for s in 1..n {
            table.add_default(&s.to_string(), "any", &((s + 1) % n).to_string());
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGEN_LIFE: &str = "R1,G3,L1,B3,S2-3,RB3,6,RS5,8,NM";

    fn neighbours(alive: usize) -> Vec<State> {
        let mut states = vec![DEAD; 8];
        states[..alive].iter_mut().for_each(|s| *s = ALIVE);
        states
    }

    #[test]
    fn regen_life() -> Result<(), Error> {
        let rule: RegeneratingGenerations = REGEN_LIFE.parse()?;
        assert_eq!(rule.to_string(), "R1,G3,L1,B3,S2,3,RB3,6,RS5,8,NM");
        assert_eq!(rule.to_string().parse::<RegeneratingGenerations>()?, rule);
        assert_eq!(rule.num_states(), 3);

        assert_eq!(rule.transition(&neighbours(3), DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&neighbours(2), DEAD, 0), DEAD);
        assert_eq!(rule.transition(&neighbours(2), ALIVE, 0), ALIVE);
        assert_eq!(rule.transition(&neighbours(4), ALIVE, 0), State(2));
        assert_eq!(rule.transition(&neighbours(3), State(2), 0), ALIVE);
        assert_eq!(rule.transition(&neighbours(5), State(2), 0), State(2));
        assert_eq!(rule.transition(&neighbours(4), State(2), 0), DEAD);
        // Dying cells do not count.
        let dying = vec![State(2); 8];
        assert_eq!(rule.transition(&dying, DEAD, 0), DEAD);
        Ok(())
    }

    #[test]
    fn birth_state() -> Result<(), Error> {
        let rule: RegeneratingGenerations = "R1,G4,L3,B3,S2,3,RB,RS,NM".parse()?;
        assert_eq!(rule.transition(&neighbours(3), DEAD, 0), State(3));
        assert_eq!(rule.transition(&neighbours(3), State(3), 0), DEAD);
        assert_eq!(rule.to_string(), "R1,G4,L3,B3,S2,3,RB,RS,NM");

        for invalid in [
            "R1,G3,L0,B3,S2,3,RB,RS,NM",
            "R1,G3,L3,B3,S2,3,RB,RS,NM",
            "R1,G1,L1,B3,S2,3,RB,RS,NM",
            "R1,G3,L1,B3,S2,3,RB,NM",
            "R1,G3,L1,B3,S2,3,RB3,RB4,RS,NM",
            "R1,G3,L1,B3,S2,3,RB9,RS,NM",
        ]
        .iter()
        {
            assert!(invalid.parse::<RegeneratingGenerations>().is_err(), "{}", invalid);
        }
        Ok(())
    }

    #[test]
    fn min_max() -> Result<(), Error> {
        let rule: RegeneratingGenerations = REGEN_LIFE.parse()?;
        let block: Grid = "oo$oo!".parse()?;
        let (min, max) = rule.min_max(&[block.clone(), block], 0)?;
        assert!(rule.between_min_max(&min, &max)?);
        assert!(min.conditions.survival.contains(&3));
        assert!(!max.conditions.birth.contains(&2));
        assert!(min.conditions.regen_birth.is_empty());
        assert_eq!(max.conditions.regen_survival, rule.max_sums());

        let other: RegeneratingGenerations = "R1,G4,L1,B3,S2,3,RB,RS,NM".parse()?;
        assert_eq!(
            rule.between_min_max(&other, &other),
            Err(Error::IncompatibleMinMax)
        );
        Ok(())
    }

    #[test]
    fn rule_table() -> Result<(), Error> {
        let rule: RegeneratingGenerations = REGEN_LIFE.parse()?;
        let table = rule.rule_table()?;
        let lines = table.transitions();
        assert!(lines.contains(&"0,1,1,1,dead3,dead4,dead5,dead6,dead7,1".to_owned()));
        assert!(lines.contains(&"2,1,1,1,dead3,dead4,dead5,dead6,dead7,1".to_owned()));
        assert!(lines.contains(&"2,1,1,1,1,1,dead5,dead6,dead7,2".to_owned()));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("2,any0,any1,any2,any3,any4,any5,any6,any7,0")
        );
        assert!(table.to_string().contains("n_states:3\n"));
        Ok(())
    }
}
