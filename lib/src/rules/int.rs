//! Isotropic non-totalistic rules.

use super::{
    hensel::{classify, HenselSet, LETTERS, RING},
    observations, random_between,
    table::{RuleTable, TableNeighbourhood, TableSymmetry},
    uniform_background, MinMax, Rule, TableExport,
};
use crate::{
    cells::{State, ALIVE, DEAD, MAX_STATES},
    coord::Coord,
    error::Error,
    grid::Grid,
};
use ca_rules::ParseNtLifeGen;
use rand::Rng;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// An isotropic non-totalistic rule in the range-1 Moore neighbourhood,
/// with two states or with Generations-style dying states.
///
/// Birth and survival depend on the arrangement of the living neighbours
/// up to rotations and reflections, written in Hensel notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Int {
    birth: HenselSet,
    survival: HenselSet,
    num_states: usize,
    background: Vec<State>,
}

/// Neighbourhood bytes and the number of states of a non-totalistic
/// rule string.
struct NtClassic {
    b: Vec<u8>,
    s: Vec<u8>,
    gen: usize,
}

impl ParseNtLifeGen for NtClassic {
    fn from_bsg(b: Vec<u8>, s: Vec<u8>, gen: usize) -> Self {
        NtClassic { b, s, gen }
    }
}

/// The class of the arrangement of living neighbours.
fn class_of(neighbours: &[State]) -> (usize, usize) {
    let bits = neighbours
        .iter()
        .enumerate()
        .filter(|&(_, &s)| s == ALIVE)
        .fold(0_u8, |bits, (k, _)| bits | 1 << k);
    classify(bits)
}

impl Int {
    fn new(birth: HenselSet, survival: HenselSet, num_states: usize) -> Result<Self, Error> {
        if !(2..=MAX_STATES).contains(&num_states) {
            return Err(Error::InvalidRule(format!("{} states", num_states)));
        }
        let mut rule = Int {
            birth,
            survival,
            num_states,
            background: vec![DEAD],
        };
        rule.background = uniform_background(&rule, 1);
        Ok(rule)
    }

    fn with_sets(&self, birth: HenselSet, survival: HenselSet) -> Self {
        let mut rule = Int {
            birth,
            survival,
            num_states: self.num_states,
            background: vec![DEAD],
        };
        rule.background = uniform_background(&rule, 1);
        rule
    }

    fn dying(&self) -> State {
        State(2 % self.num_states)
    }
}

impl FromStr for Int {
    type Err = Error;

    /// Accepts `B2-a3/S23`, `23/2-a3` and, with more than two states,
    /// `B2-a3/S23/4`, `B2-a3/S23/C4`, `G4/B2-a3/S23` and `23/2-a3/4`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let NtClassic { b, s, gen } = ParseNtLifeGen::parse_rule(input)?;
        let invalid = || Error::InvalidRule(input.to_owned());
        let birth = HenselSet::from_bytes(&b).ok_or_else(invalid)?;
        let survival = HenselSet::from_bytes(&s).ok_or_else(invalid)?;
        Int::new(birth, survival, gen)
    }
}

impl Display for Int {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.num_states == 2 {
            write!(f, "B{}/S{}", self.birth, self.survival)
        } else {
            write!(f, "{}/{}/{}", self.survival, self.birth, self.num_states)
        }
    }
}

impl Rule for Int {
    fn num_states(&self) -> usize {
        self.num_states
    }

    fn neighbourhood(&self, _generation: usize) -> &[Coord] {
        &RING
    }

    fn transition(&self, neighbours: &[State], state: State, _generation: usize) -> State {
        match state {
            DEAD => {
                if self.birth.contains(class_of(neighbours)) {
                    ALIVE
                } else {
                    DEAD
                }
            }
            ALIVE => {
                if self.survival.contains(class_of(neighbours)) {
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

impl MinMax for Int {
    fn min_max(&self, grids: &[Grid], first_generation: usize) -> Result<(Self, Self), Error> {
        let mut min_birth = HenselSet::default();
        let mut min_survival = HenselSet::default();
        let mut max_birth = HenselSet::full();
        let mut max_survival = HenselSet::full();
        for obs in observations(self, grids, first_generation) {
            let class = class_of(&obs.neighbours);
            match (obs.state, obs.next) {
                (DEAD, ALIVE) => min_birth.insert(class),
                (DEAD, _) => max_birth.remove(class),
                (ALIVE, ALIVE) => min_survival.insert(class),
                (ALIVE, _) => max_survival.remove(class),
                _ => (),
            }
        }
        Ok((
            self.with_sets(min_birth, min_survival),
            self.with_sets(max_birth, max_survival),
        ))
    }

    fn valid_min_max(&self, min: &Self, max: &Self) -> bool {
        min.num_states == self.num_states
            && max.num_states == self.num_states
            && min.birth.is_subset(&max.birth)
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
        let mut pick = |min: &HenselSet, max: &HenselSet| {
            let min: Vec<_> = min.iter().collect();
            let max: Vec<_> = max.iter().collect();
            let mut set = HenselSet::default();
            for class in random_between(&min, &max, &mut *rng) {
                set.insert(class);
            }
            set
        };
        let birth = pick(&min.birth, &max.birth);
        let survival = pick(&min.survival, &max.survival);
        Ok(self.with_sets(birth, survival))
    }
}

impl TableExport for Int {
    fn rule_table(&self) -> Result<RuleTable, Error> {
        if self.background.len() > 1 {
            return Err(Error::Unsupported("tables of B0 rules"));
        }
        let mut table = RuleTable::new(
            &self.to_string(),
            self.num_states,
            TableNeighbourhood::Moore,
            TableSymmetry::Rotate4Reflect,
        );
        let all: Vec<_> = (0..self.num_states).collect();
        table.add_variables("any", &all);
        let off = |k: usize| {
            if self.num_states == 2 {
                "0".to_owned()
            } else {
                format!("dead{}", k)
            }
        };
        if self.num_states > 2 {
            let not_alive: Vec<_> = all.iter().copied().filter(|&s| s != 1).collect();
            table.add_variables("dead", &not_alive);
        }
        for (input, set) in [("0", &self.birth), ("1", &self.survival)].iter() {
            for (count, index) in set.iter() {
                // Tables list the neighbours clockwise from the north.
                let pattern = LETTERS[count][index].1.as_bytes();
                let neighbours: Vec<_> = (0..8)
                    .map(|k| {
                        if pattern[(k + 1) % 8] == b'1' {
                            "1".to_owned()
                        } else {
                            off(k)
                        }
                    })
                    .collect();
                table.add_transition(input, &neighbours, "1");
            }
        }
        table.add_default("1", "any", &self.dying().0.to_string());
        for s in 2..self.num_states {
            table.add_default(&s.to_string(), "any", &((s + 1) % self.num_states).to_string());
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::hensel::ring_bits;
    use ca_rules::ParseNtLife;

    struct Nt {
        b: Vec<u8>,
    }

    impl ParseNtLife for Nt {
        fn from_bs(b: Vec<u8>, _s: Vec<u8>) -> Self {
            Nt { b }
        }
    }

    #[test]
    fn letters_agree_with_parser() -> Result<(), Error> {
        for (count, letters) in LETTERS.iter().enumerate() {
            for (index, &(letter, pattern)) in letters.iter().enumerate() {
                let rule_string = if letters.len() == 1 {
                    format!("B{}/S", count)
                } else {
                    format!("B{}{}/S", count, letter)
                };
                let Nt { b } = ParseNtLife::parse_rule(&rule_string)?;
                assert!(!b.is_empty(), "{}", rule_string);
                for byte in b {
                    assert_eq!(classify(ring_bits(byte)), (count, index), "{}", rule_string);
                }
                let bits = pattern
                    .bytes()
                    .enumerate()
                    .filter(|&(_, c)| c == b'1')
                    .fold(0_u8, |bits, (k, _)| bits | 1 << k);
                assert_eq!(classify(bits), (count, index));
            }
        }
        Ok(())
    }

    #[test]
    fn parse_and_write() -> Result<(), Error> {
        let rule: Int = "B2-a3/S".parse()?;
        assert_eq!(rule.to_string(), "B2-a3/S");
        assert_eq!("B2cekain/S".parse::<Int>()?.to_string(), "B2/S");
        assert_eq!("B4ace/S".parse::<Int>()?.to_string(), "B4ace/S");
        assert_eq!("B3-cekaiq/S".parse::<Int>()?.to_string(), "B3jnry/S");
        assert_eq!("23/2n3/4".parse::<Int>()?.to_string(), "23/2n3/4");
        assert_eq!("G4/B2n3/S23".parse::<Int>()?.num_states(), 4);
        assert!("B2z/S".parse::<Int>().is_err());
        assert!("B9/S".parse::<Int>().is_err());
        Ok(())
    }

    #[test]
    fn rejects_non_isotropic_maps() {
        // Birth on a single neighbour to the north only.
        let map = format!("MAP{}AIAA{}", "A".repeat(20), "A".repeat(62));
        assert!(map.parse::<Int>().is_err());
    }
}
