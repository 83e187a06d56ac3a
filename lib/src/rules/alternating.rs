//! Alternating rules.

use super::{background_cycle, space::RuleSpace, Rule};
use crate::{cells::State, coord::Coord, error::Error};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// A rule that cycles through a list of rules, one per generation,
/// written as `B3/S23|B36/S23`.
///
/// All rules must have the same number of states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alternating {
    rules: Vec<RuleSpace>,
    background: Vec<State>,
}

impl Alternating {
    /// Creates an alternating rule from at least two rules.
    pub fn new(rules: Vec<RuleSpace>) -> Result<Self, Error> {
        let first = match rules.as_slice() {
            [first, _, ..] => first.num_states(),
            _ => return Err(Error::InvalidRule("an alternating rule needs two rules".to_owned())),
        };
        if rules.iter().any(|rule| rule.num_states() != first) {
            return Err(Error::StateCountMismatch);
        }
        if rules.iter().any(|rule| matches!(rule, RuleSpace::Alternating(_))) {
            return Err(Error::InvalidRule("nested alternating rules".to_owned()));
        }
        let background = background_cycle(rules.len(), |state, generation| {
            let rule = &rules[generation % rules.len()];
            let neighbours = vec![state; rule.neighbourhood(generation).len()];
            rule.transition(&neighbours, state, generation)
        });
        Ok(Alternating { rules, background })
    }

    /// The rules, in order.
    pub fn rules(&self) -> &[RuleSpace] {
        &self.rules
    }

    #[inline]
    fn rule_at(&self, generation: usize) -> &RuleSpace {
        &self.rules[generation % self.rules.len()]
    }
}

impl FromStr for Alternating {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if !input.contains('|') {
            return Err(Error::InvalidRule(input.to_owned()));
        }
        let rules = input
            .split('|')
            .map(str::parse)
            .collect::<Result<Vec<RuleSpace>, _>>()?;
        Alternating::new(rules)
    }
}

impl Display for Alternating {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl Rule for Alternating {
    fn num_states(&self) -> usize {
        self.rules[0].num_states()
    }

    fn neighbourhood(&self, generation: usize) -> &[Coord] {
        self.rule_at(generation).neighbourhood(generation)
    }

    fn transition(&self, neighbours: &[State], state: State, generation: usize) -> State {
        self.rule_at(generation).transition(neighbours, state, generation)
    }

    fn background(&self) -> &[State] {
        &self.background
    }

    /// The least common multiple of the number of rules and the
    /// period of the background.
    fn alternating_period(&self) -> usize {
        let (a, b) = (self.rules.len(), self.background.len());
        a / gcd(a, b) * b
    }
}
