//! Searching a range of rules for rules in which a given pattern
//! becomes an oscillator or a spaceship.

use crate::{
    error::Error,
    grid::Grid,
    identify::{Pattern, PatternKind},
    rules::{MinMax, RuleSpace},
    simulator::Simulator,
};
use log::{debug, info};
use rand::Rng;
use std::collections::HashSet;

/// A search over the rules between a minimum and a maximum rule.
///
/// Each trial picks a random rule in the range, runs the target pattern
/// under it and identifies the result. Still lifes and patterns already
/// found are discarded.
#[derive(Clone, Debug)]
pub struct RuleSearch<R = RuleSpace> {
    target: Grid,
    min_rule: R,
    max_rule: R,
    max_period: usize,
    min_population: usize,
    max_population: usize,
    max_width: i32,
    max_height: i32,
    known: HashSet<(String, String)>,
    results: Vec<Pattern<R>>,
    searched: usize,
}

impl<R: MinMax> RuleSearch<R> {
    /// Creates a new search.
    ///
    /// Fails with [`Error::Unsupported`] if the rule space has no min / max
    /// rules, with [`Error::IncompatibleMinMax`] if `min_rule` is not
    /// contained in `max_rule`, and with [`Error::NonPositiveError`]
    /// if `max_period` is `0`.
    pub fn new(target: Grid, min_rule: R, max_rule: R, max_period: usize) -> Result<Self, Error> {
        if max_period == 0 {
            return Err(Error::NonPositiveError);
        }
        if !min_rule.between_min_max(&min_rule, &max_rule)? {
            return Err(Error::IncompatibleMinMax);
        }
        Ok(RuleSearch {
            target,
            min_rule,
            max_rule,
            max_period,
            min_population: 0,
            max_population: usize::MAX,
            max_width: i32::MAX,
            max_height: i32::MAX,
            known: HashSet::new(),
            results: Vec::new(),
            searched: 0,
        })
    }

    /// Sets the population range, both exclusive.
    ///
    /// A trial stops once the population leaves the range.
    pub fn set_population(mut self, min_population: usize, max_population: usize) -> Self {
        self.min_population = min_population;
        self.max_population = max_population;
        self
    }

    /// Sets the exclusive bounds of the width and height of the bounding box,
    /// measured as the difference of its corners.
    ///
    /// A trial stops once the pattern grows larger.
    pub fn set_max_size(mut self, max_width: i32, max_height: i32) -> Self {
        self.max_width = max_width;
        self.max_height = max_height;
        self
    }

    /// The patterns found so far.
    pub fn results(&self) -> &[Pattern<R>] {
        &self.results
    }

    /// The number of rules tried so far.
    pub fn searched(&self) -> usize {
        self.searched
    }

    /// Tries `num_rules` random rules, returning the number of new results.
    pub fn search<G: Rng + ?Sized>(&mut self, num_rules: usize, rng: &mut G) -> Result<usize, Error> {
        debug!(
            "Searching {} rules between {} and {}",
            num_rules, self.min_rule, self.max_rule
        );
        let found = self.results.len();
        for _ in 0..num_rules {
            let rule = self
                .min_rule
                .randomise(&self.min_rule, &self.max_rule, &mut *rng)?;
            let mut simulator = Simulator::with_grid(rule, self.target.deep_copy());
            let (min_population, max_population) = (self.min_population, self.max_population);
            let (max_width, max_height) = (self.max_width, self.max_height);
            let result = simulator.identify(self.max_period, |grid| {
                let population = grid.population();
                let (start, end) = grid.compute_bounds();
                population > min_population
                    && population < max_population
                    && end.x - start.x < max_width
                    && end.y - start.y < max_height
            })?;
            self.searched += 1;

            if let Some(pattern) = result {
                if *pattern.kind() == PatternKind::StillLife {
                    continue;
                }
                if self.known.insert((pattern.name(), pattern.grid().to_string())) {
                    info!("Found {} in {}", pattern.name(), pattern.rule());
                    self.results.push(pattern);
                }
            }
        }
        Ok(self.results.len() - found)
    }
}
