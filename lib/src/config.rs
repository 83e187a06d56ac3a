//! Simulation configuration.

use crate::{
    cells::{State, ALIVE},
    error::Error,
    grid::{Grid, Symmetry},
    identify::Pattern,
    rules::RuleSpace,
    simulator::Simulator,
};
use educe::Educe;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How to generate random soups.
#[derive(Clone, Debug, Educe, PartialEq, Eq)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoupConfig {
    /// Width.
    #[educe(Default = 16)]
    pub width: i32,

    /// Height.
    #[educe(Default = 16)]
    pub height: i32,

    /// The percentage of non-zero cells.
    #[educe(Default = 50)]
    pub density: u32,

    /// Symmetry of the soup.
    pub symmetry: Symmetry,

    /// The states to choose non-zero cells from, uniformly.
    #[educe(Default(expression = "vec![ALIVE]"))]
    pub states: Vec<State>,
}

/// Simulation configuration.
///
/// The simulator will be created from this configuration.
#[derive(Clone, Debug, Educe, PartialEq, Eq)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// The rule string of the cellular automaton.
    #[educe(Default(expression = "String::from(\"B3/S23\")"))]
    pub rule_string: String,

    /// The initial pattern, as the body of an RLE.
    pub rle: String,

    /// The number of generations to run before giving up identification.
    #[educe(Default = 2000)]
    pub max_period: usize,

    /// Random soups.
    pub soup: SoupConfig,
}

impl Config {
    /// Sets up a new configuration with given rule string and pattern.
    pub fn new<S: ToString, T: ToString>(rule_string: S, rle: T) -> Self {
        Config {
            rule_string: rule_string.to_string(),
            rle: rle.to_string(),
            ..Config::default()
        }
    }

    /// Sets the rule string.
    pub fn set_rule_string<S: ToString>(mut self, rule_string: S) -> Self {
        self.rule_string = rule_string.to_string();
        self
    }

    /// Sets the initial pattern.
    pub fn set_rle<S: ToString>(mut self, rle: S) -> Self {
        self.rle = rle.to_string();
        self
    }

    /// Sets the maximal number of generations for identification.
    pub fn set_max_period(mut self, max_period: usize) -> Self {
        self.max_period = max_period;
        self
    }

    /// Sets the size of random soups.
    pub fn set_soup_size(mut self, width: i32, height: i32) -> Self {
        self.soup.width = width;
        self.soup.height = height;
        self
    }

    /// Sets the density of random soups, in percent.
    pub fn set_soup_density(mut self, density: u32) -> Self {
        self.soup.density = density;
        self
    }

    /// Sets the symmetry of random soups.
    pub fn set_soup_symmetry(mut self, symmetry: Symmetry) -> Self {
        self.soup.symmetry = symmetry;
        self
    }

    /// Sets the states of random soups.
    pub fn set_soup_states<I: IntoIterator<Item = State>>(mut self, states: I) -> Self {
        self.soup.states = states.into_iter().collect();
        self
    }

    /// Parses the rule string.
    pub fn rule(&self) -> Result<RuleSpace, Error> {
        self.rule_string.parse()
    }

    /// Creates a new simulator with the initial pattern at generation `0`.
    pub fn simulator(&self) -> Result<Simulator, Error> {
        let rule = self.rule()?;
        let pattern: Grid = self.rle.parse()?;
        Ok(Simulator::with_grid(rule, pattern))
    }

    /// Runs the initial pattern and identifies it.
    pub fn identify(&self) -> Result<Option<Pattern>, Error> {
        self.simulator()?.identify(self.max_period, |_| true)
    }

    /// Generates a random soup.
    pub fn soup<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Grid, Error> {
        Grid::soup(
            self.soup.width,
            self.soup.height,
            self.soup.density,
            &self.soup.states,
            self.soup.symmetry,
            rng,
        )
    }
}
