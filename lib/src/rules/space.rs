//! The closed set of all supported rule spaces.

use super::{
    Alternating, CyclicHrot, DeficientHrot, Hrot, HrotGenerations, Int, MinMax, OneDimensional,
    RegeneratingGenerations, Rule, RuleTable, TableExport,
};
use crate::{cells::State, coord::Coord, error::Error, grid::Grid};
use from_variants::FromVariants;
use log::debug;
use rand::Rng;
use std::{
    collections::HashSet,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A rule in any of the supported rule spaces.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, FromVariants)]
pub enum RuleSpace {
    /// A two-state [`Hrot`] rule.
    Hrot(Hrot),
    /// A [`HrotGenerations`] rule.
    HrotGenerations(HrotGenerations),
    /// A [`RegeneratingGenerations`] rule.
    RegeneratingGenerations(RegeneratingGenerations),
    /// A [`DeficientHrot`] rule.
    DeficientHrot(DeficientHrot),
    /// A [`CyclicHrot`] rule.
    CyclicHrot(CyclicHrot),
    /// An isotropic non-totalistic [`Int`] rule.
    Int(Int),
    /// An [`Alternating`] rule.
    Alternating(Alternating),
    /// A [`OneDimensional`] rule.
    OneDimensional(OneDimensional),
}

macro_rules! dispatch {
    ($self: expr, $rule: ident => $action: expr) => {
        match $self {
            RuleSpace::Hrot($rule) => $action,
            RuleSpace::HrotGenerations($rule) => $action,
            RuleSpace::RegeneratingGenerations($rule) => $action,
            RuleSpace::DeficientHrot($rule) => $action,
            RuleSpace::CyclicHrot($rule) => $action,
            RuleSpace::Int($rule) => $action,
            RuleSpace::Alternating($rule) => $action,
            RuleSpace::OneDimensional($rule) => $action,
        }
    };
}

impl RuleSpace {
    /// The name of the rule space.
    pub fn family(&self) -> &'static str {
        match self {
            RuleSpace::Hrot(_) => "HROT",
            RuleSpace::HrotGenerations(_) => "HROT Generations",
            RuleSpace::RegeneratingGenerations(_) => "HROT Regenerating Generations",
            RuleSpace::DeficientHrot(_) => "Deficient HROT",
            RuleSpace::CyclicHrot(_) => "Multistate Cyclic HROT",
            RuleSpace::Int(_) => "Isotropic Non-Totalistic",
            RuleSpace::Alternating(_) => "Alternating",
            RuleSpace::OneDimensional(_) => "1D",
        }
    }

    /// Whether the rule space supports min / max rules.
    pub fn supports_min_max(&self) -> bool {
        matches!(
            self,
            RuleSpace::Hrot(_)
                | RuleSpace::HrotGenerations(_)
                | RuleSpace::RegeneratingGenerations(_)
                | RuleSpace::DeficientHrot(_)
                | RuleSpace::Int(_)
        )
    }
}

/// Tries every rule space in turn.
impl FromStr for RuleSpace {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.contains('|') {
            return Ok(input.parse::<Alternating>()?.into());
        }
        let rule = input
            .parse::<Hrot>()
            .map(RuleSpace::from)
            .or_else(|_| input.parse::<HrotGenerations>().map(RuleSpace::from))
            .or_else(|_| input.parse::<DeficientHrot>().map(RuleSpace::from))
            .or_else(|_| input.parse::<RegeneratingGenerations>().map(RuleSpace::from))
            .or_else(|_| input.parse::<Int>().map(RuleSpace::from))
            .or_else(|_| input.parse::<CyclicHrot>().map(RuleSpace::from))
            .or_else(|_| input.parse::<OneDimensional>().map(RuleSpace::from))
            .map_err(|_| Error::InvalidRule(input.to_owned()))?;
        debug!("Parsed {} rule {}", rule.family(), rule);
        Ok(rule)
    }
}

impl Display for RuleSpace {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        dispatch!(self, rule => rule.fmt(f))
    }
}

impl Rule for RuleSpace {
    #[inline]
    fn num_states(&self) -> usize {
        dispatch!(self, rule => rule.num_states())
    }

    #[inline]
    fn neighbourhood(&self, generation: usize) -> &[Coord] {
        dispatch!(self, rule => rule.neighbourhood(generation))
    }

    #[inline]
    fn transition(&self, neighbours: &[State], state: State, generation: usize) -> State {
        dispatch!(self, rule => rule.transition(neighbours, state, generation))
    }

    #[inline]
    fn background(&self) -> &[State] {
        dispatch!(self, rule => rule.background())
    }

    #[inline]
    fn alternating_period(&self) -> usize {
        dispatch!(self, rule => rule.alternating_period())
    }

    #[inline]
    fn step(&self, grid: &mut Grid, changed: &mut Vec<HashSet<Coord>>, generation: usize) {
        dispatch!(self, rule => rule.step(grid, changed, generation))
    }

    #[inline]
    fn colour(&self, state: State) -> (u8, u8, u8) {
        dispatch!(self, rule => rule.colour(state))
    }
}

/// Rule spaces without min / max rules fail with [`Error::Unsupported`];
/// rules from different rule spaces are [`Error::IncompatibleMinMax`].
impl MinMax for RuleSpace {
    fn min_max(&self, grids: &[Grid], first_generation: usize) -> Result<(Self, Self), Error> {
        fn pair<R: Into<RuleSpace>>((min, max): (R, R)) -> (RuleSpace, RuleSpace) {
            (min.into(), max.into())
        }
        match self {
            RuleSpace::Hrot(rule) => rule.min_max(grids, first_generation).map(pair),
            RuleSpace::HrotGenerations(rule) => rule.min_max(grids, first_generation).map(pair),
            RuleSpace::RegeneratingGenerations(rule) => {
                rule.min_max(grids, first_generation).map(pair)
            }
            RuleSpace::DeficientHrot(rule) => rule.min_max(grids, first_generation).map(pair),
            RuleSpace::Int(rule) => rule.min_max(grids, first_generation).map(pair),
            _ => Err(Error::Unsupported("min / max rules")),
        }
    }

    fn valid_min_max(&self, min: &Self, max: &Self) -> bool {
        match (self, min, max) {
            (RuleSpace::Hrot(r), RuleSpace::Hrot(a), RuleSpace::Hrot(b)) => r.valid_min_max(a, b),
            (
                RuleSpace::HrotGenerations(r),
                RuleSpace::HrotGenerations(a),
                RuleSpace::HrotGenerations(b),
            ) => r.valid_min_max(a, b),
            (
                RuleSpace::RegeneratingGenerations(r),
                RuleSpace::RegeneratingGenerations(a),
                RuleSpace::RegeneratingGenerations(b),
            ) => r.valid_min_max(a, b),
            (
                RuleSpace::DeficientHrot(r),
                RuleSpace::DeficientHrot(a),
                RuleSpace::DeficientHrot(b),
            ) => r.valid_min_max(a, b),
            (RuleSpace::Int(r), RuleSpace::Int(a), RuleSpace::Int(b)) => r.valid_min_max(a, b),
            _ => false,
        }
    }

    fn between_min_max(&self, min: &Self, max: &Self) -> Result<bool, Error> {
        match (self, min, max) {
            (RuleSpace::Hrot(r), RuleSpace::Hrot(a), RuleSpace::Hrot(b)) => {
                r.between_min_max(a, b)
            }
            (
                RuleSpace::HrotGenerations(r),
                RuleSpace::HrotGenerations(a),
                RuleSpace::HrotGenerations(b),
            ) => r.between_min_max(a, b),
            (
                RuleSpace::RegeneratingGenerations(r),
                RuleSpace::RegeneratingGenerations(a),
                RuleSpace::RegeneratingGenerations(b),
            ) => r.between_min_max(a, b),
            (
                RuleSpace::DeficientHrot(r),
                RuleSpace::DeficientHrot(a),
                RuleSpace::DeficientHrot(b),
            ) => r.between_min_max(a, b),
            (RuleSpace::Int(r), RuleSpace::Int(a), RuleSpace::Int(b)) => r.between_min_max(a, b),
            _ if !self.supports_min_max() => Err(Error::Unsupported("min / max rules")),
            _ => Err(Error::IncompatibleMinMax),
        }
    }

    fn randomise<G: Rng + ?Sized>(&self, min: &Self, max: &Self, rng: &mut G) -> Result<Self, Error> {
        match (self, min, max) {
            (RuleSpace::Hrot(r), RuleSpace::Hrot(a), RuleSpace::Hrot(b)) => {
                r.randomise(a, b, rng).map(RuleSpace::from)
            }
            (
                RuleSpace::HrotGenerations(r),
                RuleSpace::HrotGenerations(a),
                RuleSpace::HrotGenerations(b),
            ) => r.randomise(a, b, rng).map(RuleSpace::from),
            (
                RuleSpace::RegeneratingGenerations(r),
                RuleSpace::RegeneratingGenerations(a),
                RuleSpace::RegeneratingGenerations(b),
            ) => r.randomise(a, b, rng).map(RuleSpace::from),
            (
                RuleSpace::DeficientHrot(r),
                RuleSpace::DeficientHrot(a),
                RuleSpace::DeficientHrot(b),
            ) => r.randomise(a, b, rng).map(RuleSpace::from),
            (RuleSpace::Int(r), RuleSpace::Int(a), RuleSpace::Int(b)) => {
                r.randomise(a, b, rng).map(RuleSpace::from)
            }
            _ if !self.supports_min_max() => Err(Error::Unsupported("min / max rules")),
            _ => Err(Error::IncompatibleMinMax),
        }
    }
}

impl TableExport for RuleSpace {
    fn rule_table(&self) -> Result<RuleTable, Error> {
        match self {
            RuleSpace::Hrot(rule) => rule.rule_table(),
            RuleSpace::HrotGenerations(rule) => rule.rule_table(),
            RuleSpace::RegeneratingGenerations(rule) => rule.rule_table(),
            RuleSpace::CyclicHrot(rule) => rule.rule_table(),
            RuleSpace::Int(rule) => rule.rule_table(),
            _ => Err(Error::Unsupported("transition tables")),
        }
    }
}
