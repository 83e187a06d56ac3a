//! Pattern identification.
//!
//! [`Simulator::identify`] runs a pattern until it repeats, possibly
//! translated, and classifies it. Patterns that never repeat within the
//! given number of generations are tested for linear or power-law growth
//! of their population.

mod growth;

use crate::{
    coord::Coord,
    error::Error,
    grid::Grid,
    rules::{MinMax, RuleSpace},
    simulator::Simulator,
};
use growth::{deep_period, regress};
use log::{debug, info, trace, warn};
use std::collections::HashMap;

/// The smallest growth exponent of a power-law pattern.
const POWER_LAW_THRESHOLD: f64 = 1.10;

/// The kind of an identified pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// A pattern that never changes.
    StillLife,
    /// A pattern that returns to itself after `period` generations.
    Oscillator { period: usize },
    /// A pattern that returns to itself after `period` generations,
    /// translated by `(dx, dy)`.
    Spaceship { period: usize, dx: i32, dy: i32 },
    /// A pattern whose population grows by `rate` cells per generation
    /// on average, repeating its growth every `period` generations.
    LinearGrowth { period: usize, rate: f64 },
    /// A pattern whose cumulative population grows like
    /// `generation ^ exponent`.
    PowerLaw { exponent: f64 },
}

impl PatternKind {
    /// The period, if the pattern has one.
    pub fn period(&self) -> Option<usize> {
        match *self {
            PatternKind::StillLife => Some(1),
            PatternKind::Oscillator { period }
            | PatternKind::Spaceship { period, .. }
            | PatternKind::LinearGrowth { period, .. } => Some(period),
            PatternKind::PowerLaw { .. } => None,
        }
    }

    /// The displacement per period.
    pub fn displacement(&self) -> Coord {
        match *self {
            PatternKind::Spaceship { dx, dy, .. } => Coord::new(dx, dy),
            _ => Coord::ORIGIN,
        }
    }
}

/// The result of an identification.
#[derive(Clone, Debug)]
pub struct Pattern<R = RuleSpace> {
    kind: PatternKind,
    rule: R,
    grid: Grid,
    first_generation: usize,
    min_max: Option<(R, R)>,
}

impl<R> Pattern<R> {
    /// The kind of the pattern.
    #[inline]
    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    /// The rule under which the pattern was identified.
    #[inline]
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// The pattern at the generation where it was identified,
    /// with actual states and background.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The first generation of the repeating part.
    #[inline]
    pub fn first_generation(&self) -> usize {
        self.first_generation
    }

    /// The tightest and the loosest rules that also produce the
    /// observed generations, if the rule space supports them.
    #[inline]
    pub fn min_max(&self) -> Option<&(R, R)> {
        self.min_max.as_ref()
    }

    /// A short human readable name, like `P2 Oscillator` or `(1,1)c/4`.
    pub fn name(&self) -> String {
        match self.kind {
            PatternKind::StillLife => "Still Life".to_owned(),
            PatternKind::Oscillator { period } => format!("P{} Oscillator", period),
            PatternKind::Spaceship { period, dx, dy } => format!("({},{})c/{}", dx, dy, period),
            PatternKind::LinearGrowth { .. } => "Linear Growth".to_owned(),
            PatternKind::PowerLaw { exponent } => {
                let name = if exponent < 1.65 {
                    "zz_REPLICATOR"
                } else if exponent < 2.05 {
                    "zz_LINEAR"
                } else if exponent < 2.8 {
                    "zz_EXPLOSIVE"
                } else {
                    "zz_QUADRATIC"
                };
                name.to_owned()
            }
        }
    }
}

/// What is remembered of a generation.
struct Record {
    generation: usize,
    population: usize,
    bounds: (Coord, Coord),
    grid: Grid,
}

/// The earlier generation that `current` repeats, among those with the same hash.
///
/// A repeat has the same population, the same displacement of both corners
/// of the bounding box, the same phase of the rule, and the same cells.
fn repeated<'a>(bucket: &'a [Record], current: &Record, phases: usize) -> Option<&'a Record> {
    bucket.iter().find(|record| {
        let displacement = current.bounds.0 - record.bounds.0;
        record.population == current.population
            && current.bounds.1 - record.bounds.1 == displacement
            && (current.generation - record.generation) % phases == 0
            && record.grid.slow_equals(&current.grid, displacement)
    })
}

impl<R: MinMax> Simulator<R> {
    /// Runs the pattern for at most `max_period` generations and identifies it.
    ///
    /// `keep_going` is called on every new generation, with actual states;
    /// when it returns `false`, the identification stops with `Ok(None)`.
    ///
    /// Returns `Ok(None)` if the pattern is not identified. The simulator
    /// is left at the last generation it reached.
    pub fn identify<F>(
        &mut self,
        max_period: usize,
        mut keep_going: F,
    ) -> Result<Option<Pattern<R>>, Error>
    where
        F: FnMut(&Grid) -> bool,
    {
        if max_period == 0 {
            return Err(Error::NonPositiveError);
        }
        let initial_generation = self.generation();
        debug!(
            "Identifying a pattern of population {} under {} from generation {}",
            self.population(),
            self.rule(),
            initial_generation
        );

        // Generations in different phases of the rule never match.
        let phases = self.rule().alternating_period();
        let key = |hash: i32, generation: usize| hash.wrapping_add((31 * generation % phases) as i32);

        let mut records: HashMap<i32, Vec<Record>> = HashMap::new();
        records
            .entry(key(self.grid().hash_code(), initial_generation))
            .or_default()
            .push(Record {
                generation: initial_generation,
                population: self.population(),
                bounds: self.grid().compute_bounds(),
                grid: self.grid().deep_copy(),
            });
        let mut grids = vec![self.snapshot()];
        let mut populations = vec![0; max_period];
        let mut cumulative = vec![0; max_period + 2];
        cumulative[0] = self.population();
        let mut points = Vec::new();

        for i in 0..max_period {
            self.step();
            let generation = self.generation();
            let hash = key(self.grid().hash_code(), generation);
            let current = Record {
                generation,
                population: self.population(),
                bounds: self.grid().compute_bounds(),
                grid: self.grid().deep_copy(),
            };

            let bucket = records.entry(hash).or_default();
            if let Some(record) = repeated(bucket, &current, phases) {
                trace!(
                    "Generation {} repeats generation {}",
                    generation,
                    record.generation
                );
                let period = generation - record.generation;
                let kind = match current.bounds.0 - record.bounds.0 {
                    Coord::ORIGIN if period == 1 => PatternKind::StillLife,
                    Coord::ORIGIN => PatternKind::Oscillator { period },
                    Coord { x: dx, y: dy } => PatternKind::Spaceship { period, dx, dy },
                };
                let first_generation = record.generation;
                grids.push(self.snapshot());
                return self.found(kind, &grids, first_generation, initial_generation);
            }
            if !bucket.is_empty() {
                trace!(
                    "Hash collision at generation {} with {} earlier generations",
                    generation,
                    bucket.len()
                );
            }
            let population = current.population;
            bucket.push(current);

            populations[i] = population;
            cumulative[i + 1] = population + cumulative[i];
            if i > max_period / 2 {
                points.push(((i as f64).log10(), ((cumulative[i] + 1) as f64).log10()));
            }
            let snapshot = self.snapshot();
            let go_on = keep_going(&snapshot);
            grids.push(snapshot);
            if !go_on {
                debug!("Identification stopped at generation {}", generation);
                return Ok(None);
            }

            if i == max_period - 1 {
                if let Some(period) = deep_period(&populations, i / 3, 1) {
                    let rate = (populations[i] as f64 - populations[i - period] as f64)
                        / period as f64;
                    let kind = PatternKind::LinearGrowth { period, rate };
                    return self.found(kind, &grids, initial_generation, initial_generation);
                }
                let exponent = regress(&points);
                if exponent > POWER_LAW_THRESHOLD {
                    let kind = PatternKind::PowerLaw { exponent };
                    return self.found(kind, &grids, initial_generation, initial_generation);
                }
            }
        }

        warn!(
            "Pattern not identified after {} generations under {}",
            max_period,
            self.rule()
        );
        Ok(None)
    }

    /// Builds the result, with min / max rules from the grids since `first_generation`.
    fn found(
        &self,
        kind: PatternKind,
        grids: &[Grid],
        first_generation: usize,
        initial_generation: usize,
    ) -> Result<Option<Pattern<R>>, Error> {
        let min_max = match self
            .rule()
            .min_max(&grids[first_generation - initial_generation..], first_generation)
        {
            Ok(min_max) => Some(min_max),
            Err(Error::Unsupported(_)) => None,
            Err(e) => return Err(e),
        };
        let pattern = Pattern {
            kind,
            rule: self.rule().clone(),
            grid: self.snapshot(),
            first_generation,
            min_max,
        };
        info!("Identified {} under {}", pattern.name(), pattern.rule());
        Ok(Some(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(generation: usize, rle: &str, offset: Coord) -> Record {
        let mut grid = Grid::new();
        grid.from_rle(rle, offset).unwrap();
        Record {
            generation,
            population: grid.population(),
            bounds: grid.compute_bounds(),
            grid,
        }
    }

    #[test]
    fn collisions_are_not_repeats() {
        // Same population and bounding box, different cells.
        let bucket = vec![record(0, "oo$o!", Coord::ORIGIN)];
        let current = record(2, "oo$bo!", Coord::ORIGIN);
        assert!(repeated(&bucket, &current, 1).is_none());

        let bucket = vec![
            record(0, "oo$o!", Coord::ORIGIN),
            record(1, "oo$bo!", Coord::new(-3, 4)),
        ];
        let found = repeated(&bucket, &current, 1).map(|r| r.generation);
        assert_eq!(found, Some(1));
    }

    #[test]
    fn phases_must_agree() {
        let bucket = vec![record(0, "3o!", Coord::ORIGIN)];
        assert!(repeated(&bucket, &record(3, "3o!", Coord::ORIGIN), 2).is_none());
        assert!(repeated(&bucket, &record(4, "3o!", Coord::ORIGIN), 2).is_some());
    }

    #[test]
    fn names() {
        let name = |kind| {
            Pattern {
                kind,
                rule: (),
                grid: Grid::new(),
                first_generation: 0,
                min_max: None,
            }
            .name()
        };
        assert_eq!(name(PatternKind::Oscillator { period: 15 }), "P15 Oscillator");
        assert_eq!(
            name(PatternKind::Spaceship { period: 4, dx: -2, dy: 0 }),
            "(-2,0)c/4"
        );
        assert_eq!(name(PatternKind::PowerLaw { exponent: 1.2 }), "zz_REPLICATOR");
        assert_eq!(name(PatternKind::PowerLaw { exponent: 1.9 }), "zz_LINEAR");
        assert_eq!(name(PatternKind::PowerLaw { exponent: 2.5 }), "zz_EXPLOSIVE");
        assert_eq!(name(PatternKind::PowerLaw { exponent: 3.0 }), "zz_QUADRATIC");
    }
}
