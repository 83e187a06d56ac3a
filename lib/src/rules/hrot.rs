//! Two-state higher-range outer-totalistic rules.

use super::{
    neighbourhood::Neighbourhood,
    observations, random_between,
    sums::{parse_sums, split_fields, take_field, take_number, write_digits, write_sums, Sums},
    table::{RuleTable, TableNeighbourhood, TableSymmetry},
    uniform_background, MinMax, Rule, TableExport,
};
use crate::{
    cells::{State, ALIVE, DEAD},
    coord::Coord,
    error::Error,
    grid::Grid,
};
use ca_rules::{ParseHex, ParseLife, ParseNeumann};
use rand::Rng;
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Birth and survival digits of a classic `B/S` rule string.
struct Classic {
    b: Vec<u8>,
    s: Vec<u8>,
}

impl ParseLife for Classic {
    fn from_bs(b: Vec<u8>, s: Vec<u8>) -> Self {
        Classic { b, s }
    }
}

impl ParseNeumann for Classic {
    fn from_bs(b: Vec<u8>, s: Vec<u8>) -> Self {
        Classic { b, s }
    }
}

impl ParseHex for Classic {
    fn from_bs(b: Vec<u8>, s: Vec<u8>) -> Self {
        Classic { b, s }
    }
}

/// Turns the digits of a classic rule string into sums, all at most `max`.
pub(crate) fn classic_sums(digits: Vec<u8>, max: i32, input: &str) -> Result<Sums, Error> {
    let sums: Sums = digits.into_iter().map(i32::from).collect();
    match sums.iter().next_back() {
        Some(&d) if d > max => Err(Error::InvalidRule(input.to_owned())),
        _ => Ok(sums),
    }
}

/// Parses a classic rule string like `B3/S23`, `23/3`, `B2/S34H` or `B2/S013V`.
///
/// The Moore neighbourhood is tried first, then the `V` and `H` suffixes.
fn parse_classic(input: &str) -> Result<(Neighbourhood, Sums, Sums), Error> {
    let (neighbourhood, Classic { b, s }) = match <Classic as ParseLife>::parse_rule(input) {
        Ok(rule) => (Neighbourhood::moore(1)?, rule),
        Err(e) => match (
            <Classic as ParseNeumann>::parse_rule(input),
            <Classic as ParseHex>::parse_rule(input),
        ) {
            (Ok(rule), _) => (Neighbourhood::from_symbol('N', 1)?, rule),
            (_, Ok(rule)) => (Neighbourhood::from_symbol('H', 1)?, rule),
            _ => return Err(e.into()),
        },
    };
    let max = neighbourhood.max_count();
    Ok((
        neighbourhood,
        classic_sums(b, max, input)?,
        classic_sums(s, max, input)?,
    ))
}

/// Takes the range and the neighbourhood out of the fields of an HROT rule string.
pub(crate) fn take_neighbourhood(
    input: &str,
    fields: &mut Vec<(char, Vec<&str>)>,
) -> Result<Neighbourhood, Error> {
    let range = take_number(fields, 'R', input)? as i32;
    match take_field(fields, 'N').as_deref() {
        None => Neighbourhood::moore(range),
        Some([symbol]) => Neighbourhood::parse(symbol, range),
        Some(_) => Err(Error::InvalidRule(input.to_owned())),
    }
}

/// Parses the fields shared by all HROT rule strings: `R`, `S`, `B` and `N`.
///
/// The remaining fields are left in `fields` for the caller.
pub(crate) fn parse_hrot_fields<'a>(
    input: &'a str,
    fields: &mut Vec<(char, Vec<&'a str>)>,
) -> Result<(Neighbourhood, Sums, Sums), Error> {
    let invalid = || Error::InvalidRule(input.to_owned());
    let neighbourhood = take_neighbourhood(input, fields)?;
    let max = neighbourhood.max_count();
    let survival = parse_sums(take_field(fields, 'S').ok_or_else(invalid)?, max)?;
    let birth = parse_sums(take_field(fields, 'B').ok_or_else(invalid)?, max)?;
    Ok((neighbourhood, birth, survival))
}

/// Writes the `S..B..N..` part of an HROT rule string.
pub(crate) fn write_hrot_fields(
    f: &mut Formatter,
    neighbourhood: &Neighbourhood,
    birth: &Sums,
    survival: &Sums,
) -> fmt::Result {
    write!(
        f,
        "S{}B{}N{}",
        write_sums(survival),
        write_sums(birth),
        neighbourhood
    )
}

/// A two-state HROT rule.
///
/// A dead cell becomes alive when the weighted number of living neighbours
/// is in `birth`; a living cell stays alive when it is in `survival`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hrot {
    neighbourhood: Neighbourhood,
    birth: Sums,
    survival: Sums,
    /// Whether the rule string is written as `B3/S23`.
    classic: bool,
    background: Vec<State>,
}

impl Hrot {
    /// Creates a rule from its parts.
    pub fn new(neighbourhood: Neighbourhood, birth: Sums, survival: Sums) -> Self {
        let classic = neighbourhood.classic_suffix().is_some();
        Hrot::with_notation(neighbourhood, birth, survival, classic)
    }

    fn with_notation(neighbourhood: Neighbourhood, birth: Sums, survival: Sums, classic: bool) -> Self {
        let mut rule = Hrot {
            neighbourhood,
            birth,
            survival,
            classic,
            background: vec![DEAD],
        };
        rule.background = uniform_background(&rule, 1);
        rule
    }

    /// Same neighbourhood and notation, different conditions.
    fn with_sums(&self, birth: Sums, survival: Sums) -> Self {
        Hrot::with_notation(self.neighbourhood.clone(), birth, survival, self.classic)
    }

    /// The neighbourhood.
    pub fn neighbourhood_spec(&self) -> &Neighbourhood {
        &self.neighbourhood
    }

    /// The birth conditions.
    pub fn birth(&self) -> &Sums {
        &self.birth
    }

    /// The survival conditions.
    pub fn survival(&self) -> &Sums {
        &self.survival
    }

    fn max_sums(&self) -> Sums {
        (0..=self.neighbourhood.max_count()).collect()
    }
}

impl FromStr for Hrot {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.starts_with('R') {
            let mut fields = split_fields(input)?;
            let (neighbourhood, birth, survival) = parse_hrot_fields(input, &mut fields)?;
            match take_number(&mut fields, 'C', input) {
                Ok(0) | Ok(2) if fields.is_empty() => {
                    Ok(Hrot::with_notation(neighbourhood, birth, survival, false))
                }
                _ => Err(Error::InvalidRule(input.to_owned())),
            }
        } else {
            let (neighbourhood, birth, survival) = parse_classic(input)?;
            Ok(Hrot::with_notation(neighbourhood, birth, survival, true))
        }
    }
}

impl Display for Hrot {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.neighbourhood.classic_suffix() {
            Some(suffix) if self.classic => write!(
                f,
                "B{}/S{}{}",
                write_digits(&self.birth),
                write_digits(&self.survival),
                suffix
            ),
            _ => {
                write!(f, "R{},C2,", self.neighbourhood.range())?;
                write_hrot_fields(f, &self.neighbourhood, &self.birth, &self.survival)
            }
        }
    }
}

impl Rule for Hrot {
    fn num_states(&self) -> usize {
        2
    }

    fn neighbourhood(&self, _generation: usize) -> &[Coord] {
        self.neighbourhood.offsets()
    }

    fn transition(&self, neighbours: &[State], state: State, _generation: usize) -> State {
        let sum = self.neighbourhood.count(neighbours, |s| s == ALIVE);
        let conditions = if state == ALIVE {
            &self.survival
        } else {
            &self.birth
        };
        if conditions.contains(&sum) {
            ALIVE
        } else {
            DEAD
        }
    }

    fn background(&self) -> &[State] {
        &self.background
    }
}

impl MinMax for Hrot {
    fn min_max(&self, grids: &[Grid], first_generation: usize) -> Result<(Self, Self), Error> {
        let mut min_birth = Sums::new();
        let mut min_survival = Sums::new();
        let mut max_birth = self.max_sums();
        let mut max_survival = self.max_sums();
        for obs in observations(self, grids, first_generation) {
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
        self.neighbourhood == min.neighbourhood
            && self.neighbourhood == max.neighbourhood
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
        let pick = |min: &Sums, max: &Sums, rng: &mut G| -> Sums {
            let min: Vec<_> = min.iter().copied().collect();
            let max: Vec<_> = max.iter().copied().collect();
            random_between(&min, &max, &mut *rng).into_iter().collect()
        };
        let birth = pick(&min.birth, &max.birth, &mut *rng);
        let survival = pick(&min.survival, &max.survival, &mut *rng);
        Ok(self.with_sums(birth, survival))
    }
}

impl TableExport for Hrot {
    fn rule_table(&self) -> Result<RuleTable, Error> {
        if self.background.len() > 1 {
            return Err(Error::Unsupported("tables of B0 rules"));
        }
        let symmetry = match self.neighbourhood.weights() {
            Some(_) => TableSymmetry::None,
            None => TableSymmetry::Permute,
        };
        let neighbourhood = TableNeighbourhood::Custom(self.neighbourhood.offsets().to_vec());
        let mut table = RuleTable::new(&self.to_string(), 2, neighbourhood, symmetry);
        table.add_variables("any", &[0, 1]);
        let off = |_| "0".to_owned();
        table.add_sums(&self.neighbourhood, &self.birth, "0", "1", off, "1")?;
        table.add_sums(&self.neighbourhood, &self.survival, "1", "1", off, "1")?;
        table.add_default("1", "any", "0");
        Ok(table)
    }
}
