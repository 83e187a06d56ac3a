//! Multistate cyclic HROT rules.
//!
//! A transition depends on the state of the cell and on how many of its
//! neighbours are in each living state. The living states `1, 2, ..., n - 1`
//! form a cycle: every transition also holds with all living states moved
//! the same number of steps along it.
//!
//! Rule strings list the counts of the living states for every transition,
//! `n - 1` counts at a time. `B` transitions take a dead cell to state `1`,
//! `S` transitions keep a cell in state `1`, and the `k`-th `M` field takes
//! a cell in state `1` to state `k + 1`. A count `l` stands for any count,
//! and `l-0-3` for any count except `0` and `3`. Cells matching no
//! transition die.

use super::{
    hrot::take_neighbourhood,
    neighbourhood::Neighbourhood,
    sums::{split_fields, take_field, take_number},
    table::{RuleTable, TableNeighbourhood, TableSymmetry},
    uniform_background, Rule, TableExport,
};
use crate::{
    cells::{State, ALIVE, DEAD, MAX_STATES},
    coord::Coord,
    error::Error,
};
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
    iter,
    str::FromStr,
};

/// A count in a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Count {
    Exact(usize),
    /// Any count except the listed ones.
    Any(Vec<usize>),
}

/// Parses single-digit counts, like `002l-0-1`.
fn digit_counts(counts: &str) -> Option<Vec<Count>> {
    let mut result = Vec::new();
    let mut chars = counts.chars().peekable();
    while let Some(c) = chars.next() {
        if c == 'l' {
            let mut except = Vec::new();
            while chars.peek() == Some(&'-') {
                chars.next();
                except.push(chars.next()?.to_digit(9)? as usize);
            }
            result.push(Count::Any(except));
        } else {
            result.push(Count::Exact(c.to_digit(9)? as usize));
        }
    }
    Some(result)
}

/// Parses comma-separated counts, like `["0", "12", "l-0"]`.
fn item_counts(items: &[&str]) -> Option<Vec<Count>> {
    items
        .iter()
        .map(|item| match item.strip_prefix('l') {
            Some("") => Some(Count::Any(Vec::new())),
            Some(rest) => rest
                .strip_prefix('-')?
                .split('-')
                .map(|n| n.parse().ok())
                .collect::<Option<_>>()
                .map(Count::Any),
            None => item.parse().ok().map(Count::Exact),
        })
        .collect()
}

/// Every list of counts the given counts stand for, `live` counts per
/// transition, leaving out those with more than `max` neighbours.
///
/// Returns `None` if the counts do not split evenly into transitions.
fn expand(counts: &[Count], live: usize, max: usize) -> Option<Vec<Vec<usize>>> {
    if counts.len() % live != 0 {
        return None;
    }
    let mut result = Vec::new();
    for transition in counts.chunks(live) {
        let mut partial = vec![Vec::new()];
        for count in transition {
            partial = partial
                .into_iter()
                .flat_map(|prefix: Vec<usize>| {
                    let sum: usize = prefix.iter().sum();
                    let options: Vec<usize> = match count {
                        Count::Exact(n) => vec![*n],
                        Count::Any(except) => (0..=max.saturating_sub(sum))
                            .filter(|n| !except.contains(n))
                            .collect(),
                    };
                    options.into_iter().map(move |n| {
                        let mut counts = prefix.clone();
                        counts.push(n);
                        counts
                    })
                })
                .collect();
        }
        result.extend(
            partial
                .into_iter()
                .filter(|counts| counts.iter().sum::<usize>() <= max),
        );
    }
    Some(result)
}

/// A multistate cyclic HROT rule.
///
/// Weighted neighbourhoods are not supported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CyclicHrot {
    notation: String,
    neighbourhood: Neighbourhood,
    num_states: usize,
    /// From the state of a cell and the counts of the living states
    /// among its neighbours to its next state.
    transitions: HashMap<(State, Vec<usize>), State>,
    background: Vec<State>,
}

impl CyclicHrot {
    fn build(
        notation: &str,
        neighbourhood: Neighbourhood,
        num_states: usize,
        birth: Vec<Count>,
        survival: Vec<Count>,
        mutations: Vec<Vec<Count>>,
    ) -> Result<Self, Error> {
        let invalid = || Error::InvalidRule(notation.to_owned());
        if neighbourhood.weights().is_some() {
            return Err(Error::InvalidNeighbourhood(neighbourhood.to_string()));
        }
        if !(3..=MAX_STATES).contains(&num_states) {
            return Err(Error::InvalidRule(format!("{} states", num_states)));
        }
        if mutations.is_empty() || mutations.len() > num_states - 2 {
            return Err(invalid());
        }

        let mut rule = CyclicHrot {
            notation: notation.to_owned(),
            num_states,
            transitions: HashMap::new(),
            background: vec![DEAD],
            neighbourhood,
        };
        let max = rule.neighbourhood.offsets().len();
        let mut groups = vec![(DEAD, ALIVE, birth), (ALIVE, ALIVE, survival)];
        groups.extend(
            mutations
                .into_iter()
                .enumerate()
                .map(|(k, counts)| (ALIVE, State(k + 2), counts)),
        );
        for (input, output, counts) in groups {
            for counts in expand(&counts, num_states - 1, max).ok_or_else(invalid)? {
                rule.add_transition(input, counts, output);
            }
        }
        rule.background = uniform_background(&rule, 1);
        Ok(rule)
    }

    /// The state `shift` steps further along the cycle of living states.
    fn shifted(&self, state: State, shift: usize) -> State {
        match state {
            DEAD => DEAD,
            State(s) => State((s - 1 + shift) % (self.num_states - 1) + 1),
        }
    }

    /// Adds a transition together with all of its images along the cycle.
    ///
    /// Later transitions replace earlier ones with the same input.
    fn add_transition(&mut self, input: State, counts: Vec<usize>, output: State) {
        let live = counts.len();
        for shift in 0..live {
            // The count of state `k` becomes the count of state `k + shift`.
            let rotated = (0..live).map(|k| counts[(k + live - shift) % live]).collect();
            let key = (self.shifted(input, shift), rotated);
            let next = self.shifted(output, shift);
            self.transitions.insert(key, next);
        }
    }
}

impl FromStr for CyclicHrot {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidRule(input.to_owned());
        if input.starts_with('R') {
            let mut fields = split_fields(input)?;
            let neighbourhood = take_neighbourhood(input, &mut fields)?;
            let num_states = take_number(&mut fields, 'C', input)? as usize;
            let counts = |items: Option<Vec<&str>>| {
                items
                    .and_then(|items| item_counts(&items))
                    .ok_or_else(invalid)
            };
            let birth = counts(take_field(&mut fields, 'B'))?;
            let survival = counts(take_field(&mut fields, 'S'))?;
            let mut mutations = Vec::new();
            while let Some(items) = take_field(&mut fields, 'M') {
                mutations.push(counts(Some(items))?);
            }
            if !fields.is_empty() {
                return Err(invalid());
            }
            CyclicHrot::build(input, neighbourhood, num_states, birth, survival, mutations)
        } else {
            let parts: Vec<_> = input.split('/').collect();
            match parts.as_slice() {
                [birth, mutations @ .., survival, states] => {
                    let field = |part: &str, name: char| {
                        part.strip_prefix(name)
                            .and_then(digit_counts)
                            .ok_or_else(invalid)
                    };
                    let num_states = states
                        .strip_prefix('C')
                        .and_then(|n| n.parse().ok())
                        .ok_or_else(invalid)?;
                    let mutations = mutations
                        .iter()
                        .map(|part| field(*part, 'M'))
                        .collect::<Result<Vec<_>, _>>()?;
                    CyclicHrot::build(
                        input,
                        Neighbourhood::moore(1)?,
                        num_states,
                        field(*birth, 'B')?,
                        field(*survival, 'S')?,
                        mutations,
                    )
                }
                _ => Err(invalid()),
            }
        }
    }
}

/// Rule strings are kept as they are written.
impl Display for CyclicHrot {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.notation)
    }
}

impl Rule for CyclicHrot {
    fn num_states(&self) -> usize {
        self.num_states
    }

    fn neighbourhood(&self, _generation: usize) -> &[Coord] {
        self.neighbourhood.offsets()
    }

    fn transition(&self, neighbours: &[State], state: State, _generation: usize) -> State {
        let mut counts = vec![0; self.num_states - 1];
        for &State(s) in neighbours {
            if (1..self.num_states).contains(&s) {
                counts[s - 1] += 1;
            }
        }
        self.transitions
            .get(&(state, counts))
            .copied()
            .unwrap_or(DEAD)
    }

    fn background(&self) -> &[State] {
        &self.background
    }
}

impl TableExport for CyclicHrot {
    fn rule_table(&self) -> Result<RuleTable, Error> {
        if self.background != [DEAD] {
            return Err(Error::Unsupported("tables of B0 rules"));
        }
        let n = self.num_states;
        let neighbourhood = TableNeighbourhood::Custom(self.neighbourhood.offsets().to_vec());
        let mut table = RuleTable::new(&self.to_string(), n, neighbourhood, TableSymmetry::Permute);
        let all: Vec<_> = (0..n).collect();
        table.add_variables("any", &all);

        let mut transitions: Vec<_> = self.transitions.iter().collect();
        transitions.sort();
        for ((input, counts), output) in transitions {
            let mut neighbours: Vec<String> = counts
                .iter()
                .enumerate()
                .flat_map(|(k, &count)| iter::repeat((k + 1).to_string()).take(count))
                .collect();
            neighbours.resize(table.neighbour_count(), "0".to_owned());
            table.add_transition(&input.0.to_string(), &neighbours, &output.0.to_string());
        }
        for s in 1..n {
            table.add_default(&s.to_string(), "any", "0");
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLUONIC: &str = "B002021/M/M/S000011300030003120012201210021102111/C4";

    /// Neighbours with the given states, the rest dead.
    fn neighbours(states: &[usize]) -> Vec<State> {
        let mut result = vec![DEAD; 8];
        for (slot, &s) in result.iter_mut().zip(states) {
            *slot = State(s);
        }
        result
    }

    #[test]
    fn counts() {
        assert_eq!(
            digit_counts("02l-0-1"),
            Some(vec![
                Count::Exact(0),
                Count::Exact(2),
                Count::Any(vec![0, 1])
            ])
        );
        assert_eq!(digit_counts("9"), None);
        assert_eq!(digit_counts("l-"), None);
        assert_eq!(
            item_counts(&["12", "l", "l-3"]),
            Some(vec![
                Count::Exact(12),
                Count::Any(Vec::new()),
                Count::Any(vec![3])
            ])
        );
        assert_eq!(item_counts(&["lx"]), None);

        let any = [Count::Exact(2), Count::Any(vec![0])];
        let expanded = expand(&any, 2, 4).unwrap();
        assert_eq!(expanded, vec![vec![2, 1], vec![2, 2]]);
        assert_eq!(expand(&any, 3, 4), None);
    }

    #[test]
    fn gluonic() -> Result<(), Error> {
        let rule: CyclicHrot = GLUONIC.parse()?;
        assert_eq!(rule.num_states(), 4);
        assert_eq!(rule.to_string(), GLUONIC);
        assert_eq!(rule.background(), &[DEAD]);

        // Births from two neighbours in the same state, moved along the cycle.
        assert_eq!(rule.transition(&neighbours(&[3, 3]), DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&neighbours(&[1, 1]), DEAD, 0), State(2));
        assert_eq!(rule.transition(&neighbours(&[2, 2]), DEAD, 0), State(3));
        assert_eq!(rule.transition(&neighbours(&[3]), DEAD, 0), DEAD);

        assert_eq!(rule.transition(&neighbours(&[]), ALIVE, 0), ALIVE);
        assert_eq!(rule.transition(&neighbours(&[]), State(3), 0), State(3));
        assert_eq!(rule.transition(&neighbours(&[2, 3]), ALIVE, 0), ALIVE);
        assert_eq!(rule.transition(&neighbours(&[3, 1]), State(2), 0), State(2));
        assert_eq!(rule.transition(&neighbours(&[1]), ALIVE, 0), DEAD);
        Ok(())
    }

    #[test]
    fn hrot_notation() -> Result<(), Error> {
        let rule: CyclicHrot = "R1,C4,B0,0,2,0,2,1,M,M,S0,0,0,NM".parse()?;
        assert_eq!(rule.transition(&neighbours(&[3, 3]), DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&neighbours(&[]), State(2), 0), State(2));

        let rule: CyclicHrot = "R1,C3,B2,l-0,M,S,NM".parse()?;
        assert_eq!(rule.transition(&neighbours(&[1, 1, 2]), DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&neighbours(&[1, 1, 2, 2, 2]), DEAD, 0), ALIVE);
        assert_eq!(rule.transition(&neighbours(&[1, 1]), DEAD, 0), DEAD);
        assert_eq!(rule.transition(&neighbours(&[2, 2, 1]), DEAD, 0), State(2));

        let rule: CyclicHrot = "R2,C3,B1,l,M,S,NN".parse()?;
        assert_eq!(rule.neighbourhood(0).len(), 12);
        Ok(())
    }

    #[test]
    fn mutations() -> Result<(), Error> {
        let rule: CyclicHrot = "B/M10/S/C3".parse()?;
        assert_eq!(rule.transition(&neighbours(&[1]), ALIVE, 0), State(2));
        assert_eq!(rule.transition(&neighbours(&[2]), State(2), 0), ALIVE);
        assert_eq!(rule.transition(&neighbours(&[1]), DEAD, 0), DEAD);
        Ok(())
    }

    #[test]
    fn invalid() {
        for invalid in [
            "B00/M/S/C4",
            "B/S/C4",
            "B/M/M/S/C3",
            "B/M/S/C2",
            "B9/M/S/C2",
            "R1,C3,B0,0,S,NM",
            "R1,C3,B0,0,M,S,NW111101111",
            "R1,C3,B0,x,M,S,NM",
        ]
        .iter()
        {
            assert!(invalid.parse::<CyclicHrot>().is_err(), "{}", invalid);
        }
    }

    #[test]
    fn rule_table() -> Result<(), Error> {
        let rule: CyclicHrot = GLUONIC.parse()?;
        let table = rule.rule_table()?;
        let lines = table.transitions();
        assert!(lines.contains(&"0,3,3,0,0,0,0,0,0,1".to_owned()));
        assert!(lines.contains(&"0,1,1,0,0,0,0,0,0,2".to_owned()));
        assert!(lines.contains(&"2,1,3,0,0,0,0,0,0,2".to_owned()));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("3,any0,any1,any2,any3,any4,any5,any6,any7,0")
        );
        assert!(table.to_string().contains("symmetries:permute\n"));
        Ok(())
    }
}
