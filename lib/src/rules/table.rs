//! Transition tables in the `@TABLE` format read by Golly and apgsearch.

use super::{neighbourhood::Neighbourhood, sums::Sums};
use crate::{coord::Coord, error::Error};
use std::fmt::{self, Display, Formatter};

/// Weighted neighbourhoods are expanded into one line per configuration;
/// larger ones are refused.
const MAX_EXPANDED_NEIGHBOURS: usize = 16;

/// The symmetry line of a transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableSymmetry {
    /// `none`.
    None,
    /// `permute`: only the multiset of neighbour states matters.
    Permute,
    /// `rotate4reflect`.
    Rotate4Reflect,
}

impl Display for TableSymmetry {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            TableSymmetry::None => "none",
            TableSymmetry::Permute => "permute",
            TableSymmetry::Rotate4Reflect => "rotate4reflect",
        })
    }
}

/// The neighbourhood line of a transition table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TableNeighbourhood {
    /// `Moore`, in the order N, NE, E, SE, S, SW, W, NW.
    Moore,
    /// An explicit list of offsets.
    Custom(Vec<Coord>),
}

/// A transition table.
///
/// Transitions are tried in order; a cell matching none of them keeps its state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    name: String,
    num_states: usize,
    neighbourhood: TableNeighbourhood,
    symmetry: TableSymmetry,
    variables: Vec<(String, Vec<usize>)>,
    transitions: Vec<String>,
}

impl RuleTable {
    /// An empty table.
    pub fn new(
        name: &str,
        num_states: usize,
        neighbourhood: TableNeighbourhood,
        symmetry: TableSymmetry,
    ) -> Self {
        RuleTable {
            name: table_name(name),
            num_states,
            neighbourhood,
            symmetry,
            variables: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// The number of neighbours.
    pub fn neighbour_count(&self) -> usize {
        match &self.neighbourhood {
            TableNeighbourhood::Moore => 8,
            TableNeighbourhood::Custom(offsets) => offsets.len(),
        }
    }

    /// The transition lines.
    pub fn transitions(&self) -> &[String] {
        &self.transitions
    }

    /// Declares one variable per neighbour, named `{prefix}{index}`,
    /// all ranging over `states`.
    ///
    /// Variables are bound within a line, so every slot needs its own.
    pub fn add_variables(&mut self, prefix: &str, states: &[usize]) {
        for k in 0..self.neighbour_count() {
            self.variables.push((format!("{}{}", prefix, k), states.to_vec()));
        }
    }

    /// Adds a transition line.
    pub fn add_transition<S: AsRef<str>>(&mut self, input: &str, neighbours: &[S], output: &str) {
        let mut line = input.to_owned();
        for neighbour in neighbours {
            line.push(',');
            line.push_str(neighbour.as_ref());
        }
        line.push(',');
        line.push_str(output);
        self.transitions.push(line);
    }

    /// Adds a transition that matches any neighbourhood, using the
    /// variables declared with `prefix`.
    pub fn add_default(&mut self, input: &str, prefix: &str, output: &str) {
        let neighbours: Vec<_> = (0..self.neighbour_count())
            .map(|k| format!("{}{}", prefix, k))
            .collect();
        self.add_transition(input, &neighbours, output);
    }

    /// Adds one transition for every neighbourhood sum in `sums`.
    ///
    /// Neighbours in state `on` count towards the sum; the neighbour in slot
    /// `k` of the others must match `off(k)`. For weighted neighbourhoods
    /// every configuration with a matching sum is listed.
    pub(crate) fn add_sums<F: Fn(usize) -> String>(
        &mut self,
        neighbourhood: &Neighbourhood,
        sums: &Sums,
        input: &str,
        on: &str,
        off: F,
        output: &str,
    ) -> Result<(), Error> {
        let n = neighbourhood.offsets().len();
        match neighbourhood.weights() {
            None => {
                for &sum in sums.iter().filter(|&&s| s >= 0 && s as usize <= n) {
                    let neighbours: Vec<_> = (0..n)
                        .map(|k| if k < sum as usize { on.to_owned() } else { off(k) })
                        .collect();
                    self.add_transition(input, &neighbours, output);
                }
            }
            Some(_) if n > MAX_EXPANDED_NEIGHBOURS => {
                return Err(Error::Unsupported("tables of large weighted neighbourhoods"));
            }
            Some(weights) => {
                for mask in 0..1_usize << n {
                    let sum: i32 = (0..n)
                        .filter(|k| mask >> k & 1 == 1)
                        .map(|k| weights[k])
                        .sum();
                    if sums.contains(&sum) {
                        let neighbours: Vec<_> = (0..n)
                            .map(|k| if mask >> k & 1 == 1 { on.to_owned() } else { off(k) })
                            .collect();
                        self.add_transition(input, &neighbours, output);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Rule names in tables may not contain most punctuation.
fn table_name(rule: &str) -> String {
    rule.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}

impl Display for RuleTable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "@RULE {}", self.name)?;
        writeln!(f, "@TABLE")?;
        writeln!(f, "n_states:{}", self.num_states)?;
        match &self.neighbourhood {
            TableNeighbourhood::Moore => writeln!(f, "neighborhood:Moore")?,
            TableNeighbourhood::Custom(offsets) => {
                write!(f, "neighborhood:[(0, 0)")?;
                for offset in offsets {
                    write!(f, ", {}", offset)?;
                }
                writeln!(f, ", (0, 0)]")?;
            }
        }
        writeln!(f, "symmetries:{}", self.symmetry)?;
        for (name, states) in &self.variables {
            let states: Vec<_> = states.iter().map(usize::to_string).collect();
            writeln!(f, "var {}={{{}}}", name, states.join(","))?;
        }
        for line in &self.transitions {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
