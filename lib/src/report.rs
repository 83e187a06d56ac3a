//! A plain summary of an identified pattern.

use crate::{coord::Coord, identify::Pattern, rules::Rule};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A summary of an identified pattern, with rules written as rule strings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Report {
    /// The name of the pattern, like `P2 Oscillator`.
    pub name: String,
    /// The period, if any.
    pub period: Option<usize>,
    /// The displacement per period.
    pub displacement: Coord,
    /// The rule.
    pub rule: String,
    /// The minimum rule, if known.
    pub min_rule: Option<String>,
    /// The maximum rule, if known.
    pub max_rule: Option<String>,
    /// The pattern, as the body of an RLE.
    pub rle: String,
}

impl<R: Rule> From<&Pattern<R>> for Report {
    fn from(pattern: &Pattern<R>) -> Self {
        let rle = pattern.grid().to_string();
        let rle = if pattern.rule().num_states() == 2 {
            rle.replace('A', "o").replace('.', "b")
        } else {
            rle
        };
        Report {
            name: pattern.name(),
            period: pattern.kind().period(),
            displacement: pattern.kind().displacement(),
            rule: pattern.rule().to_string(),
            min_rule: pattern.min_max().map(|(min, _)| min.to_string()),
            max_rule: pattern.min_max().map(|(_, max)| max.to_string()),
            rle,
        }
    }
}
