//! All kinds of errors in this crate.

use ca_rules::ParseRuleError;
use displaydoc::Display;
use thiserror::Error;

/// All kinds of errors in this crate.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum Error {
    /// Invalid rule: {0:?}.
    InvalidRule(String),
    /// Invalid rule: {0:?}.
    ParseRuleError(#[from] ParseRuleError),
    /// Invalid neighbourhood: {0:?}.
    InvalidNeighbourhood(String),
    /// Invalid RLE: {0:?}.
    InvalidRle(String),
    /// Invalid apgcode: {0:?}.
    InvalidApgcode(String),
    /// Alternating rules must have the same number of states.
    StateCountMismatch,
    /// The minimum and maximum rules are incompatible.
    IncompatibleMinMax,
    /// This rule space does not support {0}.
    Unsupported(&'static str),
    /// Density should be at most 100, got {0}.
    InvalidDensity(u32),
    /// Width / height / period should be positive.
    NonPositiveError,
    /// Symmetry requires the soup to be square.
    SquareSoupError,
}
