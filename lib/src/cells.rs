//! Cell states.

use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The state of a cell.
///
/// `0` is the background. For rules with more than two states,
/// `1` is the fully alive state and larger values are rule-specific
/// (dying, deficient, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct State(pub usize);

/// The Dead state.
pub const DEAD: State = State(0);
/// The Alive state.
pub const ALIVE: State = State(1);

/// The largest number of states a rule can have, so that every state
/// fits in an RLE.
pub const MAX_STATES: usize = 256;

impl State {
    /// Whether the cell is not in the background state.
    #[inline]
    pub const fn is_alive(self) -> bool {
        self.0 != 0
    }
}

impl From<usize> for State {
    #[inline]
    fn from(state: usize) -> Self {
        State(state)
    }
}
