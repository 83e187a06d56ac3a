//! A cellular automata simulator and pattern identifier.
//!
//! ```
//! use rcasim_lib::{Config, PatternKind};
//!
//! let config = Config::new("B3/S23", "bob$2bo$3o!").set_max_period(10);
//! let pattern = config.identify().unwrap().unwrap();
//! assert_eq!(
//!     *pattern.kind(),
//!     PatternKind::Spaceship { period: 4, dx: 1, dy: 1 }
//! );
//! ```

mod cells;
mod config;
mod coord;
mod error;
pub mod grid;
mod identify;
mod report;
pub mod rules;
mod search;
mod simulator;

pub use cells::{State, ALIVE, DEAD, MAX_STATES};
pub use config::{Config, SoupConfig};
pub use coord::Coord;
pub use error::Error;
pub use grid::{Grid, Symmetry, Transform};
pub use identify::{Pattern, PatternKind};
pub use report::Report;
pub use search::RuleSearch;
pub use simulator::Simulator;
