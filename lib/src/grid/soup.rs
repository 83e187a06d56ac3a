//! Random soups.

use super::{Grid, Symmetry};
use crate::{cells::State, coord::Coord, error::Error};
use rand::{seq::SliceRandom, Rng};

impl Grid {
    /// Generates a random `width × height` soup with its top-left corner at the origin.
    ///
    /// Each orbit of cells under the `symmetry` group is filled with probability
    /// `density` percent, with a state chosen uniformly from `states`.
    pub fn soup<R: Rng + ?Sized>(
        width: i32,
        height: i32,
        density: u32,
        states: &[State],
        symmetry: Symmetry,
        rng: &mut R,
    ) -> Result<Grid, Error> {
        if width <= 0 || height <= 0 || states.is_empty() {
            return Err(Error::NonPositiveError);
        }
        if density > 100 {
            return Err(Error::InvalidDensity(density));
        }
        if symmetry.square_world() && width != height {
            return Err(Error::SquareSoupError);
        }

        let members = symmetry.members();
        let mut grid = Grid::new();
        for x in 0..width {
            for y in 0..height {
                let coord = Coord::new(x, y);
                let orbit: Vec<Coord> = members
                    .iter()
                    .map(|t| t.act_on(coord, width, height))
                    .collect();
                // Each orbit is decided once, by its smallest member.
                if orbit.iter().any(|&c| c < coord) {
                    continue;
                }
                if rng.gen_range(0..100) < density {
                    if let Some(&state) = states.choose(rng) {
                        for c in orbit {
                            grid.set_cell(c, state);
                        }
                    }
                }
            }
        }
        Ok(grid)
    }
}
