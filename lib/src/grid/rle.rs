//! Text codecs for grids: the body of an RLE, and apgcodes.

use super::Grid;
use crate::{
    cells::{State, DEAD, MAX_STATES},
    coord::Coord,
    error::Error,
};
use ca_formats::{rle::Rle, CellData};
use std::{
    convert::TryFrom,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

const APGCODE_DIGITS: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// One item of an RLE body before run-length compression.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Token {
    Dead,
    Cell(State),
    EndOfRow,
}

impl Display for Token {
    /// `A`..`X` are the states `1`..`24`; higher states get a prefix
    /// `p`..`y` for each further block of 24. States above
    /// `MAX_STATES - 1` are written as `?`, which no decoder accepts.
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Token::Dead => f.write_str("."),
            Token::EndOfRow => f.write_str("$"),
            Token::Cell(State(s)) if s >= MAX_STATES => f.write_str("?"),
            Token::Cell(State(s)) => {
                let (block, letter) = ((s - 1) / 24, (s - 1) % 24);
                if block > 0 {
                    write!(f, "{}", (b'o' + block as u8) as char)?;
                }
                write!(f, "{}", (b'A' + letter as u8) as char)
            }
        }
    }
}

impl Grid {
    /// Encodes the rectangle from `start` to `end`, inclusive, as the body of an RLE.
    ///
    /// Dead cells are `.`, living cells are letters, and rows end with `$`.
    /// Dead cells and row breaks after the last living cell are dropped,
    /// and runs are written as `<count><item>`.
    pub fn to_rle(&self, start: Coord, end: Coord) -> String {
        let mut tokens = Vec::new();
        let mut pending = Vec::new();
        for y in start.y..=end.y {
            for x in start.x..=end.x {
                let state = self.get_cell(Coord::new(x, y));
                if state == DEAD {
                    pending.push(Token::Dead);
                } else {
                    tokens.append(&mut pending);
                    tokens.push(Token::Cell(state));
                }
            }
            pending.push(Token::EndOfRow);
        }

        let mut rle = String::new();
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            let run = tokens[i..].iter().take_while(|&&t| t == token).count();
            if run > 1 {
                rle.push_str(&run.to_string());
            }
            rle.push_str(&token.to_string());
            i += run;
        }
        rle.push('!');
        rle
    }

    /// Decodes the body of an RLE, placing its top-left corner at `start`.
    ///
    /// `b` and `.` are dead cells, `o` is state `1`, and multi-state
    /// letters follow [`Grid::to_rle`]. Dead cells leave the grid as it is.
    pub fn from_rle(&mut self, rle: &str, start: Coord) -> Result<(), Error> {
        let invalid = || Error::InvalidRle(rle.to_owned());
        if rle.trim().is_empty() {
            return Ok(());
        }
        let cells = Rle::new(rle).map_err(|_| invalid())?;
        for cell in cells {
            let CellData {
                position: (x, y),
                state,
            } = cell.map_err(|_| invalid())?;
            if state == 0 {
                continue;
            }
            let offset = i32::try_from(x)
                .ok()
                .zip(i32::try_from(y).ok())
                .and_then(|(x, y)| start.checked_add(Coord::new(x, y)))
                .ok_or_else(invalid)?;
            self.set_cell(offset, State(state as usize));
        }
        Ok(())
    }

    /// Decodes an apgcode such as `xs4_33`, placing its top-left corner at `start`.
    ///
    /// The prefix before the first `_` is ignored. Every further `_`
    /// starts the next state plane, so multi-state apgcodes are supported.
    pub fn from_apgcode(&mut self, apgcode: &str, start: Coord) -> Result<(), Error> {
        let invalid = || Error::InvalidApgcode(apgcode.to_owned());
        let body = apgcode.splitn(2, '_').nth(1).ok_or_else(invalid)?;
        let digit = |c: char| APGCODE_DIGITS.find(c).map(|i| i as i32);
        let mut chars = body.chars();
        let (mut x, mut y, mut plane) = (0, 0, 1);
        while let Some(c) = chars.next() {
            match c {
                'w' => x += 2,
                'x' => x += 3,
                'y' => {
                    let n = chars.next().and_then(digit).ok_or_else(invalid)?;
                    x += 4 + n;
                }
                'z' => {
                    x = 0;
                    y += 5;
                }
                '_' => {
                    x = 0;
                    y = 0;
                    plane += 1;
                }
                _ => {
                    let bits = digit(c).ok_or_else(invalid)?;
                    for j in 0..5 {
                        if bits & (1 << j) != 0 {
                            self.set_cell(start + Coord::new(x, y + j), State(plane));
                        }
                    }
                    x += 1;
                }
            }
        }
        Ok(())
    }
}

/// Parses the body of an RLE into a new grid anchored at the origin.
impl FromStr for Grid {
    type Err = Error;

    fn from_str(rle: &str) -> Result<Self, Self::Err> {
        let mut grid = Grid::new();
        grid.from_rle(rle, Coord::ORIGIN)?;
        Ok(grid)
    }
}

/// Displays the bounding box of the grid as the body of an RLE.
impl Display for Grid {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let (start, end) = self.compute_bounds();
        f.write_str(&self.to_rle(start, end))
    }
}
