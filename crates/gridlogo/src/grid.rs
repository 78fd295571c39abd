use std::fmt::{self, Write as _};

use crate::ErrorKind;

const VISITED: char = 'X';
const UNVISITED: char = '.';

/// Something a [`Cursor`](crate::Cursor) can walk over and mark.
pub trait Canvas {
    /// Length of a side; the canvas is always square.
    fn size(&self) -> usize;
    fn visit(&mut self, x: i64, y: i64) -> Result<(), ExecError>;
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ExecError {
    #[error("{size} is not a valid grid size")]
    InvalidSize { size: i64 },
    #[error("({x}, {y}) is off the edge of the {size}x{size} grid")]
    OutOfBounds { x: i64, y: i64, size: usize },
    #[error("can't move along heading {heading}, only multiples of 45 degrees work")]
    UnsupportedHeading { heading: i64 },
}

impl ExecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecError::InvalidSize { .. } => ErrorKind::InvalidSize,
            ExecError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            ExecError::UnsupportedHeading { .. } => ErrorKind::UnsupportedHeading,
        }
    }
}

/// A square of cells, each of which is either visited or not.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    size: usize,
    // Row-major, `size * size` long.
    cells: Vec<bool>,
}

impl Grid {
    pub fn new(size: i64) -> Result<Grid, ExecError> {
        let invalid = ExecError::InvalidSize { size };
        let side = usize::try_from(size).map_err(|_| invalid.clone())?;
        if side == 0 {
            return Err(invalid);
        }
        let len = side.checked_mul(side).ok_or_else(|| invalid.clone())?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| invalid)?;
        cells.resize(len, false);
        Ok(Grid { size: side, cells })
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.size)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.size)?;
        Some(y * self.size + x)
    }

    pub fn is_visited(&self, x: i64, y: i64) -> bool {
        self.index(x, y).map_or(false, |i| self.cells[i])
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// The grid as text: one line per row, cells separated by single spaces.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Canvas for Grid {
    fn size(&self) -> usize {
        self.size
    }

    fn visit(&mut self, x: i64, y: i64) -> Result<(), ExecError> {
        let i = self.index(x, y).ok_or(ExecError::OutOfBounds {
            x,
            y,
            size: self.size,
        })?;
        self.cells[i] = true;
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for (i, &cell) in row.iter().enumerate() {
                if i > 0 {
                    f.write_char(' ')?;
                }
                f.write_char(if cell { VISITED } else { UNVISITED })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
