//! An interpreter for a tiny LOGO dialect that draws onto a square grid of
//! text cells.
//!
//! A script starts with the side length of the grid, followed by commands:
//!
//! ```text
//! 11
//! RT 90
//! FD 5
//! REPEAT 2 [ LT 45 BK 1 ]
//! ```
//!
//! The turtle starts in the middle of the grid facing up. Every cell it walks
//! through is marked with an `X` in the output.

pub mod command;
pub mod cursor;
pub mod grid;
pub mod parse;
pub mod registry;

pub use command::{Command, StepKind};
pub use cursor::Cursor;
pub use grid::{Canvas, ExecError, Grid};
pub use parse::{ParseError, Span, Token, TokenStream, MAX_BLOCK_DEPTH};
pub use registry::{CommandParser, Registry};

/// The different ways interpreting a script can fail, independent of where.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    InvalidSize,
    MalformedArgument,
    MissingArgument,
    UnknownCommand,
    MissingBlock,
    UnterminatedBlock,
    NestedTooDeep,
    UnsupportedHeading,
    OutOfBounds,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{source}")]
    Exec {
        source: ExecError,
        // The command that was running, if any.
        span: Option<Span>,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(e) => e.kind(),
            Error::Exec { source, .. } => source.kind(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Parse(e) => e.span(),
            Error::Exec { span, .. } => *span,
        }
    }
}

/// A parsed script: the grid size plus the top-level commands, in order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Program {
    pub size: i64,
    pub commands: Vec<Command>,
}

impl Program {
    pub fn parse(script: &str, registry: &Registry) -> Result<Program, ParseError> {
        let mut tokens = TokenStream::new(script);
        let size_token = tokens.pop().ok_or(ParseError::MissingSize)?;
        let size = size_token
            .int()
            .filter(|&size| size >= 1)
            .ok_or_else(|| ParseError::InvalidSize {
                found: size_token.text.to_owned(),
                span: size_token.span,
            })?;

        let mut commands = Vec::new();
        while let Some(keyword) = tokens.pop() {
            commands.push(registry.parse_command(keyword, &mut tokens)?);
        }
        log::debug!(
            "parsed {} commands for a {size}x{size} grid",
            commands.len()
        );
        Ok(Program { size, commands })
    }

    /// Runs the program on a fresh grid.
    pub fn run(&self) -> Result<Grid, Error> {
        let exec = |source| Error::Exec { source, span: None };
        let mut grid = Grid::new(self.size).map_err(exec)?;
        let mut cursor = Cursor::new(&mut grid).map_err(exec)?;
        for cmd in &self.commands {
            cmd.run(&mut cursor)?;
        }
        log::debug!(
            "finished at {:?} facing {}",
            cursor.position(),
            cursor.heading()
        );
        Ok(grid)
    }
}

/// Interprets `script` with the built-in commands and renders the resulting grid.
pub fn interpret(script: &str) -> Result<String, Error> {
    let program = Program::parse(script, Registry::standard())?;
    Ok(program.run()?.render())
}
