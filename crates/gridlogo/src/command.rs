use crate::{Canvas, Cursor, Error, ExecError, Span};

/// The four primitive moves. They all take a single whole-number input.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StepKind {
    Forward,
    Back,
    Left,
    Right,
}

impl StepKind {
    pub fn apply<C: Canvas + ?Sized>(
        self,
        cursor: &mut Cursor<'_, C>,
        amount: i64,
    ) -> Result<(), ExecError> {
        match self {
            StepKind::Forward => cursor.forward(amount),
            StepKind::Back => cursor.backward(amount),
            StepKind::Left => {
                cursor.turn_left(amount);
                Ok(())
            }
            StepKind::Right => {
                cursor.turn_right(amount);
                Ok(())
            }
        }
    }
}

/// A parsed instruction.
///
/// The span is the location of the keyword that introduced the command; it's
/// attached to any error the command hits while running.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Step {
        kind: StepKind,
        amount: i64,
        span: Span,
    },
    /// Runs `body` `count` times. A count below one runs nothing.
    Repeat {
        count: i64,
        body: Vec<Command>,
        span: Span,
    },
}

impl Command {
    pub fn span(&self) -> Span {
        match self {
            Command::Step { span, .. } | Command::Repeat { span, .. } => *span,
        }
    }

    pub fn run<C: Canvas + ?Sized>(&self, cursor: &mut Cursor<'_, C>) -> Result<(), Error> {
        match self {
            Command::Step { kind, amount, span } => {
                kind.apply(cursor, *amount).map_err(|source| Error::Exec {
                    source,
                    span: Some(*span),
                })
            }
            Command::Repeat { count, body, .. } => {
                for _ in 0..*count {
                    for cmd in body {
                        cmd.run(cursor)?;
                    }
                }
                Ok(())
            }
        }
    }
}
