use nom::{
    bytes::complete::{take_till1, take_while},
    combinator::map,
    multi::many0,
    sequence::{preceded, terminated},
    IResult,
};

use crate::ErrorKind;

pub type Input<'a> = nom_locate::LocatedSpan<&'a str>;

/// Where a token sits in the script.
///
/// `start` and `end` are byte offsets; `line` and `column` are 1-based and
/// are what gets shown to people.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Span,
}

impl Token<'_> {
    /// Reads this token as a whole number.
    pub fn int(&self) -> Option<i64> {
        self.text.parse().ok()
    }
}

fn blank(input: Input) -> IResult<Input, Input> {
    take_while(|c: char| c.is_whitespace())(input)
}

// The column is left at zero; `TokenStream::new` fills it in.
fn word<'a>(input: Input<'a>) -> IResult<Input<'a>, Token<'a>> {
    map(take_till1(|c: char| c.is_whitespace()), |s: Input<'a>| Token {
        text: *s.fragment(),
        span: Span {
            start: s.location_offset(),
            end: s.location_offset() + s.fragment().len(),
            line: s.location_line(),
            column: 0,
        },
    })(input)
}

fn tokens<'a>(input: Input<'a>) -> IResult<Input<'a>, Vec<Token<'a>>> {
    terminated(many0(preceded(blank, word)), blank)(input)
}

// nom_locate finds a column by rescanning the line up to it, which is
// quadratic over a long line of tokens. This counts them in one pass.
fn fill_columns(script: &str, tokens: &mut [Token<'_>]) {
    let (mut offset, mut column) = (0, 1);
    for tok in tokens {
        let gap = &script[offset..tok.span.start];
        column = match gap.rfind('\n') {
            Some(nl) => gap[nl + 1..].chars().count() + 1,
            None => column + gap.chars().count(),
        };
        tok.span.column = column;
        offset = tok.span.start;
    }
}

/// Blocks nested deeper than this are rejected with
/// [`ParseError::NestedTooDeep`].
pub const MAX_BLOCK_DEPTH: usize = 128;

/// The words of a script, consumed front to back by the command parsers.
#[derive(Clone, Debug)]
pub struct TokenStream<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    // How many blocks the parsers are currently inside.
    depth: usize,
}

impl<'a> TokenStream<'a> {
    /// Splits a whole script into its whitespace-separated words.
    pub fn new(script: &'a str) -> TokenStream<'a> {
        let Ok((_, mut tokens)) = tokens(Input::new(script)) else {
            unreachable!("every script splits into words");
        };
        fill_columns(script, &mut tokens);
        TokenStream {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    pub fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    pub fn pop(&mut self) -> Option<Token<'a>> {
        let tok = self.tokens.get(self.pos).copied()?;
        self.pos += 1;
        Some(tok)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// The number of tokens not consumed yet.
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.pos)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parses the body of the block opened by `keyword` with `f`.
    ///
    /// Parsers for commands that take blocks go through here, so that a
    /// script can't nest blocks deep enough to run the parser (or the
    /// program it builds) out of stack.
    pub fn block<T>(
        &mut self,
        keyword: &Token<'a>,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_BLOCK_DEPTH {
            return Err(ParseError::NestedTooDeep {
                command: keyword.text.to_owned(),
                span: keyword.span,
            });
        }
        self.depth += 1;
        let ret = f(self);
        self.depth -= 1;
        ret
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("the script doesn't start with a grid size")]
    MissingSize,
    #[error("{found} is not a valid grid size")]
    InvalidSize { found: String, span: Span },
    #[error("{command} doesn't like {found} as input")]
    MalformedArgument {
        command: String,
        found: String,
        span: Span,
    },
    #[error("not enough inputs to {command}")]
    MissingArgument { command: String, span: Span },
    #[error("I don't know how to {found}")]
    UnknownCommand { found: String, span: Span },
    #[error("{command} wants a [ block, found {}", .found.as_deref().unwrap_or("the end of the script"))]
    MissingBlock {
        command: String,
        found: Option<String>,
        span: Span,
    },
    #[error("{command} block is never closed with ]")]
    UnterminatedBlock { command: String, span: Span },
    #[error("{command} blocks are nested more than {} deep", MAX_BLOCK_DEPTH)]
    NestedTooDeep { command: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::MissingSize => None,
            ParseError::InvalidSize { span, .. }
            | ParseError::MalformedArgument { span, .. }
            | ParseError::MissingArgument { span, .. }
            | ParseError::UnknownCommand { span, .. }
            | ParseError::MissingBlock { span, .. }
            | ParseError::UnterminatedBlock { span, .. }
            | ParseError::NestedTooDeep { span, .. } => Some(*span),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::MissingSize | ParseError::InvalidSize { .. } => ErrorKind::InvalidSize,
            ParseError::MalformedArgument { .. } => ErrorKind::MalformedArgument,
            ParseError::MissingArgument { .. } => ErrorKind::MissingArgument,
            ParseError::UnknownCommand { .. } => ErrorKind::UnknownCommand,
            ParseError::MissingBlock { .. } => ErrorKind::MissingBlock,
            ParseError::UnterminatedBlock { .. } => ErrorKind::UnterminatedBlock,
            ParseError::NestedTooDeep { .. } => ErrorKind::NestedTooDeep,
        }
    }
}
