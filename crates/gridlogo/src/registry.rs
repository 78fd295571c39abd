use std::{collections::HashMap, sync::OnceLock};

use crate::{Command, ParseError, StepKind, Token, TokenStream};

pub const OPEN_BLOCK: &str = "[";
pub const CLOSE_BLOCK: &str = "]";

/// Builds a command from the tokens that follow its keyword.
///
/// A parser consumes exactly the tokens that belong to its command and leaves
/// the rest of the stream alone.
pub trait CommandParser: Send + Sync {
    fn parse<'a>(
        &self,
        keyword: Token<'a>,
        tokens: &mut TokenStream<'a>,
        registry: &Registry,
    ) -> Result<Command, ParseError>;
}

impl<F> CommandParser for F
where
    F: for<'a> Fn(Token<'a>, &mut TokenStream<'a>, &Registry) -> Result<Command, ParseError>
        + Send
        + Sync,
{
    fn parse<'a>(
        &self,
        keyword: Token<'a>,
        tokens: &mut TokenStream<'a>,
        registry: &Registry,
    ) -> Result<Command, ParseError> {
        self(keyword, tokens, registry)
    }
}

/// Parses any of the one-input moves.
#[derive(Copy, Clone, Debug)]
pub struct StepParser(pub StepKind);

impl CommandParser for StepParser {
    fn parse<'a>(
        &self,
        keyword: Token<'a>,
        tokens: &mut TokenStream<'a>,
        _registry: &Registry,
    ) -> Result<Command, ParseError> {
        Ok(Command::Step {
            kind: self.0,
            amount: int_input(&keyword, tokens)?,
            span: keyword.span,
        })
    }
}

fn int_input<'a>(keyword: &Token<'a>, tokens: &mut TokenStream<'a>) -> Result<i64, ParseError> {
    let arg = tokens.pop().ok_or_else(|| ParseError::MissingArgument {
        command: keyword.text.to_owned(),
        span: keyword.span,
    })?;
    arg.int().ok_or_else(|| ParseError::MalformedArgument {
        command: keyword.text.to_owned(),
        found: arg.text.to_owned(),
        span: arg.span,
    })
}

/// `REPEAT <count> [ <commands> ]`
pub fn parse_repeat<'a>(
    keyword: Token<'a>,
    tokens: &mut TokenStream<'a>,
    registry: &Registry,
) -> Result<Command, ParseError> {
    let count = int_input(&keyword, tokens)?;
    match tokens.pop() {
        Some(open) if open.text == OPEN_BLOCK => {}
        other => {
            return Err(ParseError::MissingBlock {
                command: keyword.text.to_owned(),
                found: other.map(|t| t.text.to_owned()),
                span: other.map_or(keyword.span, |t| t.span),
            })
        }
    }

    let body = tokens.block(&keyword, |tokens| {
        let mut body = Vec::new();
        loop {
            let next = tokens.pop().ok_or_else(|| ParseError::UnterminatedBlock {
                command: keyword.text.to_owned(),
                span: keyword.span,
            })?;
            if next.text == CLOSE_BLOCK {
                return Ok(body);
            }
            body.push(registry.parse_command(next, tokens)?);
        }
    })?;
    Ok(Command::Repeat {
        count,
        body,
        span: keyword.span,
    })
}

/// Maps keywords to the parsers for their commands. Keywords are case-sensitive.
pub struct Registry {
    parsers: HashMap<String, Box<dyn CommandParser>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keywords: Vec<_> = self.parsers.keys().collect();
        keywords.sort();
        f.debug_struct("Registry")
            .field("keywords", &keywords)
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut ret = Registry::new();
        add_builtins(&mut ret);
        ret
    }
}

impl Registry {
    /// A registry that knows no commands at all.
    pub fn new() -> Self {
        Registry {
            parsers: HashMap::new(),
        }
    }

    /// The built-in commands, shared by everyone.
    pub fn standard() -> &'static Registry {
        static INSTANCE: OnceLock<Registry> = OnceLock::new();
        INSTANCE.get_or_init(Registry::default)
    }

    pub fn register(&mut self, keyword: impl Into<String>, parser: impl CommandParser + 'static) {
        self.parsers.insert(keyword.into(), Box::new(parser));
    }

    pub fn get(&self, keyword: &str) -> Option<&dyn CommandParser> {
        self.parsers.get(keyword).map(|p| &**p)
    }

    /// Parses the command introduced by `keyword`, consuming its inputs from `tokens`.
    pub fn parse_command<'a>(
        &self,
        keyword: Token<'a>,
        tokens: &mut TokenStream<'a>,
    ) -> Result<Command, ParseError> {
        let parser = self
            .get(keyword.text)
            .ok_or_else(|| ParseError::UnknownCommand {
                found: keyword.text.to_owned(),
                span: keyword.span,
            })?;
        log::trace!("parsing {} at {}", keyword.text, keyword.span);
        parser.parse(keyword, tokens, self)
    }
}

pub fn add_builtins(registry: &mut Registry) {
    registry.register("FD", StepParser(StepKind::Forward));
    registry.register("FORWARD", StepParser(StepKind::Forward));
    registry.register("BK", StepParser(StepKind::Back));
    registry.register("BACK", StepParser(StepKind::Back));
    registry.register("LT", StepParser(StepKind::Left));
    registry.register("LEFT", StepParser(StepKind::Left));
    registry.register("RT", StepParser(StepKind::Right));
    registry.register("RIGHT", StepParser(StepKind::Right));

    registry.register("REPEAT", parse_repeat);
}
