//! # Core Parser Definitions
//!
//! The parser interface and error type shared by every combinator.

use thiserror::Error;

/// Parser trait defines the core parsing interface.
///
/// A parser reads `input` starting at `pos` and returns the position after
/// what it consumed together with its output. The position is the read
/// cursor: it only moves forward, and looking past the end of `input` yields
/// `None` rather than panicking.
///
/// # Type Parameters
///
/// * `I` - The input token type
/// * `O` - The output value type
pub trait Parser<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O>;
}

/// `Ok((new_pos, output))` on success.
pub type ParseResult<O> = Result<(usize, O), ParseError>;

/// Error type for parsing operations.
///
/// `position` is the index of the offending token (or the stream length for
/// [`ParseError::UnexpectedEnd`]). `context` is the trail of grammar rules
/// the error travelled through, innermost first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Unexpected token: expected {expected}, found {found} at position {position}, context: {context:?}"
    )]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
        context: Option<String>,
    },
    #[error("Unexpected end of input: expected {expected} at position {position}, context: {context:?}")]
    UnexpectedEnd {
        expected: String,
        position: usize,
        context: Option<String>,
    },
}

impl ParseError {
    pub fn with_context(self, ctx: &str) -> Self {
        let extend = |context: Option<String>| match context {
            Some(c) => Some(format!("{} -> {}", c, ctx)),
            None => Some(ctx.to_string()),
        };
        match self {
            ParseError::UnexpectedToken {
                expected,
                found,
                position,
                context,
            } => ParseError::UnexpectedToken {
                expected,
                found,
                position,
                context: extend(context),
            },
            ParseError::UnexpectedEnd {
                expected,
                position,
                context,
            } => ParseError::UnexpectedEnd {
                expected,
                position,
                context: extend(context),
            },
        }
    }

    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { position, .. } => *position,
            ParseError::UnexpectedEnd { position, .. } => *position,
        }
    }

    pub fn context(&self) -> Option<&str> {
        match self {
            ParseError::UnexpectedToken { context, .. } => context.as_deref(),
            ParseError::UnexpectedEnd { context, .. } => context.as_deref(),
        }
    }
}
