//! # Parser Combinators
//!
//! The building blocks the expression grammar is assembled from.
//!
//! * **Satisfy**: consumes one token when a predicate accepts it
//! * **ChainLeft**: `operand (operator operand)*` folded to the left
//! * **Complete**: requires the whole input to be consumed
//! * **WithContext**: records the grammar rule on errors passing through

use super::core::ParseError;
use super::core::ParseResult;
use super::core::Parser;
use std::fmt;
use std::marker::PhantomData;

/// Satisfy: consumes the current token if `f` maps it to an output.
#[derive(Clone)]
pub struct Satisfy<I, O, F> {
    f: F,
    /// What the parser was looking for, used in error messages
    expected: String,
    _phantom: PhantomData<(I, O)>,
}

impl<I, O, F> Satisfy<I, O, F> {
    pub fn new(expected: impl Into<String>, f: F) -> Self {
        Self {
            f,
            expected: expected.into(),
            _phantom: PhantomData,
        }
    }
}

impl<I, O, F> Parser<I, O> for Satisfy<I, O, F>
where
    I: fmt::Display,
    F: Fn(&I) -> Option<O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        match input.get(pos) {
            Some(item) => (self.f)(item)
                .map(|output| (pos + 1, output))
                .ok_or_else(|| ParseError::UnexpectedToken {
                    expected: self.expected.clone(),
                    found: item.to_string(),
                    position: pos,
                    context: None,
                }),
            None => Err(ParseError::UnexpectedEnd {
                expected: self.expected.clone(),
                position: pos,
                context: None,
            }),
        }
    }
}

/// ChainLeft: parses `operand (operator operand)*` and folds the results
/// left to right with `combine`.
///
/// The loop ends when `operator` fails. Once an operator has been consumed
/// the following operand is mandatory and its error is returned as is.
#[derive(Clone)]
pub struct ChainLeft<P, Q, F, I, O, Op> {
    operand: P,
    operator: Q,
    combine: F,
    _phantom: PhantomData<(I, O, Op)>,
}

impl<P, Q, F, I, O, Op> ChainLeft<P, Q, F, I, O, Op> {
    pub fn new(operand: P, operator: Q, combine: F) -> Self {
        Self {
            operand,
            operator,
            combine,
            _phantom: PhantomData,
        }
    }
}

impl<P, Q, F, I, O, Op> Parser<I, O> for ChainLeft<P, Q, F, I, O, Op>
where
    P: Parser<I, O>,
    Q: Parser<I, Op>,
    F: Fn(O, Op, O) -> O,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let (mut pos, mut acc) = self.operand.parse(input, pos)?;
        while let Ok((after_operator, op)) = self.operator.parse(input, pos) {
            let (next_pos, right) = self.operand.parse(input, after_operator)?;
            acc = (self.combine)(acc, op, right);
            pos = next_pos;
        }
        Ok((pos, acc))
    }
}

/// Complete: succeeds only if the inner parser consumed every token.
#[derive(Clone)]
pub struct Complete<P, O> {
    parser: P,
    _phantom: PhantomData<O>,
}

impl<P, O> Complete<P, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<P, I, O> Parser<I, O> for Complete<P, O>
where
    P: Parser<I, O>,
    I: fmt::Display,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let (pos, output) = self.parser.parse(input, pos)?;
        match input.get(pos) {
            None => Ok((pos, output)),
            Some(rest) => Err(ParseError::UnexpectedToken {
                expected: "end of input".to_string(),
                found: rest.to_string(),
                position: pos,
                context: None,
            }),
        }
    }
}

/// WithContext: appends `context` to the error trail of the inner parser.
#[derive(Clone)]
pub struct WithContext<P, C> {
    parser: P,
    context: C,
}

impl<P, C> WithContext<P, C> {
    pub fn new(parser: P, context: C) -> Self {
        Self { parser, context }
    }
}

impl<I, O, P, C: AsRef<str>> Parser<I, O> for WithContext<P, C>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self.parser
            .parse(input, pos)
            .map_err(|e| e.with_context(self.context.as_ref()))
    }
}
