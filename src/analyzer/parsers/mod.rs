pub mod expression;

use tracing::debug;

use super::{core::*, prelude::*};
use crate::ast::AstNode;
use crate::tokenizer::token::{Token, TokenStream};

pub use expression::parse_expression;

/// Root parser: one expression covering the whole token stream.
pub fn parse_root() -> impl Parser<Token, AstNode> {
    complete(parse_expression())
}

/// Parses a token stream into an expression tree.
///
/// The stream is consumed. Parsing stops at the first error; nothing built
/// before the failure is returned.
#[tracing::instrument(level = "debug", skip(tokens), fields(tokens = tokens.len()))]
pub fn parse(tokens: TokenStream) -> Result<AstNode, ParseError> {
    let (_, ast) = parse_root().parse(tokens.as_slice(), 0)?;
    debug!("Parsing complete: {} nodes", ast.node_count());
    Ok(ast)
}
