use super::super::{core::*, prelude::*};
use crate::ast::{AstNode, BinaryOperator};
use crate::tokenizer::token::{Token, TokenCategory};

/// `expression := term (('+' | '-') term)*`
pub fn parse_expression() -> impl Parser<Token, AstNode> {
    with_context(
        chain_left(
            parse_term(),
            parse_operator("'+' or '-'", &[BinaryOperator::Add, BinaryOperator::Subtract]),
            combine,
        ),
        "expression",
    )
}

/// `term := factor (('*' | '/') factor)*`
fn parse_term() -> impl Parser<Token, AstNode> {
    with_context(
        chain_left(
            parse_factor(),
            parse_operator(
                "'*' or '/'",
                &[BinaryOperator::Multiply, BinaryOperator::Divide],
            ),
            combine,
        ),
        "term",
    )
}

/// `factor := Identifier | Number`
fn parse_factor() -> impl Parser<Token, AstNode> {
    with_context(
        satisfy("identifier or number", |token: &Token| match token.category {
            TokenCategory::Identifier => Some(AstNode::Identifier(token.text.clone())),
            TokenCategory::Number => Some(AstNode::Number(token.text.clone())),
            _ => None,
        }),
        "factor",
    )
}

// Operator token whose text is one of `operators`.
fn parse_operator(
    expected: &str,
    operators: &'static [BinaryOperator],
) -> impl Parser<Token, BinaryOperator> {
    satisfy(expected, move |token: &Token| {
        if !token.is_category(TokenCategory::Operator) {
            return None;
        }
        let op = token.text.parse::<BinaryOperator>().ok()?;
        operators.contains(&op).then_some(op)
    })
}

fn combine(left: AstNode, op: BinaryOperator, right: AstNode) -> AstNode {
    AstNode::binary(op, left, right)
}
