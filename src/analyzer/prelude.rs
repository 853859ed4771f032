use super::combinators::*;
use super::core::Parser;

pub fn satisfy<I, O, F>(expected: &str, f: F) -> Satisfy<I, O, F>
where
    F: Fn(&I) -> Option<O>,
{
    Satisfy::new(expected, f)
}

pub fn chain_left<P, Q, F, I, O, Op>(
    operand: P,
    operator: Q,
    combine: F,
) -> ChainLeft<P, Q, F, I, O, Op>
where
    P: Parser<I, O>,
    Q: Parser<I, Op>,
    F: Fn(O, Op, O) -> O,
{
    ChainLeft::new(operand, operator, combine)
}

pub fn complete<P, I, O>(parser: P) -> Complete<P, O>
where
    P: Parser<I, O>,
{
    Complete::new(parser)
}

pub fn with_context<P, I, O>(parser: P, context: &'static str) -> WithContext<P, &'static str>
where
    P: Parser<I, O>,
{
    WithContext::new(parser, context)
}
