//! Optimization passes and the ordered registry that runs them.

use std::fmt;
use tracing::debug;

use crate::ast::{AstNode, BinaryOperator};
use crate::config::OptimizationFlags;

pub const CONSTANT_FOLDING: &str = "constant_folding";
pub const DEAD_CODE_ELIMINATION: &str = "dead_code_elimination";
pub const COMMON_SUBEXPRESSION_ELIMINATION: &str = "common_subexpression_elimination";

/// A pure tree-to-tree rewrite, identified by its configuration name.
pub trait OptimizationPass: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, ast: AstNode) -> AstNode;
}

/// Replaces every `BinaryOp` whose operands are both numbers with the
/// computed number, bottom-up.
///
/// Integer operands use exact i64 arithmetic and fall back to f64 when a
/// literal or a result does not fit. Division by zero and non-finite
/// results are left in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantFolding;

impl OptimizationPass for ConstantFolding {
    fn name(&self) -> &'static str {
        CONSTANT_FOLDING
    }

    fn run(&self, ast: AstNode) -> AstNode {
        fold(ast)
    }
}

// Work left on an operator while the traversal is inside one of its operands.
enum Frame {
    RightPending {
        op: BinaryOperator,
        right: AstNode,
    },
    LeftFolded {
        op: BinaryOperator,
        left: AstNode,
    },
}

// Post-order over an explicit stack: descend the left spine, then fold each
// operator once both of its operands are done.
fn fold(root: AstNode) -> AstNode {
    let mut frames = Vec::new();
    let mut next = root;
    loop {
        let mut value = loop {
            match next.into_parts() {
                Ok((op, left, right)) => {
                    frames.push(Frame::RightPending { op, right });
                    next = left;
                }
                Err(leaf) => break leaf,
            }
        };
        loop {
            match frames.pop() {
                None => return value,
                Some(Frame::RightPending { op, right }) => {
                    frames.push(Frame::LeftFolded { op, left: value });
                    next = right;
                    break;
                }
                Some(Frame::LeftFolded { op, left }) => value = fold_operands(op, left, value),
            }
        }
    }
}

fn fold_operands(op: BinaryOperator, left: AstNode, right: AstNode) -> AstNode {
    let folded = match (&left, &right) {
        (AstNode::Number(l), AstNode::Number(r)) => evaluate(op, l, r),
        _ => None,
    };
    match folded {
        Some(value) => {
            debug!(
                "Folded {} {} {} into {}",
                operand_text(&left),
                op,
                operand_text(&right),
                value
            );
            AstNode::Number(value)
        }
        None => AstNode::binary(op, left, right),
    }
}

fn operand_text(node: &AstNode) -> &str {
    match node {
        AstNode::Number(v) | AstNode::Identifier(v) => v,
        AstNode::BinaryOp { .. } => "<expr>",
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    fn parse(text: &str) -> Option<Self> {
        match text.parse::<i64>() {
            Ok(v) => Some(Numeric::Int(v)),
            Err(_) => text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Numeric::Float),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(v) => v as f64,
            Numeric::Float(v) => v,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Numeric::Int(v) => v == 0,
            Numeric::Float(v) => v == 0.0,
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(v) => write!(f, "{}", v),
            Numeric::Float(v) => write!(f, "{}", v),
        }
    }
}

fn evaluate(op: BinaryOperator, left: &str, right: &str) -> Option<String> {
    let (left, right) = (Numeric::parse(left)?, Numeric::parse(right)?);
    if op == BinaryOperator::Divide && right.is_zero() {
        return None;
    }

    let exact = match (left, right) {
        (Numeric::Int(a), Numeric::Int(b)) => match op {
            BinaryOperator::Add => a.checked_add(b),
            BinaryOperator::Subtract => a.checked_sub(b),
            BinaryOperator::Multiply => a.checked_mul(b),
            BinaryOperator::Divide => a.checked_rem(b).filter(|r| *r == 0).and(a.checked_div(b)),
        },
        _ => None,
    };
    let value = match exact {
        Some(v) => Numeric::Int(v),
        None => {
            let (a, b) = (left.as_f64(), right.as_f64());
            let v = match op {
                BinaryOperator::Add => a + b,
                BinaryOperator::Subtract => a - b,
                BinaryOperator::Multiply => a * b,
                BinaryOperator::Divide => a / b,
            };
            if !v.is_finite() {
                return None;
            }
            Numeric::Float(v)
        }
    };

    Some(value.to_string())
}

/// Registered under a configuration name but leaves the tree untouched.
/// Used for passes whose rewrite has not been defined yet.
#[derive(Debug, Clone, Copy)]
pub struct IdentityPass {
    name: &'static str,
}

impl IdentityPass {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl OptimizationPass for IdentityPass {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, ast: AstNode) -> AstNode {
        ast
    }
}

/// Ordered set of passes. Passes run in registration order, each only if
/// its name is enabled in the flags.
#[derive(Debug)]
pub struct PassRegistry {
    passes: Vec<Box<dyn OptimizationPass>>,
}

impl Default for PassRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(ConstantFolding)
            .register(IdentityPass::new(DEAD_CODE_ELIMINATION))
            .register(IdentityPass::new(COMMON_SUBEXPRESSION_ELIMINATION));
        registry
    }
}

impl PassRegistry {
    pub fn empty() -> Self {
        Self { passes: Vec::new() }
    }

    /// Adds a pass at the end, or replaces a registered pass with the same
    /// name while keeping its slot in the order.
    pub fn register<P: OptimizationPass + 'static>(&mut self, pass: P) -> &mut Self {
        let pass: Box<dyn OptimizationPass> = Box::new(pass);
        match self.passes.iter().position(|p| p.name() == pass.name()) {
            Some(index) => self.passes[index] = pass,
            None => self.passes.push(pass),
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.passes.iter().any(|p| p.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.iter().map(|p| p.name())
    }

    /// Runs the enabled passes; returns the rewritten tree and the names of
    /// the passes that ran.
    pub fn run(&self, ast: AstNode, flags: &OptimizationFlags) -> (AstNode, Vec<&'static str>) {
        let mut applied = Vec::new();
        let ast = self
            .passes
            .iter()
            .filter(|pass| flags.is_enabled(pass.name()))
            .fold(ast, |ast, pass| {
                debug!("Applying optimization pass {}", pass.name());
                applied.push(pass.name());
                pass.run(ast)
            });
        (ast, applied)
    }
}
