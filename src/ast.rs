//! Expression tree produced by the analyzer.
//!
//! Children are owned boxes, so a tree has no sharing and no cycles.
//! `BinaryOp` always carries exactly two children; identifiers and numbers
//! are leaves.
//!
//! The parser builds left-deep chains of any length, so nothing here may
//! recurse once per level: counting walks an explicit stack and dropping a
//! tree detaches children onto a heap-allocated work list.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum BinaryOperator {
    #[strum(serialize = "+")]
    #[serde(rename = "+")]
    Add,
    #[strum(serialize = "-")]
    #[serde(rename = "-")]
    Subtract,
    #[strum(serialize = "*")]
    #[serde(rename = "*")]
    Multiply,
    #[strum(serialize = "/")]
    #[serde(rename = "/")]
    Divide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AstNode {
    Identifier(String),
    /// Numeric literal kept as its source text.
    Number(String),
    BinaryOp {
        op: BinaryOperator,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
}

impl AstNode {
    pub fn identifier(name: impl Into<String>) -> Self {
        AstNode::Identifier(name.into())
    }

    pub fn number(value: impl Into<String>) -> Self {
        AstNode::Number(value.into())
    }

    pub fn binary(op: BinaryOperator, left: AstNode, right: AstNode) -> Self {
        AstNode::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn left(&self) -> Option<&AstNode> {
        match self {
            AstNode::BinaryOp { left, .. } => Some(left),
            _ => None,
        }
    }

    pub fn right(&self) -> Option<&AstNode> {
        match self {
            AstNode::BinaryOp { right, .. } => Some(right),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, AstNode::BinaryOp { .. })
    }

    pub fn node_count(&self) -> usize {
        node_count(Some(self))
    }

    /// Splits a `BinaryOp` into its operator and owned children. A leaf is
    /// handed back unchanged.
    pub fn into_parts(mut self) -> Result<(BinaryOperator, AstNode, AstNode), AstNode> {
        if let AstNode::BinaryOp { op, left, right } = &mut self {
            return Ok((*op, detach(left), detach(right)));
        }
        Err(self)
    }
}

// Leaves an empty leaf behind; the string does not allocate.
fn detach(child: &mut AstNode) -> AstNode {
    std::mem::replace(child, AstNode::Number(String::new()))
}

impl Drop for AstNode {
    fn drop(&mut self) {
        let mut pending = match self {
            AstNode::BinaryOp { left, right, .. } if !(left.is_leaf() && right.is_leaf()) => {
                vec![detach(left), detach(right)]
            }
            _ => return,
        };
        while let Some(mut node) = pending.pop() {
            if let AstNode::BinaryOp { left, right, .. } = &mut node {
                pending.push(detach(left));
                pending.push(detach(right));
            }
        }
    }
}

/// `count(None) = 0`, `count(n) = 1 + count(n.left) + count(n.right)`,
/// evaluated with an explicit stack.
pub fn node_count(node: Option<&AstNode>) -> usize {
    let mut pending: Vec<&AstNode> = node.into_iter().collect();
    let mut count = 0;
    while let Some(node) = pending.pop() {
        count += 1;
        if let AstNode::BinaryOp { left, right, .. } = node {
            pending.push(right);
            pending.push(left);
        }
    }
    count
}
