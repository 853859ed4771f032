//! # RIFT: Staged Expression Compiler
//!
//! RIFT compiles four-operator arithmetic expressions through a fixed chain
//! of stages. Each stage is configured from a governance store and only
//! consumes the output of the stage before it.
//!
//! ```text
//! Source → Tokenizer → Analyzer → Coordinator → Renderer → Output
//! ```
//!
//! ### Stage 1: Tokenization
//!
//! The [`tokenizer`] splits the source on whitespace and classifies every
//! lexeme against prioritized pattern rules. Equal priorities go to the rule
//! declared first.
//!
//! ### Stage 2: Parsing
//!
//! The [`analyzer`] builds a binary expression tree ([`ast`]) with standard
//! precedence and left associativity, using parser combinators.
//!
//! ### Stage 3: Coordination
//!
//! The [`coordinator`] counts tree nodes and runs the optimization passes
//! enabled in configuration. Constant folding is the only pass that changes
//! the tree.
//!
//! ### Stage 4: Rendering
//!
//! The [`renderer`] writes the canonical indented S-expression form of the
//! tree, optionally with a JSON export.
//!
//! ## Configuration
//!
//! Stages read their settings through the [`config::Governance`] trait.
//! [`config::StaticGovernance::rift_defaults`] provides the standard setup:
//!
//! ```rust
//! use rift::config::StaticGovernance;
//! use rift::run_pipeline;
//!
//! let output = run_pipeline("x + 2 * 3", &StaticGovernance::rift_defaults()).unwrap();
//! assert_eq!(output.text, "(BinOp +\n  (Identifier x)\n  (Number 6)\n)\n");
//! ```
//!
//! ## Errors
//!
//! Every stage failure surfaces as a [`PipelineError`] naming the failed
//! stage. Malformed pattern rules and unclassifiable lexemes are not errors:
//! the rule never matches and the lexeme becomes `UNKNOWN`.

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod tokenizer;

// Re-exports
pub use ast::{AstNode, BinaryOperator};
pub use error::*;
pub use pipeline::{run_pipeline, Pipeline, RenderedOutput};
