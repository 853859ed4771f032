//! # Analyzer (Parser) Stage
//!
//! Turns the token stream from the [`tokenizer`](crate::tokenizer) into an
//! expression tree using a small set of parser combinators.
//!
//! ## Grammar
//!
//! ```text
//! expression := term ( ('+' | '-') term )*
//! term       := factor ( ('*' | '/') factor )*
//! factor     := Identifier | Number
//! ```
//!
//! Both binary tiers are left-associative, and `*`/`/` bind tighter than
//! `+`/`-`. The whole stream must form one expression.
//!
//! ## Position in the Pipeline
//!
//! ```text
//! Source → Tokenizer → Analyzer → Coordinator → Renderer
//! ```
//!
//! ## Errors
//!
//! The first failure aborts the parse. [`ParseError`] carries the token
//! position and the grammar rules the error passed through; there is no
//! recovery.

pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;

pub use self::core::ParseError;
pub use self::core::ParseResult;
pub use self::core::Parser;
pub use parsers::parse;
