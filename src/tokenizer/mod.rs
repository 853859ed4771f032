//! # Tokenizer Stage
//!
//! First stage of the pipeline. Source text is split on runs of whitespace and
//! every lexeme is classified against the governance-supplied pattern rules.
//!
//! ## Component Structure
//!
//! * [`pattern`]: pattern matcher seam, rules and the priority classifier
//! * [`token`]: token types, the growable [`TokenStream`](token::TokenStream)
//!   and the [`Tokenizer`](token::Tokenizer) itself
//!
//! ## Classification
//!
//! Every rule is tested against the lexeme. The matching rule with the highest
//! priority decides the category; equal priorities keep the earlier rule.
//! A lexeme no rule matches becomes `UNKNOWN` with priority 0 and tokenizing
//! carries on.
//!
//! ```rust
//! use rift::config::StaticGovernance;
//! use rift::tokenizer::token::{TokenCategory, Tokenizer};
//!
//! let tokenizer = Tokenizer::from_governance(&StaticGovernance::rift_defaults()).unwrap();
//! let stream = tokenizer.tokenize("x + 2").unwrap();
//! assert_eq!(stream.len(), 3);
//! assert_eq!(stream.get(2).unwrap().category, TokenCategory::Number);
//! ```

pub mod pattern;
pub mod token;
