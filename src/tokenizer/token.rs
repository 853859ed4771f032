use serde::{Deserialize, Serialize};
use std::{collections::TryReserveError, fmt};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::{debug, info};

use super::pattern::{PatternClassifier, PatternRule};
use crate::config::{ConfigResult, Governance, Stage};

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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenCategory {
    Identifier,
    Number,
    Operator,
    Whitespace,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub category: TokenCategory,
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub priority: i32,
}

impl Token {
    pub fn is_category(&self, category: TokenCategory) -> bool {
        self.category == category
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.category, self.text)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError {
    #[error("Allocation failure while growing token stream from {capacity} slots: {source}")]
    AllocationFailure {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}

pub type TokenizerResult<T> = Result<T, TokenizerError>;

pub const INITIAL_CAPACITY: usize = 10;

/// Tokens in source order. Storage doubles when full and never shrinks.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl Default for TokenStream {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStream {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, token: Token) -> TokenizerResult<()> {
        let capacity = self.tokens.capacity();
        if self.tokens.len() == capacity {
            self.tokens
                .try_reserve_exact(capacity.max(1))
                .map_err(|source| TokenizerError::AllocationFailure { capacity, source })?;
        }
        self.tokens.push(token);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tokens.capacity()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Splits source text on whitespace and classifies each lexeme.
///
/// Lexemes never contain whitespace, so a `WHITESPACE` rule is accepted but
/// cannot fire until the lexer stops splitting on whitespace.
#[derive(Debug)]
pub struct Tokenizer {
    classifier: PatternClassifier,
}

impl Tokenizer {
    pub fn new(classifier: PatternClassifier) -> Self {
        Self { classifier }
    }

    pub fn from_rules(rules: impl IntoIterator<Item = PatternRule>) -> Self {
        Self::new(PatternClassifier::new(rules))
    }

    pub fn from_governance<G: Governance + ?Sized>(governance: &G) -> ConfigResult<Self> {
        let config = governance.stage_config(Stage::Tokenizer)?;
        let rules = governance.get_pattern_rules(Stage::Tokenizer)?;
        info!(
            "Stage {} loaded with SP alignment {} (governance {}, {} sections, {} rules)",
            config.stage_name,
            config.sp_alignment,
            config.governance_version,
            config.sections.len(),
            rules.len()
        );
        Ok(Self::from_rules(rules))
    }

    pub fn classifier(&self) -> &PatternClassifier {
        &self.classifier
    }

    #[tracing::instrument(level = "debug", skip(self, input))]
    pub fn tokenize(&self, input: &str) -> TokenizerResult<TokenStream> {
        let mut stream = TokenStream::new();

        for lexeme in input.split_whitespace() {
            let classification = self.classifier.classify(lexeme);
            debug!(
                "Token {:?} classified as {} (priority {})",
                lexeme, classification.category, classification.priority
            );
            stream.push(Token {
                category: classification.category,
                text: lexeme.to_string(),
                line: 1,
                column: stream.len() + 1,
                priority: classification.priority,
            })?;
        }

        debug!("Tokenization complete: {} tokens", stream.len());
        Ok(stream)
    }
}

pub fn tokenize(rules: &[PatternRule], input: &str) -> TokenizerResult<TokenStream> {
    Tokenizer::from_rules(rules.iter().cloned()).tokenize(input)
}
