//! Priority-based pattern classification.
//!
//! A [`PatternClassifier`] holds an ordered list of compiled [`PatternRule`]s.
//! Classifying a lexeme scans every rule; the matching rule with the strictly
//! greatest priority decides the category, and on equal priority the rule
//! declared first keeps the win.

use regex::bytes::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::warn;

use super::token::TokenCategory;

/// Matching capability behind every rule. Matches are whole-string.
pub trait PatternMatcher: fmt::Debug + Send + Sync {
    fn matches(&self, text: &str) -> bool;
}

/// Compiles rule patterns into matchers.
pub trait PatternEngine {
    fn compile(
        &self,
        pattern: &str,
    ) -> Result<Box<dyn PatternMatcher>, Box<dyn std::error::Error + Send + Sync>>;
}

/// `regex`-backed matcher. The pattern is wrapped in `^(?:...)$` so a rule
/// that forgets its anchors still matches the full lexeme only.
///
/// Patterns run over the lexeme's bytes with Unicode classes off: `\d`,
/// `\w` and `\s` are ASCII, and `.` matches a single byte.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!("^(?:{})$", pattern))
            .unicode(false)
            .build()?;
        Ok(Self { regex })
    }
}

impl PatternMatcher for RegexMatcher {
    fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text.as_bytes())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegexEngine;

impl PatternEngine for RegexEngine {
    fn compile(
        &self,
        pattern: &str,
    ) -> Result<Box<dyn PatternMatcher>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Box::new(RegexMatcher::new(pattern)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub pattern: String,
    pub category: TokenCategory,
    pub priority: i32,
}

impl PatternRule {
    pub fn new(pattern: impl Into<String>, category: TokenCategory, priority: i32) -> Self {
        Self {
            pattern: pattern.into(),
            category,
            priority,
        }
    }
}

/// Sequence number of a rule inside one classifier, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub usize);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

#[derive(Error, Debug)]
#[error("Pattern compile error in {rule} ({pattern:?}): {source}")]
pub struct PatternCompileError {
    pub rule: RuleId,
    pub pattern: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: TokenCategory,
    pub priority: i32,
    /// The winning rule, `None` when nothing matched.
    pub rule: Option<RuleId>,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            category: TokenCategory::Unknown,
            priority: 0,
            rule: None,
        }
    }
}

#[derive(Debug)]
struct CompiledRule {
    id: RuleId,
    rule: PatternRule,
    // None when the pattern failed to compile; such a rule never matches.
    matcher: Option<Box<dyn PatternMatcher>>,
}

#[derive(Debug, Default)]
pub struct PatternClassifier {
    rules: Vec<CompiledRule>,
    compile_errors: Vec<PatternCompileError>,
    next_id: usize,
}

impl PatternClassifier {
    pub fn new(rules: impl IntoIterator<Item = PatternRule>) -> Self {
        Self::with_engine(rules, &RegexEngine)
    }

    pub fn with_engine<E>(rules: impl IntoIterator<Item = PatternRule>, engine: &E) -> Self
    where
        E: PatternEngine + ?Sized,
    {
        let mut classifier = Self::default();
        for rule in rules {
            classifier.add_rule(rule, engine);
        }
        classifier
    }

    /// Appends a rule after the existing ones. A pattern that does not compile
    /// is kept in place (so ids stay stable) but never matches.
    pub fn add_rule<E>(&mut self, rule: PatternRule, engine: &E) -> RuleId
    where
        E: PatternEngine + ?Sized,
    {
        self.next_id += 1;
        let id = RuleId(self.next_id);

        let matcher = match engine.compile(&rule.pattern) {
            Ok(matcher) => Some(matcher),
            Err(source) => {
                let error = PatternCompileError {
                    rule: id,
                    pattern: rule.pattern.clone(),
                    source,
                };
                warn!("{}", error);
                self.compile_errors.push(error);
                None
            }
        };

        self.rules.push(CompiledRule { id, rule, matcher });
        id
    }

    pub fn classify(&self, text: &str) -> Classification {
        let mut best_category = TokenCategory::Unknown;
        let mut best_priority = -1;
        let mut best_rule = None;

        for compiled in &self.rules {
            let Some(matcher) = &compiled.matcher else {
                continue;
            };
            if compiled.rule.priority > best_priority && matcher.matches(text) {
                best_category = compiled.rule.category;
                best_priority = compiled.rule.priority;
                best_rule = Some(compiled.id);
            }
        }

        match best_rule {
            Some(rule) => Classification {
                category: best_category,
                priority: best_priority,
                rule: Some(rule),
            },
            None => Classification::unknown(),
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &PatternRule)> {
        self.rules.iter().map(|compiled| (compiled.id, &compiled.rule))
    }

    pub fn compile_errors(&self) -> &[PatternCompileError] {
        &self.compile_errors
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One-shot classification against a rule list.
pub fn classify(rules: &[PatternRule], text: &str) -> Classification {
    PatternClassifier::new(rules.iter().cloned()).classify(text)
}
