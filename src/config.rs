//! # Governance Configuration
//!
//! Every pipeline stage is configured from a governance store. The store is an
//! external collaborator: the core only reads from it through the [`Governance`]
//! trait and never mutates it.
//!
//! A store holds one [`StageConfig`] per [`Stage`]. Each stage configuration is
//! made of named [`ConfigSection`]s, and each section is an ordered list of
//! key/value pairs. Declaration order is preserved because it is meaningful for
//! pattern rules (earlier rules win priority ties).
//!
//! ```text
//! Stage::Tokenizer   → TOKEN_PATTERNS, DFA_CONFIGURATION
//! Stage::Parser      → GRAMMAR_RULES, PRECEDENCE_TABLE
//! Stage::Coordinator → OPTIMIZATION_PASSES
//! Stage::Renderer    → OUTPUT_FORMATS
//! ```
//!
//! [`StaticGovernance`] is the in-memory implementation. It can be built in
//! code, loaded from JSON, or seeded with [`StaticGovernance::rift_defaults`].

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path, str::FromStr};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;
use tracing::{debug, info};

use crate::tokenizer::{pattern::PatternRule, token::TokenCategory};

pub const TOKEN_PATTERNS: &str = "TOKEN_PATTERNS";
pub const OPTIMIZATION_PASSES: &str = "OPTIMIZATION_PASSES";
pub const OUTPUT_FORMATS: &str = "OUTPUT_FORMATS";

const PATTERN_SUFFIX: &str = "_PATTERN";
const PRIORITY_SUFFIX: &str = "_PRIORITY";

/// Pipeline stage identifier.
///
/// Stages run in declaration order. [`Stage::index`] gives the legacy
/// `.riftrc.N` number of the stage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Tokenizer,
    Parser,
    Coordinator,
    Renderer,
}

impl Stage {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Stage::iter().nth(index)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing configuration: stage {stage}, key {key}")]
    Missing { stage: Stage, key: String },
    #[error("Invalid configuration value for {key} in stage {stage}: {value:?}")]
    InvalidValue {
        stage: Stage,
        key: String,
        value: String,
    },
    #[error("Unknown token category in {key} (stage {stage})")]
    UnknownCategory { stage: Stage, key: String },
    #[error("Failed to read governance file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse governance: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// The stage the error was raised for, when it is known.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ConfigError::Missing { stage, .. }
            | ConfigError::InvalidValue { stage, .. }
            | ConfigError::UnknownCategory { stage, .. } => Some(*stage),
            ConfigError::Io(_) | ConfigError::Json(_) => None,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPair {
    pub key: String,
    pub value: String,
}

/// Ordered key/value section. Lookups return the first pair with a matching key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSection {
    entries: Vec<ConfigPair>,
}

impl ConfigSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push(ConfigPair {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigPair> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub stage_name: String,
    #[serde(default)]
    pub sp_alignment: String,
    #[serde(default = "default_governance_version")]
    pub governance_version: String,
    #[serde(default)]
    pub sections: BTreeMap<String, ConfigSection>,
}

impl StageConfig {
    pub fn new(
        stage_name: impl Into<String>,
        sp_alignment: impl Into<String>,
        governance_version: impl Into<String>,
    ) -> Self {
        Self {
            stage_name: stage_name.into(),
            sp_alignment: sp_alignment.into(),
            governance_version: governance_version.into(),
            sections: BTreeMap::new(),
        }
    }

    pub fn with_section(mut self, name: impl Into<String>, section: ConfigSection) -> Self {
        self.sections.insert(name.into(), section);
        self
    }

    pub fn section(&self, name: &str) -> Option<&ConfigSection> {
        self.sections.get(name)
    }
}

/// Pass name → enablement. Passes absent from the map are disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptimizationFlags {
    flags: BTreeMap<String, bool>,
}

impl OptimizationFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pass: impl Into<String>, enabled: bool) -> Self {
        self.set(pass, enabled);
        self
    }

    pub fn set(&mut self, pass: impl Into<String>, enabled: bool) {
        self.flags.insert(pass.into(), enabled);
    }

    pub fn is_enabled(&self, pass: &str) -> bool {
        self.flags.get(pass).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }
}

/// Read-only configuration contract consumed by the pipeline stages.
///
/// Implementors only provide [`Governance::stage_config`]; the typed lookups
/// are derived from it.
pub trait Governance {
    fn stage_config(&self, stage: Stage) -> ConfigResult<&StageConfig>;

    fn section(&self, stage: Stage, name: &str) -> ConfigResult<&ConfigSection> {
        self.stage_config(stage)?
            .section(name)
            .ok_or_else(|| ConfigError::Missing {
                stage,
                key: name.to_string(),
            })
    }

    fn get_value(&self, stage: Stage, section: &str, key: &str) -> ConfigResult<&str> {
        self.section(stage, section)?
            .get(key)
            .ok_or_else(|| ConfigError::Missing {
                stage,
                key: format!("{}.{}", section, key),
            })
    }

    /// Pattern rules of the stage's `TOKEN_PATTERNS` section, in declaration order.
    fn get_pattern_rules(&self, stage: Stage) -> ConfigResult<Vec<PatternRule>> {
        pattern_rules_from_section(stage, self.section(stage, TOKEN_PATTERNS)?)
    }

    fn get_optimization_flags(&self, stage: Stage) -> ConfigResult<OptimizationFlags> {
        let section = self.section(stage, OPTIMIZATION_PASSES)?;
        let mut flags = OptimizationFlags::new();
        for pair in section.iter() {
            let enabled = parse_switch(&pair.value).ok_or_else(|| ConfigError::InvalidValue {
                stage,
                key: pair.key.clone(),
                value: pair.value.clone(),
            })?;
            flags.set(pair.key.clone(), enabled);
        }
        Ok(flags)
    }
}

fn pattern_rules_from_section(
    stage: Stage,
    section: &ConfigSection,
) -> ConfigResult<Vec<PatternRule>> {
    let mut rules = Vec::new();
    for pair in section.iter() {
        let Some(prefix) = pair.key.strip_suffix(PATTERN_SUFFIX) else {
            continue;
        };
        let category =
            TokenCategory::from_str(prefix).map_err(|_| ConfigError::UnknownCategory {
                stage,
                key: pair.key.clone(),
            })?;

        let priority_key = format!("{}{}", prefix, PRIORITY_SUFFIX);
        let raw = section
            .get(&priority_key)
            .ok_or_else(|| ConfigError::Missing {
                stage,
                key: priority_key.clone(),
            })?;
        let priority = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| ConfigError::InvalidValue {
                stage,
                key: priority_key.clone(),
                value: raw.to_string(),
            })?;

        rules.push(PatternRule::new(pair.value.clone(), category, priority));
    }
    debug!("stage {} declares {} pattern rules", stage, rules.len());
    Ok(rules)
}

/// `enabled`/`true`/`on` and `disabled`/`false`/`off`, case-insensitive.
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "enabled" | "true" | "on" => Some(true),
        "disabled" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// In-memory governance store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticGovernance {
    #[serde(default)]
    stages: BTreeMap<Stage, StageConfig>,
}

impl StaticGovernance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: Stage, config: StageConfig) -> Self {
        self.insert_stage(stage, config);
        self
    }

    pub fn insert_stage(&mut self, stage: Stage, config: StageConfig) {
        self.stages.insert(stage, config);
    }

    pub fn loaded_stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.stages.keys().copied()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let file = File::open(path.as_ref())?;
        let governance: Self = serde_json::from_reader(BufReader::new(file))?;
        info!(
            "Loaded governance from {} ({} stages)",
            path.as_ref().display(),
            governance.stages.len()
        );
        Ok(governance)
    }

    /// The four `.riftrc.N` stage configurations.
    pub fn rift_defaults() -> Self {
        let tokenizer = StageConfig::new("TOKENIZER", "LEXICAL_ANALYSIS", "1.0.0")
            .with_section(
                TOKEN_PATTERNS,
                ConfigSection::new()
                    .with("IDENTIFIER_PATTERN", r"^[a-zA-Z_]\w*$")
                    .with("IDENTIFIER_PRIORITY", "100")
                    .with("NUMBER_PATTERN", r"^\d+(\.\d+)?$")
                    .with("NUMBER_PRIORITY", "90")
                    .with("OPERATOR_PATTERN", r"^[+\-*/=<>!&|]$")
                    .with("OPERATOR_PRIORITY", "80")
                    .with("WHITESPACE_PATTERN", r"^\s+$")
                    .with("WHITESPACE_PRIORITY", "10"),
            )
            .with_section(
                "DFA_CONFIGURATION",
                ConfigSection::new()
                    .with("initial_state", "START")
                    .with("final_states", "IDENTIFIER,NUMBER,OPERATOR")
                    .with("error_recovery", "true"),
            );

        let parser = StageConfig::new("PARSER_BRIDGE", "SYNTACTIC_ANALYSIS", "1.0.0")
            .with_section(
                "GRAMMAR_RULES",
                ConfigSection::new()
                    .with("EXPRESSION_RULE", "expression -> term ((PLUS | MINUS) term)*")
                    .with("TERM_RULE", "term -> factor ((MULTIPLY | DIVIDE) factor)*")
                    .with("FACTOR_RULE", "factor -> IDENTIFIER | NUMBER"),
            )
            .with_section(
                "PRECEDENCE_TABLE",
                ConfigSection::new()
                    .with("MULTIPLY_PRECEDENCE", "20")
                    .with("DIVIDE_PRECEDENCE", "20")
                    .with("PLUS_PRECEDENCE", "10")
                    .with("MINUS_PRECEDENCE", "10"),
            );

        let coordinator = StageConfig::new("AST_COORDINATOR", "SEMANTIC_ANALYSIS", "1.0.0")
            .with_section(
                OPTIMIZATION_PASSES,
                ConfigSection::new()
                    .with("constant_folding", "enabled")
                    .with("dead_code_elimination", "enabled")
                    .with("common_subexpression_elimination", "disabled"),
            );

        let renderer = StageConfig::new("OUTPUT_GENERATOR", "CODE_GENERATION", "1.0.0")
            .with_section(
                OUTPUT_FORMATS,
                ConfigSection::new()
                    .with("primary_format", "LISP_STYLE_AST")
                    .with("secondary_format", "C_CODE")
                    .with("debug_format", "DOT_GRAPH")
                    .with("json_export", "enabled"),
            );

        Self::new()
            .with_stage(Stage::Tokenizer, tokenizer)
            .with_stage(Stage::Parser, parser)
            .with_stage(Stage::Coordinator, coordinator)
            .with_stage(Stage::Renderer, renderer)
    }
}

impl FromStr for StaticGovernance {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Governance for StaticGovernance {
    fn stage_config(&self, stage: Stage) -> ConfigResult<&StageConfig> {
        self.stages.get(&stage).ok_or_else(|| ConfigError::Missing {
            stage,
            key: format!(".riftrc.{}", stage.index()),
        })
    }
}

fn default_governance_version() -> String {
    "1.0.0".to_string()
}
