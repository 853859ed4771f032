use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::config::{parse_switch, ConfigError, ConfigResult, ConfigSection, Stage};

/// Main output representation of the renderer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum OutputFormat {
    /// Canonical indented S-expression.
    #[default]
    #[strum(serialize = "LISP_STYLE_AST")]
    #[serde(rename = "LISP_STYLE_AST")]
    LispStyleAst,
    #[strum(serialize = "JSON")]
    #[serde(rename = "JSON")]
    Json,
}

// Recognised in OUTPUT_FORMATS but produce no output.
const IGNORED_FORMATS: [&str; 2] = ["C_CODE", "DOT_GRAPH"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    pub indent_width: usize,
    pub primary_format: OutputFormat,
    /// Attach a JSON export of the tree next to the primary text.
    pub json_export: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            primary_format: OutputFormat::LispStyleAst,
            json_export: false,
        }
    }
}

impl RendererConfig {
    /// Reads `primary_format`, `secondary_format`, `debug_format` and
    /// `json_export`; keys that are absent keep their defaults.
    pub fn from_section(section: &ConfigSection) -> ConfigResult<Self> {
        let mut config = Self::default();
        let invalid = |key: &str, value: &str| ConfigError::InvalidValue {
            stage: Stage::Renderer,
            key: key.to_string(),
            value: value.to_string(),
        };

        if let Some(value) = section.get("primary_format") {
            config.primary_format = value
                .trim()
                .parse()
                .map_err(|_| invalid("primary_format", value))?;
        }

        for key in ["secondary_format", "debug_format"] {
            if let Some(value) = section.get(key) {
                let value = value.trim();
                if value.parse::<OutputFormat>().is_err() && !IGNORED_FORMATS.contains(&value) {
                    return Err(invalid(key, value));
                }
                debug!("Ignoring {} {}", key, value);
            }
        }

        if let Some(value) = section.get("json_export") {
            config.json_export = parse_switch(value).ok_or_else(|| invalid("json_export", value))?;
        }

        Ok(config)
    }
}
