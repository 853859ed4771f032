//! # Renderer Stage
//!
//! Last stage of the pipeline. Produces the canonical text form of an
//! expression tree:
//!
//! ```text
//! (BinOp +
//!   (Identifier x)
//!   (BinOp *
//!     (Number 2)
//!     (Identifier y)
//!   )
//! )
//! ```
//!
//! Rendering is a read-only traversal and always yields the same text for
//! the same tree, so rendered output can be compared directly.
//!
//! The renderer stage's `OUTPUT_FORMATS` section chooses between this form
//! and a JSON dump of the tree, and can request a JSON export next to the
//! primary text.

pub mod config;
pub mod error;
pub mod json;
pub mod visitor;

use tracing::{debug, info};

use crate::ast::AstNode;
use crate::config::{ConfigResult, Governance, Stage, OUTPUT_FORMATS};
use self::config::{OutputFormat, RendererConfig};
use self::error::RenderResult;
use self::json::JsonWriter;
use self::visitor::RenderVisitor;

/// Primary text plus the optional JSON export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn from_governance<G: Governance + ?Sized>(governance: &G) -> ConfigResult<Self> {
        let stage = governance.stage_config(Stage::Renderer)?;
        let config = match stage.section(OUTPUT_FORMATS) {
            Some(section) => RendererConfig::from_section(section)?,
            None => RendererConfig::default(),
        };
        info!(
            "Stage {} loaded with SP alignment {} (governance {}, {} sections, format {})",
            stage.stage_name,
            stage.sp_alignment,
            stage.governance_version,
            stage.sections.len(),
            config.primary_format
        );
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[tracing::instrument(level = "debug", skip(self, ast))]
    pub fn render(&self, ast: &AstNode) -> RenderResult<Rendered> {
        let text = match self.config.primary_format {
            OutputFormat::LispStyleAst => RenderVisitor::new(self.config.indent_width).render(ast)?,
            OutputFormat::Json => JsonWriter::pretty().write(ast)?,
        };
        let json = if self.config.json_export {
            Some(JsonWriter::compact().write(ast)?)
        } else {
            None
        };
        debug!("Rendered {} bytes", text.len());
        Ok(Rendered { text, json })
    }
}

/// Canonical S-expression form of `ast`.
pub fn render(ast: &AstNode) -> RenderResult<String> {
    RenderVisitor::new(RendererConfig::default().indent_width).render(ast)
}

/// Canonical form wrapped in an `(AST ...)` envelope, one level deeper.
pub fn render_document(ast: &AstNode) -> RenderResult<String> {
    RenderVisitor::new(RendererConfig::default().indent_width).render_document(ast)
}
