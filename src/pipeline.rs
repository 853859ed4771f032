//! Stage wiring: source text in, rendered tree out.

use serde::Serialize;
use tracing::{debug, info};

use crate::analyzer;
use crate::config::{Governance, Stage};
use crate::coordinator::AstCoordinator;
use crate::error::PipelineResult;
use crate::renderer::Renderer;
use crate::tokenizer::token::Tokenizer;

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOutput {
    /// Primary rendering of the optimized tree.
    pub text: String,
    /// JSON export of the optimized tree, when enabled.
    pub json: Option<String>,
    pub token_count: usize,
    pub node_count: usize,
    pub nodes_before_optimization: usize,
    pub applied_passes: Vec<&'static str>,
}

/// The four stages built from one governance store.
///
/// Construction reads every stage configuration once; [`Pipeline::run`] can
/// then be called for any number of inputs.
#[derive(Debug)]
pub struct Pipeline {
    tokenizer: Tokenizer,
    coordinator: AstCoordinator,
    renderer: Renderer,
}

impl Pipeline {
    pub fn new(tokenizer: Tokenizer, coordinator: AstCoordinator, renderer: Renderer) -> Self {
        Self {
            tokenizer,
            coordinator,
            renderer,
        }
    }

    pub fn from_governance<G: Governance + ?Sized>(governance: &G) -> PipelineResult<Self> {
        let tokenizer = Tokenizer::from_governance(governance)?;

        // The grammar is fixed; the parser configuration is informational.
        match governance.stage_config(Stage::Parser) {
            Ok(config) => info!(
                "Stage {} loaded with SP alignment {} (governance {}, {} sections)",
                config.stage_name,
                config.sp_alignment,
                config.governance_version,
                config.sections.len()
            ),
            Err(e) => debug!("No parser configuration: {}", e),
        }

        let coordinator = AstCoordinator::from_governance(governance)?;
        let renderer = Renderer::from_governance(governance)?;
        Ok(Self::new(tokenizer, coordinator, renderer))
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn coordinator_mut(&mut self) -> &mut AstCoordinator {
        &mut self.coordinator
    }

    /// Runs every stage in order. The first failing stage ends the run.
    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn run(&self, source: &str) -> PipelineResult<RenderedOutput> {
        let tokens = self.tokenizer.tokenize(source)?;
        let token_count = tokens.len();

        let ast = analyzer::parse(tokens)?;
        let coordinated = self.coordinator.coordinate(ast);
        let rendered = self.renderer.render(&coordinated.ast)?;

        info!(
            "Pipeline complete: {} tokens, {} -> {} nodes",
            token_count, coordinated.nodes_before, coordinated.node_count
        );
        Ok(RenderedOutput {
            text: rendered.text,
            json: rendered.json,
            token_count,
            node_count: coordinated.node_count,
            nodes_before_optimization: coordinated.nodes_before,
            applied_passes: coordinated.applied_passes,
        })
    }
}

/// Builds the stages from `governance` and runs `source` through them once.
pub fn run_pipeline<G: Governance + ?Sized>(
    source: &str,
    governance: &G,
) -> PipelineResult<RenderedOutput> {
    Pipeline::from_governance(governance)?.run(source)
}
