use thiserror::Error;

use crate::analyzer::ParseError;
use crate::config::{ConfigError, Stage};
use crate::renderer::error::RenderError;
use crate::tokenizer::token::TokenizerError;

/// Any failure that aborts a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl PipelineError {
    /// The stage that failed. `None` when the governance store itself could
    /// not be read.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Config(e) => e.stage(),
            PipelineError::Tokenizer(_) => Some(Stage::Tokenizer),
            PipelineError::Parse(_) => Some(Stage::Parser),
            PipelineError::Render(_) => Some(Stage::Renderer),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
