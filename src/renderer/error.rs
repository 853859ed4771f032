use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
