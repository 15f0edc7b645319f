use postloom_db::DbError;
use postloom_llm::GatewayError;
use thiserror::Error;

/// Errors surfaced by the brief pipeline.
///
/// `Validation`, `NotFound`, and `Persistence` abort the run before any model
/// call; `Gateway` and `InvalidStrategy` abort it after the brief row exists
/// (the row is moved to `error` first). Per-entry copy failures are absorbed
/// by the orchestrator and never appear here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("brand not found or unauthorized")]
    NotFound,

    #[error("LLM gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("invalid strategy response: {0}")]
    InvalidStrategy(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] DbError),
}
