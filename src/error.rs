use smol_str::SmolStr;

/// Errors for the fallible, non-lookup paths of the crate.
///
/// Lookups never produce these; a missing chunk, position, stage or view is
/// reported as `None`.
#[derive(Debug, thiserror::Error)]
pub enum ChromaError {
    #[error("Unknown stage: {0}")]
    UnknownStage(SmolStr),
    #[error("Unknown view '{view}' in stage '{stage}'")]
    UnknownView { stage: SmolStr, view: SmolStr },
    #[error("Invalid block state '{input}': {reason}")]
    InvalidBlockState { input: String, reason: String },
    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChromaError>;
