use ask_chat_core::AskError;
use thiserror::Error;

/// Failures of the terminal front end itself.
/// Request failures inside a chat session never get here; they become turns.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Terminal errors ──────────────────────────────────────────────────────
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    // ── Backend errors ───────────────────────────────────────────────────────
    #[error(transparent)]
    Ask(#[from] AskError),

    #[error("Backend at {base_url} is not ok")]
    BackendNotOk { base_url: String },

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Question cannot be empty")]
    EmptyQuestion,
}

impl AppError {
    pub fn is_backend(&self) -> bool {
        matches!(self, AppError::Ask(_) | AppError::BackendNotOk { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::EmptyQuestion)
    }
}
