use thiserror::Error;

/// Failure of a single `/ask` round trip.
/// `Display` is exactly the text shown after `"Error: "` in the chat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AskError {
    // ── HTTP errors ──────────────────────────────────────────────────────────
    #[error("API {status}: {body}")]
    Http { status: u16, body: String },

    // ── Below the HTTP layer ─────────────────────────────────────────────────
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),
}

impl AskError {
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        AskError::Http { status, body: body.into() }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        AskError::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        AskError::Decode(err.to_string())
    }

    pub fn is_http(&self) -> bool {
        matches!(self, AskError::Http { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AskError::Transport(_) | AskError::Decode(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AskError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
