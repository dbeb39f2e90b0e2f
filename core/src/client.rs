use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AskError;
use crate::models::AskOptions;

/// Path of the question endpoint, appended verbatim to the configured base.
pub const ASK_PATH: &str = "/ask";

/// Path of the backend health check.
pub const STATUS_PATH: &str = "/status";

/// Joins a base address and an endpoint path. An empty base yields the bare
/// path, i.e. a URL relative to the hosting page.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{base}{path}")
}

/// One round trip to the question-answering backend.
///
/// Implementations send a single `POST {base}/ask` built from
/// [`crate::AskRequest`], return the parsed JSON body on 2xx and
/// [`AskError::Http`] with the raw body text otherwise. No retries, no timeout.
#[async_trait(?Send)]
pub trait AskClient {
    async fn ask(&self, question: &str, options: &AskOptions) -> Result<Value, AskError>;
}
