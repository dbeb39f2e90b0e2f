use ask_chat_core::client::{endpoint, ASK_PATH};
use ask_chat_core::{AskClient, AskError, AskOptions, AskRequest};
use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;

/// Base URL of the backend API server, fixed at build time.
/// Empty means requests go to the page's own origin.
pub const API_BASE: &str = match option_env!("API_BASE") {
    Some(base) => base,
    None => "",
};

/// Browser `fetch` client for `POST {base}/ask`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    pub fn from_build_env() -> Self {
        Self::new(API_BASE)
    }
}

#[async_trait(?Send)]
impl AskClient for ApiClient {
    async fn ask(&self, question: &str, options: &AskOptions) -> Result<Value, AskError> {
        let body = AskRequest::new(question, options);

        let resp = Request::post(&endpoint(&self.base_url, ASK_PATH))
            .header("Content-Type", "application/json")
            .json(&body)
            .map_err(AskError::decode)?
            .send()
            .await
            .map_err(AskError::transport)?;

        if !resp.ok() {
            let text = resp.text().await.map_err(AskError::transport)?;
            return Err(AskError::http(resp.status(), text));
        }

        resp.json::<Value>().await.map_err(AskError::decode)
    }
}
