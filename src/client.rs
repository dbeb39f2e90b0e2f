use ask_chat_core::client::{endpoint, ASK_PATH, STATUS_PATH};
use ask_chat_core::{AskClient, AskError, AskOptions, AskRequest};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Body of `GET /status`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StatusReport {
    #[serde(default)]
    pub ok: bool,
}

/// [`AskClient`] over `reqwest`. No timeout is configured: a request runs
/// until the backend answers or the connection fails.
#[derive(Debug, Clone)]
pub struct HttpAskClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/status`.
    pub async fn status(&self) -> Result<StatusReport, AskError> {
        let url = endpoint(&self.base_url, STATUS_PATH);
        debug!(%url, "checking backend status");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(AskError::transport)?;
        read_json(resp).await
    }
}

#[async_trait(?Send)]
impl AskClient for HttpAskClient {
    async fn ask(&self, question: &str, options: &AskOptions) -> Result<Value, AskError> {
        let url = endpoint(&self.base_url, ASK_PATH);
        let body = AskRequest::new(question, options);
        debug!(%url, web = options.web, domains = options.web_domains.len(), "POST ask");

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(AskError::transport)?;
        read_json(resp).await
    }
}

/// Non-2xx bodies are returned as raw text inside [`AskError::Http`].
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, AskError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.map_err(AskError::transport)?;
        debug!(status = status.as_u16(), "backend returned an error");
        return Err(AskError::http(status.as_u16(), body));
    }

    let bytes = resp.bytes().await.map_err(AskError::transport)?;
    serde_json::from_slice(&bytes).map_err(AskError::decode)
}
