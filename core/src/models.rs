use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Bot,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Bot => "bot",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TurnRole {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "bot" => Ok(TurnRole::Bot),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Render key, unique within one [`crate::Conversation`].
    pub id: u64,
    pub role: TurnRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(id: u64, role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            id,
            role,
            text: text.into(),
            sources: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == TurnRole::User
    }
}

/// Optional flags forwarded with every question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AskOptions {
    pub web: bool,
    pub web_domains: Vec<String>,
}

impl AskOptions {
    pub fn with_web(mut self, web: bool) -> Self {
        self.web = web;
        self
    }

    pub fn with_web_domains(mut self, domains: Vec<String>) -> Self {
        self.web_domains = domains;
        self
    }
}

/// Body of `POST /ask`.
///
/// `web` is only written when true and `web_domains` only when non-empty, so
/// the backend sees the flags as absent rather than explicitly off.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_domains: Option<&'a [String]>,
}

impl<'a> AskRequest<'a> {
    pub fn new(question: &'a str, options: &'a AskOptions) -> Self {
        Self {
            question,
            web: options.web.then_some(true),
            web_domains: (!options.web_domains.is_empty()).then_some(options.web_domains.as_slice()),
        }
    }
}

/// The fields of an `/ask` success body the front ends read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AskResponse {
    pub answer: Option<String>,
    pub sources: Vec<String>,
}

impl AskResponse {
    /// Reads `answer` and `sources` from an arbitrary JSON body. A non-string
    /// `answer` counts as missing; non-string entries in `sources` are skipped.
    pub fn from_value(body: &Value) -> Self {
        let answer = body
            .get("answer")
            .and_then(Value::as_str)
            .map(str::to_string);
        let sources = body
            .get("sources")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self { answer, sources }
    }

    /// The trimmed answer, or `None` when it is missing or blank.
    pub fn answer_text(&self) -> Option<&str> {
        self.answer
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}
