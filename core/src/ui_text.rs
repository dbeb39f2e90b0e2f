//! Fixed strings shown by every front end.

pub const BRAND: &str = "AM/SM BOT";

pub const GREETING: &str = "Hi! I'm your company's knowledge companion. Ask me anything about projects, updates, changes, or history — I've got it all.";

pub const NEW_CHAT_GREETING: &str = "New chat started. How can I help?";

/// Bot text used when a successful response carries no usable answer.
pub const EMPTY_ANSWER_FALLBACK: &str = "I couldn't find that in the current dataset.";

/// Prefix of the bot turn created from a failed request.
pub const ERROR_PREFIX: &str = "Error: ";

pub const NEW_CHAT_LABEL: &str = "+ New Chat";

pub const HISTORY_TITLE: &str = "Conversation History";

pub const HISTORY_PLACEHOLDER: &str = "(Your recent questions will appear here in a future update.)";

pub const HINT_TITLE: &str = "Need live info?";

pub const HINT_BODY: &str = "Add any of these words to your question to trigger web search:";

/// Informational only; the client never inspects questions for these.
pub const WEB_HINT_KEYWORDS: [&str; 7] = ["today", "latest", "this week", "breaking", "current", "news", "2025"];

pub const HINT_EXAMPLE: &str = "Example: \"latest guidance on GA4 consent banners\"";

pub const INPUT_PLACEHOLDER: &str = "Ask about your data… (try \"top countries last 7 days\")";

pub const SEND_LABEL: &str = "Send";

pub const SENDING_LABEL: &str = "Sending…";

pub fn send_button_label(sending: bool) -> &'static str {
    if sending {
        SENDING_LABEL
    } else {
        SEND_LABEL
    }
}
