//! Conversation state and the `/ask` request contract shared by the terminal
//! and browser front ends.

pub mod client;
pub mod conversation;
pub mod errors;
pub mod events;
pub mod models;
pub mod scroll;
pub mod ui_text;

pub use client::AskClient;
pub use conversation::{Conversation, Key, KeyOutcome, PendingAsk};
pub use errors::AskError;
pub use events::{ConversationEvent, SubscriptionId};
pub use models::{AskOptions, AskRequest, AskResponse, ChatTurn, TurnRole};
pub use scroll::{ScrollRequest, Viewport};
