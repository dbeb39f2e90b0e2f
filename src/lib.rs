//! Terminal front end for the `/ask` question-answering backend.

pub mod client;
pub mod config;
pub mod errors;
pub mod terminal;

pub use client::{HttpAskClient, StatusReport};
pub use config::AppConfig;
pub use errors::AppError;
pub use terminal::{ask_once, TerminalSession};
