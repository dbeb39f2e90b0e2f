pub mod chat;
pub mod hint;
pub mod sidebar;
