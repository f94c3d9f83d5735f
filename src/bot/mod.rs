//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Turns incoming Telegram messages into conversation events
//! - `conversation`: The per-chat state machine driving resize cycles
//! - `gateway`: Outbound replies and file downloads behind a trait

pub mod conversation;
pub mod gateway;
pub mod message_handler;

// Re-export main handler functions for use in main.rs
pub use message_handler::message_handler;

pub use conversation::{Conversation, CycleOutcome, InboundEvent};
pub use gateway::{ChatGateway, FetchedFile, OutgoingDocument, TelegramGateway};
