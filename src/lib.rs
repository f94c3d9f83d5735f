//! # Resize Telegram Bot
//!
//! A Telegram bot that takes an image, asks for target dimensions such as
//! `128x128`, and sends back a resized copy for each requested size.

pub mod bot;
pub mod config;
pub mod content_type;
pub mod dimensions;
pub mod errors;
pub mod filename;
pub mod health;
pub mod localization;
pub mod resizer;
pub mod session;
