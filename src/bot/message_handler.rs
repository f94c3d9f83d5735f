//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use crate::session::ResizeDialogue;

use super::conversation::{Conversation, InboundEvent};
use super::gateway::TelegramGateway;

/// Reduce a Telegram message to the event the conversation understands
pub fn classify_message(msg: &Message) -> InboundEvent {
    if let Some(text) = msg.text() {
        InboundEvent::Text(text.to_string())
    } else if let Some(largest_photo) = msg.photo().and_then(|photos| photos.last()) {
        InboundEvent::Photo {
            file_id: largest_photo.file.id.to_string(),
        }
    } else if let Some(doc) = msg.document() {
        InboundEvent::Document {
            file_id: doc.file.id.to_string(),
            file_name: doc.file_name.clone(),
            mime_type: doc.mime_type.as_ref().map(|mime| mime.to_string()),
        }
    } else {
        InboundEvent::Unsupported
    }
}

pub async fn message_handler(
    msg: Message,
    dialogue: ResizeDialogue,
    conversation: Arc<Conversation<TelegramGateway>>,
) -> Result<()> {
    let event = classify_message(&msg);
    debug!(user_id = %msg.chat.id, event = ?event, "Received message from user");
    conversation.handle(dialogue, event).await
}
