//! # Conversation State Module
//!
//! Per-chat dialogue state kept in teloxide's in-memory dialogue storage. A
//! chat is idle until it sends an image, then awaits dimensions for it.

use anyhow::Result;
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};
use tracing::{debug, info};

use crate::content_type::ContentType;

/// The most recent image submitted in a chat, waiting for resize instructions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingImage {
    /// Platform file identifier
    pub file_id: String,
    /// Name the output is derived from (the file id for photos)
    pub original_name: String,
    /// Content type announced by the platform for documents
    pub declared_type: Option<ContentType>,
}

impl PendingImage {
    pub fn document(file_id: impl Into<String>, original_name: impl Into<String>, declared_type: ContentType) -> Self {
        Self {
            file_id: file_id.into(),
            original_name: original_name.into(),
            declared_type: Some(declared_type),
        }
    }

    /// Photos carry no filename, so the file id doubles as the name
    pub fn photo(file_id: impl Into<String>) -> Self {
        let file_id = file_id.into();
        Self {
            original_name: file_id.clone(),
            file_id,
            declared_type: None,
        }
    }
}

/// Conversation state of one chat
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ResizeState {
    #[default]
    Idle,
    AwaitingDimensions(PendingImage),
}

impl ResizeState {
    pub fn pending(&self) -> Option<&PendingImage> {
        match self {
            ResizeState::Idle => None,
            ResizeState::AwaitingDimensions(image) => Some(image),
        }
    }
}

/// Type alias for the resize dialogue
pub type ResizeDialogue = Dialogue<ResizeState, InMemStorage<ResizeState>>;

/// Pending image of the dialogue's chat, if it is awaiting dimensions
pub async fn pending_image(dialogue: &ResizeDialogue) -> Result<Option<PendingImage>> {
    let state = dialogue.get().await?;
    Ok(state.as_ref().and_then(ResizeState::pending).cloned())
}

/// Record `image` as the chat's pending image, replacing any previous one
pub async fn queue_pending(dialogue: &ResizeDialogue, image: PendingImage) -> Result<()> {
    if let Some(previous) = pending_image(dialogue).await? {
        debug!(chat_id = %dialogue.chat_id(), replaced_file_id = %previous.file_id, "Pending image overwritten");
    }
    dialogue.update(ResizeState::AwaitingDimensions(image)).await?;
    Ok(())
}

/// End the dialogue if `expected` is still the chat's pending image
///
/// Returns `false` when the chat is idle or already holds a newer image, in
/// which case the state is left alone.
pub async fn clear_if_current(dialogue: &ResizeDialogue, expected: &PendingImage) -> Result<bool> {
    if pending_image(dialogue).await?.as_ref() != Some(expected) {
        debug!(chat_id = %dialogue.chat_id(), "Pending image changed, keeping the newer one");
        return Ok(false);
    }
    dialogue.exit().await?;
    info!(chat_id = %dialogue.chat_id(), file_id = %expected.file_id, "Pending image removed");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::ChatId;

    #[tokio::test]
    async fn test_queue_overwrites_previous_image() -> Result<()> {
        let storage = InMemStorage::<ResizeState>::new();
        let dialogue = ResizeDialogue::new(storage, ChatId(7));

        queue_pending(&dialogue, PendingImage::photo("first")).await?;
        queue_pending(&dialogue, PendingImage::photo("second")).await?;

        assert_eq!(
            pending_image(&dialogue).await?.map(|p| p.file_id),
            Some("second".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_if_current_keeps_newer_image() -> Result<()> {
        let storage = InMemStorage::<ResizeState>::new();
        let dialogue = ResizeDialogue::new(storage, ChatId(7));
        let old = PendingImage::photo("old");
        queue_pending(&dialogue, old.clone()).await?;
        queue_pending(&dialogue, PendingImage::document("new", "new.png", ContentType::Png)).await?;

        assert!(!clear_if_current(&dialogue, &old).await?);
        assert_eq!(
            pending_image(&dialogue).await?.map(|p| p.file_id),
            Some("new".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_if_current_on_idle_chat() -> Result<()> {
        let storage = InMemStorage::<ResizeState>::new();
        let dialogue = ResizeDialogue::new(storage, ChatId(7));

        assert!(!clear_if_current(&dialogue, &PendingImage::photo("gone")).await?);
        assert_eq!(dialogue.get().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_dialogues_share_storage_per_chat() -> Result<()> {
        let storage = InMemStorage::<ResizeState>::new();
        let first = ResizeDialogue::new(storage.clone(), ChatId(1));
        queue_pending(&first, PendingImage::photo("one")).await?;

        let again = ResizeDialogue::new(storage.clone(), ChatId(1));
        let other = ResizeDialogue::new(storage, ChatId(2));
        assert_eq!(pending_image(&again).await?, Some(PendingImage::photo("one")));
        assert_eq!(pending_image(&other).await?, None);
        Ok(())
    }

    #[test]
    fn test_photo_uses_file_id_as_name() {
        let image = PendingImage::photo("AgACAgIAAxk");
        assert_eq!(image.original_name, "AgACAgIAAxk");
        assert_eq!(image.declared_type, None);
    }
}
