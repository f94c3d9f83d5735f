//! Conversation state machine
//!
//! A chat is idle until it sends an image, then awaits dimensions. Each
//! dimensions message fetches the pending image once and sends back one
//! resized document per requested size.

use anyhow::Result;
use std::sync::Arc;
use teloxide::types::ChatId;
use tracing::{debug, error, info, warn};

use crate::content_type::ContentType;
use crate::dimensions::{parse_dimensions, Dimensions};
use crate::errors::ResizeError;
use crate::filename::resized_file_name;
use crate::localization::{t, t_args};
use crate::resizer::ImageResizer;
use crate::session::{clear_if_current, pending_image, queue_pending, PendingImage, ResizeDialogue};

use super::gateway::{ChatGateway, OutgoingDocument};

pub const START_COMMAND: &str = "/start";

/// An inbound message, reduced to what the conversation cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Document {
        file_id: String,
        file_name: Option<String>,
        mime_type: Option<String>,
    },
    Photo {
        file_id: String,
    },
    Text(String),
    /// Stickers, voice notes and anything else without an image or text
    Unsupported,
}

/// How a dimensions message ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every requested size was sent, the pending image was cleared
    Completed,
    /// Some sizes failed, the pending image is kept for a retry
    PartiallyFailed { failed: usize },
    /// The file could not be downloaded or is not JPEG/PNG, the pending image was evicted
    Evicted,
}

/// Failure of a single dimension's resize-and-send step
#[derive(Debug)]
enum StepError {
    Resize(ResizeError),
    Send(anyhow::Error),
}

/// Routes inbound events of every chat, each through its own [`ResizeDialogue`]
pub struct Conversation<G> {
    gateway: G,
    resizer: ImageResizer,
}

impl<G: ChatGateway> Conversation<G> {
    pub fn new(gateway: G, resizer: ImageResizer) -> Self {
        Self { gateway, resizer }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Handle one inbound event for the dialogue's chat
    pub async fn handle(&self, dialogue: ResizeDialogue, event: InboundEvent) -> Result<()> {
        let chat_id = dialogue.chat_id();
        match event {
            InboundEvent::Document {
                file_id,
                file_name,
                mime_type,
            } => {
                self.handle_document(&dialogue, file_id, file_name, mime_type.as_deref())
                    .await
            }
            InboundEvent::Photo { file_id } => {
                self.queue_image(&dialogue, PendingImage::photo(file_id)).await
            }
            InboundEvent::Text(text) => self.handle_text(&dialogue, &text).await,
            InboundEvent::Unsupported => {
                debug!(chat_id = %chat_id, "Received unsupported message type");
                self.gateway.send_text(chat_id, &t("request-image")).await
            }
        }
    }

    async fn handle_document(
        &self,
        dialogue: &ResizeDialogue,
        file_id: String,
        file_name: Option<String>,
        mime_type: Option<&str>,
    ) -> Result<()> {
        let chat_id = dialogue.chat_id();
        let Some(content_type) = mime_type.and_then(ContentType::from_mime) else {
            info!(
                chat_id = %chat_id,
                file_id = %file_id,
                file_mime = mime_type.unwrap_or("<none>"),
                "Unsupported document format"
            );
            return Ok(());
        };

        let original_name = file_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| file_id.clone());
        self.queue_image(dialogue, PendingImage::document(file_id, original_name, content_type))
            .await
    }

    async fn queue_image(&self, dialogue: &ResizeDialogue, image: PendingImage) -> Result<()> {
        let chat_id = dialogue.chat_id();
        info!(
            chat_id = %chat_id,
            file_id = %image.file_id,
            original_name = %image.original_name,
            "New image queued for chat"
        );
        queue_pending(dialogue, image).await?;
        self.gateway.send_text(chat_id, &t("request-dimensions")).await
    }

    async fn handle_text(&self, dialogue: &ResizeDialogue, text: &str) -> Result<()> {
        let chat_id = dialogue.chat_id();
        if text == START_COMMAND {
            return self.gateway.send_text(chat_id, &t("greeting")).await;
        }

        let Some(pending) = pending_image(dialogue).await? else {
            return self.gateway.send_text(chat_id, &t("request-image")).await;
        };

        let dimensions = parse_dimensions(text);
        if dimensions.is_empty() {
            debug!(chat_id = %chat_id, "No dimensions found in message");
            return self.gateway.send_text(chat_id, &t("invalid-dimensions")).await;
        }

        self.run_resize_cycle(dialogue, pending, &dimensions).await?;
        Ok(())
    }

    /// Fetch the pending image once and send one resized copy per dimension
    pub async fn run_resize_cycle(
        &self,
        dialogue: &ResizeDialogue,
        pending: PendingImage,
        dimensions: &[Dimensions],
    ) -> Result<CycleOutcome> {
        let chat_id = dialogue.chat_id();
        info!(
            chat_id = %chat_id,
            file_id = %pending.file_id,
            dimensions_count = dimensions.len(),
            "Converting file for dimensions"
        );

        let file = match self.gateway.fetch_file(&pending.file_id).await {
            Ok(file) => file,
            Err(e) => {
                error!(
                    chat_id = %chat_id,
                    file_id = %pending.file_id,
                    error = %e,
                    "Can't access file, removing from queue"
                );
                clear_if_current(dialogue, &pending).await?;
                self.gateway.send_text(chat_id, &t("error-fetch-failed")).await?;
                return Ok(CycleOutcome::Evicted);
            }
        };

        let content_type = pending
            .declared_type
            .or_else(|| ContentType::from_path(&file.path))
            .or_else(|| ContentType::sniff(&file.bytes));
        let Some(content_type) = content_type else {
            warn!(
                chat_id = %chat_id,
                file_id = %pending.file_id,
                path = %file.path,
                "Unsupported image type, removing from queue"
            );
            clear_if_current(dialogue, &pending).await?;
            self.gateway.send_text(chat_id, &t("error-unsupported-type")).await?;
            return Ok(CycleOutcome::Evicted);
        };

        let bytes = Arc::new(file.bytes);
        let mut failed = 0;
        for &target in dimensions {
            debug!(chat_id = %chat_id, file_id = %pending.file_id, dimensions = %target, "Converting file");
            if let Err(e) = self
                .resize_and_send(chat_id, &pending, content_type, Arc::clone(&bytes), target)
                .await
            {
                failed += 1;
                self.report_step_failure(chat_id, &pending, content_type, target, e)
                    .await?;
            }
        }

        if failed == 0 {
            clear_if_current(dialogue, &pending).await?;
            info!(chat_id = %chat_id, file_id = %pending.file_id, "Resize cycle completed");
            Ok(CycleOutcome::Completed)
        } else {
            warn!(chat_id = %chat_id, file_id = %pending.file_id, failed, "Resize cycle finished with failures");
            Ok(CycleOutcome::PartiallyFailed { failed })
        }
    }

    async fn resize_and_send(
        &self,
        chat_id: ChatId,
        pending: &PendingImage,
        content_type: ContentType,
        bytes: Arc<Vec<u8>>,
        target: Dimensions,
    ) -> Result<(), StepError> {
        let resized = self
            .resizer
            .resize_blocking(bytes, content_type, target)
            .await
            .map_err(StepError::Resize)?;

        let document = OutgoingDocument {
            bytes: resized,
            file_name: resized_file_name(&pending.original_name, target, content_type.mime()),
            content_type,
        };
        self.gateway
            .send_document(chat_id, document)
            .await
            .map_err(StepError::Send)
    }

    async fn report_step_failure(
        &self,
        chat_id: ChatId,
        pending: &PendingImage,
        content_type: ContentType,
        target: Dimensions,
        failure: StepError,
    ) -> Result<()> {
        let dimensions = target.to_string();
        let reply = match failure {
            StepError::Resize(ResizeError::TooLarge { max_side, .. }) => {
                warn!(chat_id = %chat_id, dimensions = %target, max_side, "Requested dimensions too large");
                let max_side = max_side.to_string();
                t_args(
                    "error-too-large",
                    &[("dimensions", dimensions.as_str()), ("max_side", max_side.as_str())],
                )
            }
            StepError::Resize(ResizeError::TooManyPixels { pixels, max_pixels, .. }) => {
                warn!(
                    chat_id = %chat_id,
                    file_id = %pending.file_id,
                    dimensions = %target,
                    pixels,
                    max_pixels,
                    "Resize exceeds pixel budget"
                );
                t_args("error-too-many-pixels", &[("dimensions", dimensions.as_str())])
            }
            StepError::Resize(e) => {
                error!(
                    chat_id = %chat_id,
                    file_id = %pending.file_id,
                    content_type = %content_type,
                    dimensions = %target,
                    error = %e,
                    "Image resize failed"
                );
                t_args("error-resize-failed", &[("dimensions", dimensions.as_str())])
            }
            StepError::Send(e) => {
                error!(
                    chat_id = %chat_id,
                    file_id = %pending.file_id,
                    dimensions = %target,
                    error = %e,
                    "Failed to send resized document"
                );
                t_args("error-send-failed", &[("dimensions", dimensions.as_str())])
            }
        };
        self.gateway.send_text(chat_id, &reply).await
    }
}
