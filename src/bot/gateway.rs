//! Outbound side of the bot: replies and file downloads
//!
//! The conversation logic only talks to [`ChatGateway`]; [`TelegramGateway`]
//! implements it on top of a teloxide [`Bot`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, ParseMode};
use tracing::debug;

use crate::content_type::ContentType;

/// A resized image ready to be sent back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: ContentType,
}

/// A file downloaded from the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub bytes: Vec<u8>,
    /// Platform-side path, its extension hints at the content type
    pub path: String,
}

#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send a MarkdownV2 text reply
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;

    async fn send_document(&self, chat_id: ChatId, document: OutgoingDocument) -> Result<()>;

    /// Download a file by platform file id
    async fn fetch_file(&self, file_id: &str) -> Result<FetchedFile>;
}

/// [`ChatGateway`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
    http: reqwest::Client,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatGateway for TelegramGateway {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, document: OutgoingDocument) -> Result<()> {
        debug!(
            chat_id = %chat_id,
            file_name = %document.file_name,
            content_type = %document.content_type,
            size = document.bytes.len(),
            "Sending resized document"
        );
        let input = InputFile::memory(document.bytes).file_name(document.file_name);
        self.bot.send_document(chat_id, input).await?;
        Ok(())
    }

    async fn fetch_file(&self, file_id: &str) -> Result<FetchedFile> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .with_context(|| format!("Telegram refused file {file_id}"))?;

        let url = format!(
            "https://api.telegram.org/file/bot{}/{}",
            self.bot.token(),
            file.path
        );

        // Strip the URL from errors, it embeds the bot token
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?;
        let bytes = response.bytes().await.map_err(reqwest::Error::without_url)?;
        debug!(file_id, path = %file.path, size = bytes.len(), "File downloaded");

        Ok(FetchedFile {
            bytes: bytes.to_vec(),
            path: file.path,
        })
    }
}
