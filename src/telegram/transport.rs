//! Chat transport abstraction
//!
//! The upload flow only needs a handful of Bot API calls. They are gathered
//! behind [`ChatTransport`] so the flow can be driven by a recording mock in
//! tests; [`TelegramTransport`] is the teloxide-backed implementation.

use async_trait::async_trait;
use std::path::Path;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, FileId, InlineKeyboardMarkup, InputFile, LinkPreviewOptions, MessageId, ParseMode};
use tokio::io::AsyncWriteExt;

use crate::core::error::AppResult;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a plain text message, returning its id
    async fn send_text(&self, chat_id: ChatId, text: &str) -> AppResult<MessageId>;

    /// Replace the text of a message sent earlier
    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> AppResult<()>;

    /// Replace the text of a message and attach an inline keyboard
    async fn edit_with_keyboard(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> AppResult<()>;

    /// Send an HTML message with link previews disabled
    async fn send_html(&self, chat_id: ChatId, html: &str) -> AppResult<MessageId>;

    /// Replace a message with HTML text, link previews disabled
    async fn edit_html(&self, chat_id: ChatId, message_id: MessageId, html: &str) -> AppResult<()>;

    /// Stop the client's loading indicator for a callback button
    async fn answer_callback(&self, callback_id: CallbackQueryId) -> AppResult<()>;

    /// Fetch an uploaded file into `destination`
    async fn download_file(&self, file_id: &FileId, destination: &Path) -> AppResult<()>;

    /// Send a local file as a document attachment
    async fn send_document(&self, chat_id: ChatId, path: &Path, caption: &str) -> AppResult<()>;
}

/// [`ChatTransport`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Open the staging file a download is written to; errors name the path
async fn create_destination(destination: &Path) -> std::io::Result<fs_err::tokio::File> {
    fs_err::tokio::File::create(destination).await
}

fn no_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> AppResult<MessageId> {
        let sent = self.bot.send_message(chat_id, text).await?;
        Ok(sent.id)
    }

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> AppResult<()> {
        self.bot.edit_message_text(chat_id, message_id, text).await?;
        Ok(())
    }

    async fn edit_with_keyboard(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> AppResult<()> {
        self.bot
            .edit_message_text(chat_id, message_id, text)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> AppResult<MessageId> {
        let sent = self
            .bot
            .send_message(chat_id, html)
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview())
            .await?;
        Ok(sent.id)
    }

    async fn edit_html(&self, chat_id: ChatId, message_id: MessageId, html: &str) -> AppResult<()> {
        self.bot
            .edit_message_text(chat_id, message_id, html)
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview())
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: CallbackQueryId) -> AppResult<()> {
        self.bot.answer_callback_query(callback_id).await?;
        Ok(())
    }

    async fn download_file(&self, file_id: &FileId, destination: &Path) -> AppResult<()> {
        let file = self.bot.get_file(file_id.clone()).await?;
        log::info!(
            "📥 Downloading {} ({} bytes) to {}",
            file.path,
            file.size,
            destination.display()
        );

        let mut dst = create_destination(destination).await?;
        self.bot.download_file(&file.path, &mut dst).await?;
        dst.flush().await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, path: &Path, caption: &str) -> AppResult<()> {
        self.bot
            .send_document(chat_id, InputFile::file(path.to_path_buf()))
            .caption(caption)
            .await?;
        Ok(())
    }
}
