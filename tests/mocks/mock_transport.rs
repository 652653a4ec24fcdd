//! Recording chat transport
//!
//! Every Bot API call the flow makes is appended to a call log. Sent messages
//! get increasing message ids; downloads write a small payload to disk so the
//! staged file really exists.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use teloxide::types::{
    CallbackQueryId, ChatId, FileId, InlineKeyboardButtonKind, InlineKeyboardMarkup, MessageId,
};
use vidrelay::telegram::ChatTransport;
use vidrelay::{AppError, AppResult};

/// One recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    SendText {
        chat_id: ChatId,
        text: String,
    },
    EditText {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
    },
    EditWithKeyboard {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        callbacks: Vec<String>,
    },
    SendHtml {
        chat_id: ChatId,
        html: String,
    },
    EditHtml {
        chat_id: ChatId,
        message_id: MessageId,
        html: String,
    },
    AnswerCallback {
        id: String,
    },
    DownloadFile {
        file_id: String,
        destination: PathBuf,
    },
    SendDocument {
        chat_id: ChatId,
        path: PathBuf,
        caption: String,
    },
}

pub struct MockTransport {
    calls: Mutex<Vec<TransportCall>>,
    next_message_id: AtomicI32,
    fail_download: AtomicBool,
    fail_send_document: AtomicBool,
    download_delay_ms: AtomicU64,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_message_id: AtomicI32::new(100),
            fail_download: AtomicBool::new(false),
            fail_send_document: AtomicBool::new(false),
            download_delay_ms: AtomicU64::new(0),
        }
    }

    /// Make every following `download_file` fail
    pub fn fail_downloads(&self) {
        self.fail_download.store(true, Ordering::SeqCst);
    }

    /// Make every following `send_document` fail
    pub fn fail_documents(&self) {
        self.fail_send_document.store(true, Ordering::SeqCst);
    }

    /// Make downloads take `delay` before the file appears
    pub fn slow_downloads(&self, delay: Duration) {
        self.download_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn documents(&self) -> Vec<(PathBuf, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::SendDocument { path, caption, .. } => Some((path, caption)),
                _ => None,
            })
            .collect()
    }

    /// Every text the user would see, in order, whether sent or edited in
    pub fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::SendText { text, .. }
                | TransportCall::EditText { text, .. }
                | TransportCall::EditWithKeyboard { text, .. } => Some(text),
                TransportCall::SendHtml { html, .. } | TransportCall::EditHtml { html, .. } => Some(html),
                _ => None,
            })
            .collect()
    }

    /// Callback payloads of the last keyboard shown
    pub fn last_keyboard(&self) -> Option<Vec<String>> {
        self.calls().into_iter().rev().find_map(|call| match call {
            TransportCall::EditWithKeyboard { callbacks, .. } => Some(callbacks),
            _ => None,
        })
    }

    fn record(&self, call: TransportCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self) -> MessageId {
        MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }
}

fn callback_payloads(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
    keyboard
        .inline_keyboard
        .iter()
        .flatten()
        .filter_map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> AppResult<MessageId> {
        self.record(TransportCall::SendText {
            chat_id,
            text: text.to_string(),
        });
        Ok(self.next_id())
    }

    async fn edit_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) -> AppResult<()> {
        self.record(TransportCall::EditText {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn edit_with_keyboard(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> AppResult<()> {
        self.record(TransportCall::EditWithKeyboard {
            chat_id,
            message_id,
            text: text.to_string(),
            callbacks: callback_payloads(&keyboard),
        });
        Ok(())
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> AppResult<MessageId> {
        self.record(TransportCall::SendHtml {
            chat_id,
            html: html.to_string(),
        });
        Ok(self.next_id())
    }

    async fn edit_html(&self, chat_id: ChatId, message_id: MessageId, html: &str) -> AppResult<()> {
        self.record(TransportCall::EditHtml {
            chat_id,
            message_id,
            html: html.to_string(),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: CallbackQueryId) -> AppResult<()> {
        self.record(TransportCall::AnswerCallback { id: callback_id.0 });
        Ok(())
    }

    async fn download_file(&self, file_id: &FileId, destination: &Path) -> AppResult<()> {
        self.record(TransportCall::DownloadFile {
            file_id: file_id.0.clone(),
            destination: destination.to_path_buf(),
        });
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(AppError::Io(std::io::Error::other("simulated download failure")));
        }
        let delay = self.download_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        tokio::fs::write(destination, b"fake video payload").await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, path: &Path, caption: &str) -> AppResult<()> {
        self.record(TransportCall::SendDocument {
            chat_id,
            path: path.to_path_buf(),
            caption: caption.to_string(),
        });
        if self.fail_send_document.load(Ordering::SeqCst) {
            return Err(AppError::Io(std::io::Error::other("simulated upload failure")));
        }
        Ok(())
    }
}
