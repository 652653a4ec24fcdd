//! Handler types and dependencies

use teloxide::types::{CallbackQuery, ChatId, MessageId};

use crate::telegram::flow::UploadFlow;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub flow: UploadFlow,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(flow: UploadFlow) -> Self {
        Self { flow }
    }
}

/// Chat and message a callback button was pressed on.
///
/// Buttons on messages too old to be accessible still report their chat;
/// as a last resort the presser's private chat is used.
pub fn callback_origin(q: &CallbackQuery) -> (ChatId, Option<MessageId>) {
    match q.message.as_ref() {
        Some(message) => (message.chat().id, Some(message.id())),
        None => (ChatId::from(q.from.id), None),
    }
}
