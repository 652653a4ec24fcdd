//! Upload → choose format → convert → deliver
//!
//! [`UploadFlow`] drives one chat through its session:
//!
//! 1. A video arrives: open a session, stage the file, show the format menu.
//! 2. A format is picked: convert, send the result, clean up.
//! 3. Or the user cancels, or the deadline passes: clean up and end.
//!
//! Faults never escape the flow. They are logged and the user gets a generic
//! notice pointing to the support link; a missing staged file is an expected
//! outcome and is reported as such.

use std::path::PathBuf;
use std::sync::Arc;
use teloxide::types::{CallbackQueryId, ChatId, FileId, Message, MessageId};
use tokio_util::sync::CancellationToken;

use super::keyboard::{is_valid_format_token, video_conversion_options, ConversionChoice};
use super::transport::ChatTransport;
use crate::conversion::{ConversionEngine, VideoFormat};
use crate::core::config::Settings;
use crate::core::error::{AppError, AppResult};
use crate::core::session::{SessionEnd, SessionRegistry, SessionState};
use crate::storage::MediaStore;

pub const PREPARING_TEXT: &str = "Video file detected. Preparing file...";
pub const CHOOSE_FORMAT_TEXT: &str = "Please select the file type to convert to:";
pub const FILE_NOT_FOUND_TEXT: &str = "File not found, please upload again.";
pub const DELIVERY_CAPTION: &str = "Here is your file!";
pub const TIMEOUT_TEXT: &str = "Your session has timed out, please send your file again.";
pub const CANCELLED_TEXT: &str = "Operation cancelled.";
pub const NOTHING_TO_CANCEL_TEXT: &str = "There is nothing to cancel.";
pub const REPLACED_TEXT: &str = "A newer file replaced this one. Please use the latest menu.";
pub const UNSUPPORTED_UPLOAD_TEXT: &str =
    "Sorry, I can't tell what format this video is in. Please send it as an .mp4, .mkv, .mov or similar file.";

pub fn converting_text(input_format: &str, output_format: &str) -> String {
    format!("Converting {} file to {}...", input_format, output_format)
}

pub fn converted_text(output_format: &str) -> String {
    format!("Converted to {} format. Retrieving file...", output_format)
}

/// HTML notice shown instead of any fault detail
pub fn error_notice(support_url: &str) -> String {
    format!(
        "An error has occurred. Please open an issue at our <a href=\"{}\">Project Repository</a>!",
        support_url
    )
}

/// A video upload reduced to what the flow needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUpload {
    pub file_id: FileId,
    pub input_format: String,
}

impl VideoUpload {
    /// Extract the file id and input format from a video message.
    ///
    /// The format is the MIME subtype ("mp4" from "video/mp4"), falling back
    /// to the file name extension.
    pub fn from_message(msg: &Message) -> AppResult<Self> {
        let video = msg
            .video()
            .ok_or_else(|| AppError::Unsupported("message has no video".to_string()))?;

        let input_format = video
            .mime_type
            .as_ref()
            .map(mime_subtype)
            .or_else(|| {
                video
                    .file_name
                    .as_ref()
                    .and_then(|f| f.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()))
            })
            .ok_or_else(|| AppError::Unsupported("video without MIME type or file extension".to_string()))?;

        if !is_valid_format_token(&input_format) {
            return Err(AppError::Unsupported(format!("video format '{}'", input_format)));
        }

        Ok(Self {
            file_id: video.file.id.clone(),
            input_format,
        })
    }
}

fn mime_subtype(mime: &mime::Mime) -> String {
    mime.subtype().as_str().to_ascii_lowercase()
}

/// Result of a format choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// Converted file sent to the chat
    Delivered { output: PathBuf },
    /// Staged input was gone; user asked to upload again
    InputMissing,
    /// Some step faulted; user got the generic notice
    Failed,
}

#[derive(Clone)]
pub struct UploadFlow {
    transport: Arc<dyn ChatTransport>,
    engine: Arc<dyn ConversionEngine>,
    store: MediaStore,
    sessions: SessionRegistry,
    settings: Arc<Settings>,
}

impl UploadFlow {
    pub fn new(transport: Arc<dyn ChatTransport>, engine: Arc<dyn ConversionEngine>, settings: Settings) -> Self {
        let store = MediaStore::new(settings.input_dir.clone(), settings.output_dir.clone());
        Self {
            transport,
            engine,
            store,
            sessions: SessionRegistry::new(),
            settings: Arc::new(settings),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn store(&self) -> &MediaStore {
        &self.store
    }

    /// Tell the user an upload can't be handled; no session is opened
    pub async fn reject_upload(&self, chat_id: ChatId, reason: &AppError) {
        log::info!("Rejected upload in chat {}: {}", chat_id, reason);
        if let Err(e) = self.transport.send_text(chat_id, UNSUPPORTED_UPLOAD_TEXT).await {
            log::warn!("Failed to notify chat {} about rejected upload: {}", chat_id, e);
        }
    }

    /// Handle a received video. Returns the state the session ended up in.
    pub async fn handle_upload(&self, chat_id: ChatId, upload: VideoUpload) -> SessionState {
        let ticket = self.sessions.begin(chat_id, &upload.input_format);

        if let Some(old) = ticket.replaced.as_ref() {
            if let Some(old_format) = old
                .input_format
                .as_deref()
                .filter(|old| *old != upload.input_format)
            {
                self.store.remove_input(chat_id, old_format).await;
            }
            // Plain edit drops the old menu's buttons
            if let Some(menu) = old.menu_message {
                self.notify(chat_id, Some(menu), REPLACED_TEXT).await;
            }
        }

        self.arm_deadline(chat_id, ticket.generation, ticket.deadline.clone());

        let mut status = None;
        match self.stage_and_offer(chat_id, ticket.generation, &upload, &mut status).await {
            Ok(state) => state,
            Err(e) => {
                log::error!("Failed to stage upload for chat {}: {}", chat_id, e);
                self.report_failure(chat_id, status).await;
                self.store.remove_input(chat_id, &upload.input_format).await;
                self.sessions
                    .finish_generation(chat_id, ticket.generation, SessionEnd::End);
                SessionState::Terminal
            }
        }
    }

    async fn stage_and_offer(
        &self,
        chat_id: ChatId,
        generation: u64,
        upload: &VideoUpload,
        status: &mut Option<MessageId>,
    ) -> AppResult<SessionState> {
        let message_id = self.transport.send_text(chat_id, PREPARING_TEXT).await?;
        *status = Some(message_id);

        self.store.ensure_dirs().await?;
        let path = self.store.input_path(chat_id, &upload.input_format);
        self.transport.download_file(&upload.file_id, &path).await?;

        if !self.sessions.is_current(chat_id, generation) {
            // Deadline passed while staging; its notice is already out
            self.store.remove_input(chat_id, &upload.input_format).await;
            return Ok(SessionState::Terminal);
        }

        let keyboard = video_conversion_options(&upload.input_format);
        self.transport
            .edit_with_keyboard(chat_id, message_id, CHOOSE_FORMAT_TEXT, keyboard)
            .await?;

        if self.sessions.await_choice(chat_id, generation, message_id) {
            log::info!(
                "📨 Chat {} staged {} and is choosing a format",
                chat_id,
                path.display()
            );
            Ok(SessionState::AwaitingChoice)
        } else {
            // Deadline passed while the menu was being shown
            self.store.remove_input(chat_id, &upload.input_format).await;
            self.notify(chat_id, Some(message_id), TIMEOUT_TEXT).await;
            Ok(SessionState::Terminal)
        }
    }

    /// Handle a `video_{in}_{out}` callback.
    ///
    /// Cleanup runs on every path with whatever formats are known: those from
    /// the payload, or the session's input format when the payload was bad.
    /// A button from a replaced menu leaves the current session alone.
    pub async fn handle_choice(&self, chat_id: ChatId, callback_id: CallbackQueryId, data: &str) -> ChoiceOutcome {
        if let Err(e) = self.transport.answer_callback(callback_id).await {
            log::warn!("Failed to answer callback in chat {}: {}", chat_id, e);
        }

        let parsed = ConversionChoice::parse(data);
        let session = match &parsed {
            Ok(choice) => self
                .sessions
                .finish_for_input(chat_id, &choice.input_format, SessionEnd::End),
            Err(_) => self.sessions.finish(chat_id, SessionEnd::End),
        };
        let choice = parsed.as_ref().ok().cloned();

        let mut status = None;
        let result = match parsed {
            Ok(choice) => self.convert_and_deliver(chat_id, &choice, &mut status).await,
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Conversion failed for chat {} ({}): {}", chat_id, data, e);
                self.report_failure(chat_id, status).await;
                ChoiceOutcome::Failed
            }
        };

        let input_format = choice
            .as_ref()
            .map(|c| c.input_format.as_str())
            .or_else(|| session.as_ref().and_then(|s| s.input_format.as_deref()));
        let output_format = choice.as_ref().map(|c| c.output_format.as_str());
        self.store.cleanup(chat_id, input_format, output_format).await;

        outcome
    }

    async fn convert_and_deliver(
        &self,
        chat_id: ChatId,
        choice: &ConversionChoice,
        status: &mut Option<MessageId>,
    ) -> AppResult<ChoiceOutcome> {
        let input = choice.input_format.as_str();
        let output = choice.output_format.as_str();

        if !self.store.input_exists(chat_id, input).await {
            log::info!("Staged {} input for chat {} not found", input, chat_id);
            self.transport.send_text(chat_id, FILE_NOT_FOUND_TEXT).await?;
            return Ok(ChoiceOutcome::InputMissing);
        }

        if VideoFormat::from_mime_subtype(output).is_none() {
            return Err(AppError::Unsupported(format!("output format '{}'", output)));
        }

        let message_id = self.transport.send_text(chat_id, &converting_text(input, output)).await?;
        *status = Some(message_id);

        let output_path = self.engine.convert(chat_id, input, output).await?;

        self.transport
            .edit_text(chat_id, message_id, &converted_text(output))
            .await?;
        self.transport
            .send_document(chat_id, &output_path, DELIVERY_CAPTION)
            .await?;

        log::info!("✅ Delivered {} to chat {} via {}", output, chat_id, self.engine.name());
        Ok(ChoiceOutcome::Delivered { output: output_path })
    }

    /// Cancel the chat's session from the menu button or `/cancel`.
    ///
    /// `message_id` is the message to rewrite (the menu the button sits on);
    /// without it the session's own menu is used, or a new message is sent.
    /// Returns whether a session was open.
    pub async fn handle_cancel(
        &self,
        chat_id: ChatId,
        callback_id: Option<CallbackQueryId>,
        message_id: Option<MessageId>,
    ) -> bool {
        if let Some(id) = callback_id {
            if let Err(e) = self.transport.answer_callback(id).await {
                log::warn!("Failed to answer cancel callback in chat {}: {}", chat_id, e);
            }
        }

        let session = self.sessions.finish(chat_id, SessionEnd::Cancel);
        let (text, target) = match &session {
            Some(s) => {
                self.store.cleanup(chat_id, s.input_format.as_deref(), None).await;
                (CANCELLED_TEXT, message_id.or(s.menu_message))
            }
            None => (NOTHING_TO_CANCEL_TEXT, message_id),
        };

        self.notify(chat_id, target, text).await;
        session.is_some()
    }

    /// Deadline handler. Only acts if `generation` is still the chat's session.
    pub async fn handle_timeout(&self, chat_id: ChatId, generation: u64) -> bool {
        let Some(session) = self
            .sessions
            .finish_generation(chat_id, generation, SessionEnd::Timeout)
        else {
            return false;
        };

        self.store
            .cleanup(chat_id, session.input_format.as_deref(), None)
            .await;
        self.notify(chat_id, session.menu_message, TIMEOUT_TEXT).await;
        true
    }

    fn arm_deadline(&self, chat_id: ChatId, generation: u64, deadline: CancellationToken) {
        let flow = self.clone();
        let timeout = self.settings.session_timeout;

        tokio::spawn(async move {
            tokio::select! {
                _ = deadline.cancelled() => {
                    log::debug!("Deadline of session {} in chat {} disarmed", generation, chat_id);
                }
                _ = tokio::time::sleep(timeout) => {
                    if flow.handle_timeout(chat_id, generation).await {
                        log::info!("⌛ Session {} in chat {} timed out", generation, chat_id);
                    }
                }
            }
        });
    }

    /// Rewrite `target` with `text`, or send it as a new message
    async fn notify(&self, chat_id: ChatId, target: Option<MessageId>, text: &str) {
        let result = match target {
            Some(message_id) => self.transport.edit_text(chat_id, message_id, text).await,
            None => self.transport.send_text(chat_id, text).await.map(|_| ()),
        };
        if let Err(e) = result {
            log::warn!("Failed to notify chat {}: {}", chat_id, e);
        }
    }

    async fn report_failure(&self, chat_id: ChatId, status: Option<MessageId>) {
        let notice = error_notice(&self.settings.support_url);
        let result = match status {
            Some(message_id) => self.transport.edit_html(chat_id, message_id, &notice).await,
            None => self.transport.send_html(chat_id, &notice).await.map(|_| ()),
        };
        if let Err(e) = result {
            log::warn!("Failed to deliver error notice to chat {}: {}", chat_id, e);
        }
    }
}
