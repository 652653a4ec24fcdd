//! Per-chat upload sessions
//!
//! A session lives from the moment a video arrives until the user picks a
//! format, cancels, or lets the deadline pass. Each chat has at most one
//! session; starting a new one replaces the old one.
//!
//! Every session carries a generation number and a cancellation token for its
//! deadline timer. The timer only acts when the session it was armed for is
//! still the current one, so a late timer can never end a newer session.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use strum::Display;
use teloxide::types::{ChatId, MessageId};
use tokio_util::sync::CancellationToken;

/// Conversation state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    /// Video received, staging in progress
    AwaitingUpload,
    /// Format menu shown, waiting for a choice
    AwaitingChoice,
    /// Session finished; never stored in the registry
    Terminal,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionEnd {
    End,
    Timeout,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub chat_id: ChatId,
    pub generation: u64,
    pub state: SessionState,
    /// Staged input format, known once the upload has been accepted
    pub input_format: Option<String>,
    /// Status message carrying the format menu
    pub menu_message: Option<MessageId>,
    pub started_at: Instant,
    deadline: CancellationToken,
}

impl Session {
    /// Token cancelled when the session ends before its deadline
    pub fn deadline(&self) -> &CancellationToken {
        &self.deadline
    }
}

/// Returned by [`SessionRegistry::begin`]
#[derive(Debug)]
pub struct SessionTicket {
    pub generation: u64,
    pub deadline: CancellationToken,
    /// Session that was still open in this chat and got replaced
    pub replaced: Option<Session>,
}

/// Registry of open sessions, keyed by chat
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<ChatId, Session>>,
    next_generation: Arc<AtomicU64>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `chat_id` in `AwaitingUpload`.
    ///
    /// An existing session in the same chat is replaced and its deadline
    /// cancelled; the caller decides what to do with its staged file.
    pub fn begin(&self, chat_id: ChatId, input_format: &str) -> SessionTicket {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let deadline = CancellationToken::new();
        let session = Session {
            chat_id,
            generation,
            state: SessionState::AwaitingUpload,
            input_format: Some(input_format.to_string()),
            menu_message: None,
            started_at: Instant::now(),
            deadline: deadline.clone(),
        };

        let replaced = self.sessions.insert(chat_id, session);
        if let Some(ref old) = replaced {
            old.deadline.cancel();
            log::info!(
                "🔁 Session {} in chat {} replaced by a new upload (was {})",
                old.generation,
                chat_id,
                old.state
            );
        }
        log::info!("🆕 Session {} opened in chat {}", generation, chat_id);

        SessionTicket {
            generation,
            deadline,
            replaced,
        }
    }

    /// Move the session to `AwaitingChoice` once the menu is on screen.
    ///
    /// Returns false when the session was replaced or ended meanwhile.
    pub fn await_choice(&self, chat_id: ChatId, generation: u64, menu_message: MessageId) -> bool {
        match self.sessions.get_mut(&chat_id) {
            Some(mut session) if session.generation == generation => {
                session.state = SessionState::AwaitingChoice;
                session.menu_message = Some(menu_message);
                true
            }
            _ => false,
        }
    }

    /// Current state for a chat; chats without a session report `None`
    pub fn state(&self, chat_id: ChatId) -> Option<SessionState> {
        self.sessions.get(&chat_id).map(|s| s.state)
    }

    /// Copy of the chat's open session
    pub fn get(&self, chat_id: ChatId) -> Option<Session> {
        self.sessions.get(&chat_id).map(|s| s.clone())
    }

    /// End whatever session the chat has open.
    ///
    /// The returned session is marked `Terminal` and its deadline cancelled.
    pub fn finish(&self, chat_id: ChatId, end: SessionEnd) -> Option<Session> {
        let (_, session) = self.sessions.remove(&chat_id)?;
        Some(Self::close(session, end))
    }

    /// End the session only if it is still generation `generation`.
    ///
    /// Used by deadline timers and by staging failures so they never end a
    /// session that replaced the one they belong to.
    pub fn finish_generation(&self, chat_id: ChatId, generation: u64, end: SessionEnd) -> Option<Session> {
        let (_, session) = self.sessions.remove_if(&chat_id, |_, s| s.generation == generation)?;
        Some(Self::close(session, end))
    }

    /// End the session only if it staged `input_format`.
    ///
    /// Buttons left on the menu of a replaced session name the old format;
    /// pressing one must not end the session that replaced it.
    pub fn finish_for_input(&self, chat_id: ChatId, input_format: &str, end: SessionEnd) -> Option<Session> {
        let (_, session) = self
            .sessions
            .remove_if(&chat_id, |_, s| s.input_format.as_deref() == Some(input_format))?;
        Some(Self::close(session, end))
    }

    /// Whether `generation` is still the chat's open session
    pub fn is_current(&self, chat_id: ChatId, generation: u64) -> bool {
        self.sessions
            .get(&chat_id)
            .map(|s| s.generation == generation)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn close(mut session: Session, end: SessionEnd) -> Session {
        session.deadline.cancel();
        log::info!(
            "🏁 Session {} in chat {} ended: {} after {:.1}s in {}",
            session.generation,
            session.chat_id,
            end,
            session.started_at.elapsed().as_secs_f64(),
            session.state
        );
        session.state = SessionState::Terminal;
        session
    }
}
