//! Telegram bot integration and handlers

pub mod bot;
pub mod flow;
pub mod handlers;
pub mod keyboard;
pub mod transport;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use flow::{ChoiceOutcome, UploadFlow, VideoUpload};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use transport::{ChatTransport, TelegramTransport};
