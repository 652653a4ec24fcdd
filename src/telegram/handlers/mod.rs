//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! The handlers are thin: they extract what they need from the update and
//! hand it to [`crate::telegram::flow::UploadFlow`].

mod commands;
mod schema;
mod types;
mod uploads;

pub use commands::usage_text;
pub use schema::schema;
pub use types::{callback_origin, HandlerDeps, HandlerError};
