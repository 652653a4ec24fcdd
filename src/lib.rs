//! vidrelay - Telegram bot that converts uploaded videos to another format
//!
//! A user sends a video, picks a target format from an inline keyboard and
//! gets the converted file back as a document.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, per-chat sessions
//! - `conversion`: format catalog and the ffmpeg-backed engine
//! - `storage`: chat-scoped staging of input/output files
//! - `telegram`: transport, keyboards, the upload flow and dispatcher schema

pub mod cli;
pub mod conversion;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use conversion::{ConversionEngine, FfmpegEngine};
pub use core::{config, AppError, AppResult, Settings};
pub use storage::MediaStore;
pub use telegram::{schema, HandlerDeps, UploadFlow};
