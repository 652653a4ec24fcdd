//! Media conversion engine.
//!
//! The bot never transcodes in-process: it hands a staged input file to an
//! external tool (ffmpeg) and picks up the staged output. The
//! [`ConversionEngine`] trait is the seam the upload flow talks to, so tests
//! can substitute a scripted engine.

pub mod video;

use async_trait::async_trait;
use std::path::PathBuf;
use teloxide::types::ChatId;
use thiserror::Error;

pub use video::{FfmpegEngine, MediaKind, VideoFormat};

/// Errors that can occur during conversion
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Conversion timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type ConversionResult<T> = Result<T, ConversionError>;

/// Turns the staged input of a chat into a staged output of another format.
///
/// Implementations read `{input_dir}/{chat_id}.{input_format}` and write
/// `{output_dir}/{chat_id}.{output_format}`, returning the output path.
#[async_trait]
pub trait ConversionEngine: Send + Sync {
    /// Human-readable name of this engine (e.g., "ffmpeg")
    fn name(&self) -> &str;

    /// Convert the chat's staged input into `output_format`.
    async fn convert(&self, chat_id: ChatId, input_format: &str, output_format: &str) -> ConversionResult<PathBuf>;
}

/// Check if ffmpeg is available
pub async fn check_ffmpeg(bin: &str) -> bool {
    tokio::process::Command::new(bin)
        .arg("-version")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}
