use thiserror::Error;

use crate::conversion::ConversionError;

/// Centralized error types for the application
///
/// Every fault raised while handling an upload or a format choice is converted
/// into this enum, logged, and replaced by a generic notice for the user.
///
/// # Example
///
/// ```no_run
/// use vidrelay::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     log::error!("Conversion flow failed: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Failure while fetching an uploaded file from Telegram
    #[error("File download error: {0}")]
    Download(#[from] teloxide::DownloadError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Conversion engine errors
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Callback payload that doesn't encode a conversion choice
    #[error("Invalid callback data: {0}")]
    InvalidCallback(String),

    /// Upload or target format the bot can't handle
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
