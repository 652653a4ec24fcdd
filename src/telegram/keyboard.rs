//! Format-choice keyboard and its callback payloads
//!
//! Each format button carries `{kind}_{input}_{output}` (e.g. `video_mp4_avi`),
//! which is all the choice handler needs to locate the staged input and run
//! the conversion. A trailing row holds the cancel button.

use lazy_regex::regex_captures;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::conversion::{MediaKind, VideoFormat};
use crate::core::error::{AppError, AppResult};

/// Payload of the cancel button
pub const CANCEL_CALLBACK: &str = "cancel";

/// Prefix shared by every video choice payload
pub const VIDEO_CALLBACK_PREFIX: &str = "video_";

/// Telegram rejects callback_data longer than this (bytes)
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

const BUTTONS_PER_ROW: usize = 3;

/// A parsed format choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionChoice {
    pub kind: MediaKind,
    pub input_format: String,
    pub output_format: String,
}

impl ConversionChoice {
    pub fn new(kind: MediaKind, input_format: impl Into<String>, output_format: impl Into<String>) -> Self {
        Self {
            kind,
            input_format: input_format.into(),
            output_format: output_format.into(),
        }
    }

    /// Encode as callback_data
    pub fn callback_data(&self) -> String {
        format!("{}_{}_{}", self.kind, self.input_format, self.output_format)
    }

    /// Decode a `video_{input}_{output}` payload
    pub fn parse(data: &str) -> AppResult<Self> {
        let (_, input, output) = regex_captures!(r"^video_([A-Za-z0-9-]+)_([A-Za-z0-9-]+)$", data)
            .ok_or_else(|| AppError::InvalidCallback(data.to_string()))?;
        Ok(Self::new(MediaKind::Video, input, output))
    }
}

/// Whether `data` belongs to the video choice handler
pub fn is_choice_callback(data: &str) -> bool {
    data.starts_with(VIDEO_CALLBACK_PREFIX)
}

/// Whether a format token can travel in callback data and be used in a file name.
///
/// Letters, digits and `-` only: no `_` (payload delimiter), no path separators.
pub fn is_valid_format_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= 24
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Build the keyboard offering `targets` for a staged `input_format`
pub fn conversion_options(kind: MediaKind, input_format: &str, targets: &[VideoFormat]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = targets
        .chunks(BUTTONS_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|target| {
                    let choice = ConversionChoice::new(kind, input_format, target.as_ref());
                    InlineKeyboardButton::callback(target.as_ref().to_uppercase(), choice.callback_data())
                })
                .collect()
        })
        .collect();

    rows.push(vec![InlineKeyboardButton::callback("❌ Cancel", CANCEL_CALLBACK)]);

    InlineKeyboardMarkup::new(rows)
}

/// Keyboard for a video upload, applying the catalog policy
pub fn video_conversion_options(input_format: &str) -> InlineKeyboardMarkup {
    conversion_options(MediaKind::Video, input_format, &VideoFormat::targets_for(input_format))
}
