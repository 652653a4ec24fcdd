//! Video container conversion
//!
//! Provides:
//! - The catalog of output formats offered to users
//! - Mapping from declared MIME subtypes to catalog entries
//! - `FfmpegEngine`, the production [`ConversionEngine`]

use async_trait::async_trait;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use teloxide::types::ChatId;
use tokio::process::Command;

use super::{ConversionEngine, ConversionError, ConversionResult};
use crate::core::process::run_with_timeout;
use crate::storage::MediaStore;

/// Kind of media a choice callback refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Video,
}

/// Supported video output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VideoFormat {
    Mp4,
    Mkv,
    Mov,
    Avi,
    Webm,
    Flv,
    Wmv,
    Gif,
}

impl VideoFormat {
    /// Resolve a MIME subtype ("mp4", "quicktime", "x-matroska") to a catalog entry
    pub fn from_mime_subtype(subtype: &str) -> Option<Self> {
        let normalized = subtype.trim().to_ascii_lowercase();
        let alias = match normalized.as_str() {
            "quicktime" => "mov",
            "x-matroska" => "mkv",
            "x-msvideo" | "msvideo" => "avi",
            "x-flv" => "flv",
            "x-ms-wmv" => "wmv",
            other => other,
        };
        Self::from_str(alias).ok()
    }

    /// Output formats offered for a given input format.
    ///
    /// The input's own format is left out; unknown inputs get the full catalog.
    pub fn targets_for(input_format: &str) -> Vec<Self> {
        let input = Self::from_mime_subtype(input_format);
        Self::iter().filter(|f| Some(*f) != input).collect()
    }

    /// Encoder arguments placed between the input and the output path
    fn codec_args(self) -> &'static [&'static str] {
        match self {
            Self::Mp4 | Self::Mov => &[
                "-c:v",
                "libx264",
                "-preset",
                "fast",
                "-crf",
                "23",
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                "aac",
                "-b:a",
                "192k",
                "-movflags",
                "+faststart",
            ],
            Self::Mkv => &["-c:v", "libx264", "-preset", "fast", "-crf", "23", "-c:a", "aac", "-b:a", "192k"],
            Self::Flv => &["-c:v", "libx264", "-preset", "fast", "-crf", "23", "-c:a", "aac", "-b:a", "128k", "-ar", "44100"],
            Self::Avi => &["-c:v", "mpeg4", "-q:v", "5", "-c:a", "libmp3lame", "-b:a", "192k"],
            Self::Webm => &["-c:v", "libvpx-vp9", "-crf", "32", "-b:v", "0", "-c:a", "libopus", "-b:a", "128k"],
            Self::Wmv => &["-c:v", "wmv2", "-b:v", "2M", "-c:a", "wmav2", "-b:a", "192k"],
            // Single pass palette: better colors than the default GIF encoder
            Self::Gif => &[
                "-filter_complex",
                "fps=15,scale=480:-1:flags=lanczos,split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse",
                "-an",
                "-loop",
                "0",
            ],
        }
    }
}

/// Converts staged videos by shelling out to ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    store: MediaStore,
    ffmpeg_bin: String,
    timeout: Duration,
}

impl FfmpegEngine {
    pub fn new(store: MediaStore, ffmpeg_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            store,
            ffmpeg_bin: ffmpeg_bin.into(),
            timeout,
        }
    }

    fn build_command(&self, input: &std::path::Path, output: &std::path::Path, format: VideoFormat) -> Command {
        let mut cmd = Command::new(&self.ffmpeg_bin);
        cmd.args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(input)
            .args(format.codec_args())
            .arg(output);
        cmd
    }
}

#[async_trait]
impl ConversionEngine for FfmpegEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn convert(&self, chat_id: ChatId, input_format: &str, output_format: &str) -> ConversionResult<PathBuf> {
        let format = VideoFormat::from_mime_subtype(output_format)
            .ok_or_else(|| ConversionError::UnsupportedFormat(output_format.to_string()))?;

        let input = self.store.input_path(chat_id, input_format);
        if !self.store.input_exists(chat_id, input_format).await {
            return Err(ConversionError::InputNotFound(input.display().to_string()));
        }

        self.store.ensure_dirs().await?;
        let output = self.store.output_path(chat_id, output_format);

        log::info!(
            "🎬 Converting {} -> {} for chat {} ({})",
            input.display(),
            output.display(),
            chat_id,
            format
        );

        let mut cmd = self.build_command(&input, &output, format);
        let result = run_with_timeout(&mut cmd, self.timeout).await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            log::error!("FFmpeg conversion error: {}", stderr);
            return Err(ConversionError::FfmpegError(stderr.to_string()));
        }

        Ok(output)
    }
}
