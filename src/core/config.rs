//! Configuration read from the environment

use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Custom Bot API server URL (local telegram-bot-api for large files)
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_API_URL").ok());

/// Directory holding staged uploads
/// Read from INPUT_MEDIA_DIR environment variable
/// Supports tilde (~) expansion for home directory
/// Default: ./input_media
pub static INPUT_MEDIA_DIR: Lazy<String> =
    Lazy::new(|| env::var("INPUT_MEDIA_DIR").unwrap_or_else(|_| "./input_media".to_string()));

/// Directory holding converted files until they are sent
/// Read from OUTPUT_MEDIA_DIR environment variable
/// Default: ./output_media
pub static OUTPUT_MEDIA_DIR: Lazy<String> =
    Lazy::new(|| env::var("OUTPUT_MEDIA_DIR").unwrap_or_else(|_| "./output_media".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: vidrelay.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "vidrelay.log".to_string()));

/// Link shown to users when a conversion fails
/// Read from SUPPORT_URL environment variable
pub static SUPPORT_URL: Lazy<String> = Lazy::new(|| {
    env::var("SUPPORT_URL").unwrap_or_else(|_| "https://github.com/tjtanjin/simple-media-converter".to_string())
});

/// Session configuration
pub mod session {
    use once_cell::sync::Lazy;
    use std::env;
    use std::time::Duration;

    /// Seconds a session waits for the user before it is dropped
    /// Read from SESSION_TIMEOUT_SECS environment variable
    /// Default: 300 seconds (5 minutes)
    pub static TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("SESSION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(300)
    });

    /// Session timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(*TIMEOUT_SECS)
    }
}

/// ffmpeg configuration
pub mod ffmpeg {
    use once_cell::sync::Lazy;
    use std::env;
    use std::time::Duration;

    /// ffmpeg binary path
    /// Read from FFMPEG_BIN environment variable or defaults to "ffmpeg"
    pub static BIN: Lazy<String> = Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

    /// Upper bound for a single conversion
    /// Read from FFMPEG_TIMEOUT_SECS environment variable
    /// Default: 600 seconds (10 minutes)
    pub static TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("FFMPEG_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(600)
    });

    /// Conversion timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(*TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Large enough for uploading converted videos back to the chat
    pub const REQUEST_TIMEOUT_SECS: u64 = 600;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Per-run settings for the conversion flow.
///
/// Built from the environment in production via [`Settings::from_env`];
/// tests construct it directly to point at temporary directories.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub session_timeout: Duration,
    pub support_url: String,
}

impl Settings {
    /// Snapshot of the environment-driven configuration
    pub fn from_env() -> Self {
        Self {
            input_dir: expand_dir(&INPUT_MEDIA_DIR),
            output_dir: expand_dir(&OUTPUT_MEDIA_DIR),
            session_timeout: session::timeout(),
            support_url: SUPPORT_URL.clone(),
        }
    }

    /// Logs the effective configuration at startup
    pub fn log_summary(&self) {
        log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        log::info!("📁 Input media dir:  {}", self.input_dir.display());
        log::info!("📁 Output media dir: {}", self.output_dir.display());
        log::info!("⏱️  Session timeout:  {}s", self.session_timeout.as_secs());
        log::info!("🎬 ffmpeg:           {} (limit {}s)", ffmpeg::BIN.as_str(), *ffmpeg::TIMEOUT_SECS);
        if let Some(url) = BOT_API_URL.as_deref() {
            log::info!("🌐 Bot API URL:      {}", url);
        }
        log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
}

fn expand_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}
