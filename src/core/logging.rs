//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - ffmpeg availability check logged at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::conversion::check_ffmpeg;
use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs whether the configured ffmpeg binary can be executed
///
/// Returns the check result so callers can decide whether to continue.
pub async fn log_ffmpeg_availability() -> bool {
    let bin = config::ffmpeg::BIN.as_str();
    let available = check_ffmpeg(bin).await;
    if available {
        log::info!("✅ ffmpeg found: {}", bin);
    } else {
        log::error!("❌ ffmpeg not available: {}", bin);
        log::error!("   Every conversion will FAIL until FFMPEG_BIN points to a working ffmpeg");
    }
    available
}
