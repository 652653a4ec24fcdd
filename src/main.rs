use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use vidrelay::cli::{Cli, Commands};
use vidrelay::conversion::FfmpegEngine;
use vidrelay::core::{config, init_logger, log_ffmpeg_availability, Settings};
use vidrelay::storage::MediaStore;
use vidrelay::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, TelegramTransport, UploadFlow};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, staging directories, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before any config is read
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Check) => run_check().await,
        Some(Commands::Run) => run_bot().await,
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

/// Verify the environment the bot needs, without talking to Telegram
async fn run_check() -> Result<()> {
    let settings = Settings::from_env();
    settings.log_summary();

    let store = MediaStore::new(settings.input_dir.clone(), settings.output_dir.clone());
    store
        .ensure_dirs()
        .await
        .map_err(|e| anyhow::anyhow!("Staging directories are not usable: {}", e))?;
    log::info!("✅ Staging directories ready");

    if !log_ffmpeg_availability().await {
        return Err(anyhow::anyhow!("ffmpeg is not available"));
    }
    Ok(())
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    let settings = Settings::from_env();
    settings.log_summary();

    let store = MediaStore::new(settings.input_dir.clone(), settings.output_dir.clone());
    store.ensure_dirs().await?;

    // Conversions will fail without ffmpeg, but /start and /help still work
    log_ffmpeg_availability().await;

    let bot = create_bot()?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let engine = FfmpegEngine::new(store, config::ffmpeg::BIN.as_str(), config::ffmpeg::timeout());
    let transport = TelegramTransport::new(bot.clone());
    let flow = UploadFlow::new(Arc::new(transport), Arc::new(engine), settings);
    let handler = schema(HandlerDeps::new(flow));

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
