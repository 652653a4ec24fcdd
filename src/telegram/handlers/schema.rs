//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{handle_cancel_command, handle_start_command};
use super::types::{HandlerDeps, HandlerError};
use super::uploads::{cancel_callback_handler, choice_callback_handler, video_upload_handler};
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same tree is used in production and can be used in integration tests.
///
/// # Arguments
/// * `deps` - Handler dependencies (the upload flow)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_upload = deps.clone();
    let deps_cancel = deps.clone();
    let deps_choice = deps;

    dptree::entry()
        // Command handler
        .branch(command_handler(deps_commands))
        // Video upload opens a session
        .branch(video_upload_handler(deps_upload))
        // Cancel button must be checked before format buttons
        .branch(cancel_callback_handler(deps_cancel))
        // Format choice closes it
        .branch(choice_callback_handler(deps_choice))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

                match cmd {
                    Command::Start | Command::Help => handle_start_command(&bot, &msg).await?,
                    Command::Cancel => handle_cancel_command(&msg, &deps).await?,
                }
                Ok(())
            }
        },
    ))
}
