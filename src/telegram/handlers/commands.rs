//! Command handler implementations (/start, /help, /cancel)

use indoc::formatdoc;
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::conversion::VideoFormat;
use strum::IntoEnumIterator;

/// Usage text listing the output catalog
pub fn usage_text() -> String {
    let formats = VideoFormat::iter()
        .map(|f| f.as_ref().to_uppercase())
        .collect::<Vec<_>>()
        .join(", ");

    formatdoc! {"
        Send me a video and I'll convert it for you.

        1. Send the video as a regular video message (not as a file)
        2. Pick the format you want
        3. Get the converted file back

        Supported output formats: {formats}
        Use /cancel to abort a conversion you haven't picked a format for yet."
    }
}

/// Handle /start and /help
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, usage_text()).await?;
    Ok(())
}

/// Handle /cancel
pub(super) async fn handle_cancel_command(msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    deps.flow.handle_cancel(msg.chat.id, None, None).await;
    Ok(())
}
