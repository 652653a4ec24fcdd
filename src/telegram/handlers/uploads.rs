//! Video upload and format-choice handlers

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};

use super::types::{callback_origin, HandlerDeps, HandlerError};
use crate::telegram::flow::{ChoiceOutcome, VideoUpload};
use crate::telegram::keyboard::{is_choice_callback, CANCEL_CALLBACK};

/// Entry point of a session: any message carrying a video
pub(super) fn video_upload_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.video().is_some())
        .endpoint(move |msg: Message| {
            let deps = deps.clone();
            async move {
                let chat_id = msg.chat.id;

                match VideoUpload::from_message(&msg) {
                    Ok(upload) => {
                        log::info!(
                            "🎬 Video upload in chat {} (format: {})",
                            chat_id,
                            upload.input_format
                        );
                        let state = deps.flow.handle_upload(chat_id, upload).await;
                        log::debug!("Upload in chat {} left session in {}", chat_id, state);
                    }
                    Err(e) => deps.flow.reject_upload(chat_id, &e).await,
                }
                Ok(())
            }
        })
}

/// Format buttons: `video_{input}_{output}`
pub(super) fn choice_callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query()
        .filter(|q: CallbackQuery| q.data.as_deref().map(is_choice_callback).unwrap_or(false))
        .endpoint(move |q: CallbackQuery| {
            let deps = deps.clone();
            async move {
                let (chat_id, _) = callback_origin(&q);
                let data = q.data.clone().unwrap_or_default();

                match deps.flow.handle_choice(chat_id, q.id.clone(), &data).await {
                    ChoiceOutcome::Delivered { output } => {
                        log::info!("Choice {} in chat {} delivered {}", data, chat_id, output.display())
                    }
                    ChoiceOutcome::InputMissing => log::info!("Choice {} in chat {} had no staged input", data, chat_id),
                    ChoiceOutcome::Failed => log::warn!("Choice {} in chat {} failed", data, chat_id),
                }
                Ok(())
            }
        })
}

/// Cancel button under the format menu
pub(super) fn cancel_callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query()
        .filter(|q: CallbackQuery| q.data.as_deref() == Some(CANCEL_CALLBACK))
        .endpoint(move |q: CallbackQuery| {
            let deps = deps.clone();
            async move {
                let (chat_id, message_id) = callback_origin(&q);
                deps.flow.handle_cancel(chat_id, Some(q.id.clone()), message_id).await;
                Ok(())
            }
        })
}
