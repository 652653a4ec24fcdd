//! Scripted conversion engine
//!
//! Records every conversion request. On success it writes a placeholder
//! output file where the real engine would put its result.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use teloxide::types::ChatId;
use vidrelay::conversion::{ConversionEngine, ConversionError, ConversionResult};
use vidrelay::MediaStore;

/// What the engine does when asked to convert
#[derive(Debug, Clone)]
pub enum EngineBehavior {
    Succeed,
    Fail(String),
}

pub struct MockEngine {
    store: MediaStore,
    behavior: Mutex<EngineBehavior>,
    calls: Mutex<Vec<(ChatId, String, String)>>,
}

impl MockEngine {
    pub fn new(store: MediaStore) -> Self {
        Self {
            store,
            behavior: Mutex::new(EngineBehavior::Succeed),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_behavior(&self, behavior: EngineBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn calls(&self) -> Vec<(ChatId, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversionEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, chat_id: ChatId, input_format: &str, output_format: &str) -> ConversionResult<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .push((chat_id, input_format.to_string(), output_format.to_string()));

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            EngineBehavior::Succeed => {
                let output = self.store.output_path(chat_id, output_format);
                tokio::fs::write(&output, b"fake converted payload").await?;
                Ok(output)
            }
            EngineBehavior::Fail(reason) => Err(ConversionError::FfmpegError(reason)),
        }
    }
}
