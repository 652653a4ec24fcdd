//! Helper functions for tests

#![allow(dead_code)]

use std::time::{Duration, Instant};
use teloxide::types::{ChatId, FileId};
use vidrelay::telegram::VideoUpload;

/// Chat id used across the flow tests
pub fn create_test_chat_id() -> ChatId {
    ChatId(42)
}

pub fn video_upload(input_format: &str) -> VideoUpload {
    VideoUpload {
        file_id: FileId("BAACAgIAAxkBAAIBZ2VideoFileId".to_string()),
        input_format: input_format.to_string(),
    }
}

/// Poll `condition` until it holds or `limit` passes. Returns the last result.
pub async fn wait_until(limit: Duration, condition: impl Fn() -> bool) -> bool {
    let started = Instant::now();
    while started.elapsed() < limit {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
