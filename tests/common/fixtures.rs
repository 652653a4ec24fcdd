//! Test fixtures
//!
//! [`TestEnvironment`] wires an [`UploadFlow`] to the recording transport and
//! the scripted engine, with staging directories inside a temp dir.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use vidrelay::{MediaStore, Settings, UploadFlow};

use crate::mocks::{MockEngine, MockTransport};

pub const SUPPORT_URL: &str = "https://example.com/support";

pub struct TestEnvironment {
    /// Keeps the staging directories alive for the test's duration
    pub dir: TempDir,
    pub flow: UploadFlow,
    pub transport: Arc<MockTransport>,
    pub engine: Arc<MockEngine>,
}

impl TestEnvironment {
    /// Environment with a session timeout long enough to never fire
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(60))
    }

    pub fn with_timeout(session_timeout: Duration) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = Settings {
            input_dir: dir.path().join("input_media"),
            output_dir: dir.path().join("output_media"),
            session_timeout,
            support_url: SUPPORT_URL.to_string(),
        };

        let store = MediaStore::new(settings.input_dir.clone(), settings.output_dir.clone());
        let transport = Arc::new(MockTransport::new());
        let engine = Arc::new(MockEngine::new(store));
        let flow = UploadFlow::new(transport.clone(), engine.clone(), settings);

        Self {
            dir,
            flow,
            transport,
            engine,
        }
    }

    pub fn store(&self) -> &MediaStore {
        self.flow.store()
    }
}

/// Telegram message JSON carrying a video
///
/// `mime_type` and `file_name` are omitted from the payload when `None`.
pub fn video_message_json(chat_id: i64, mime_type: Option<&str>, file_name: Option<&str>) -> serde_json::Value {
    let mut video = serde_json::json!({
        "file_id": "BAACAgIAAxkBAAIBZ2VideoFileId",
        "file_unique_id": "AgADVideoUnique",
        "width": 1280,
        "height": 720,
        "duration": 12,
        "file_size": 1048576
    });
    if let Some(mime) = mime_type {
        video["mime_type"] = serde_json::Value::from(mime);
    }
    if let Some(name) = file_name {
        video["file_name"] = serde_json::Value::from(name);
    }

    serde_json::json!({
        "message_id": 1,
        "date": 1234567890,
        "chat": {
            "id": chat_id,
            "type": "private",
            "first_name": "Test"
        },
        "from": {
            "id": chat_id,
            "is_bot": false,
            "first_name": "Test"
        },
        "video": video
    })
}

/// Callback query JSON for a button pressed under a bot message in `chat_id`
pub fn callback_query_json(chat_id: i64, menu_message_id: i32, data: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "4382bfdwdsb323b2d9",
        "from": {
            "id": chat_id,
            "is_bot": false,
            "first_name": "Test"
        },
        "message": {
            "message_id": menu_message_id,
            "date": 1234567890,
            "chat": {
                "id": chat_id,
                "type": "private",
                "first_name": "Test"
            },
            "text": "Please select the file type to convert to:"
        },
        "chat_instance": "-1234567890",
        "data": data
    })
}
