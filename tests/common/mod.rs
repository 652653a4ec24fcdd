//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod helpers;

#[allow(unused_imports)]
pub use fixtures::{callback_query_json, video_message_json, TestEnvironment};
#[allow(unused_imports)]
pub use helpers::{create_test_chat_id, video_upload, wait_until};
