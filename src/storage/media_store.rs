//! Chat-scoped staging area for media files
//!
//! Every chat owns at most one staged input and one staged output per format:
//! - input:  `{input_dir}/{chat_id}.{input_format}`
//! - output: `{output_dir}/{chat_id}.{output_format}`
//!
//! The naming convention is the only isolation between chats, so no locking
//! is needed as long as a chat runs a single session at a time.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use teloxide::types::ChatId;

#[derive(Debug, Clone)]
pub struct MediaStore {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl MediaStore {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the staged upload for `(chat_id, input_format)`
    pub fn input_path(&self, chat_id: ChatId, input_format: &str) -> PathBuf {
        self.input_dir.join(format!("{}.{}", chat_id.0, input_format))
    }

    /// Path of the converted file for `(chat_id, output_format)`
    pub fn output_path(&self, chat_id: ChatId, output_format: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", chat_id.0, output_format))
    }

    /// Create both staging directories if they don't exist yet
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        fs_err::tokio::create_dir_all(&self.input_dir).await?;
        fs_err::tokio::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    /// Whether the chat has a staged upload in `input_format`
    pub async fn input_exists(&self, chat_id: ChatId, input_format: &str) -> bool {
        tokio::fs::try_exists(self.input_path(chat_id, input_format))
            .await
            .unwrap_or(false)
    }

    /// Remove the staged upload only (used when a session is replaced)
    pub async fn remove_input(&self, chat_id: ChatId, input_format: &str) {
        remove_quietly(&self.input_path(chat_id, input_format)).await;
    }

    /// Remove the staged input and output of a chat.
    ///
    /// Either side may be unknown (e.g. the callback payload never parsed);
    /// unknown sides are skipped. Missing files are not an error, so calling
    /// this twice is harmless.
    pub async fn cleanup(&self, chat_id: ChatId, input_format: Option<&str>, output_format: Option<&str>) {
        if let Some(input) = input_format {
            remove_quietly(&self.input_path(chat_id, input)).await;
        }
        if let Some(output) = output_format {
            remove_quietly(&self.output_path(chat_id, output)).await;
        }
    }
}

async fn remove_quietly(path: &Path) {
    match fs_err::tokio::remove_file(path).await {
        Ok(()) => log::debug!("🗑️ Removed staged file {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove staged file: {}", e),
    }
}
