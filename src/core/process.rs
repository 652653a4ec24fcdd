//! Process execution utilities with timeout support
//!
//! Wraps external tool invocations (ffmpeg) so a hung process can't block
//! a chat's choice handler forever.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::conversion::{ConversionError, ConversionResult};

/// Run an async Command with a timeout.
///
/// The child is killed when the timeout elapses (`kill_on_drop`).
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> ConversionResult<Output> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(ConversionError::IoError(e)),
        Err(_) => Err(ConversionError::Timeout(timeout.as_secs())),
    }
}
