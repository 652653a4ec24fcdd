//! Core utilities, configuration, errors, and session bookkeeping

pub mod config;
pub mod error;
pub mod logging;
pub mod process;
pub mod session;

// Re-exports for convenience
pub use config::Settings;
pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_ffmpeg_availability};
pub use session::{Session, SessionEnd, SessionRegistry, SessionState};
