//! On-disk staging of uploaded and converted media

pub mod media_store;

// Re-exports for convenience
pub use media_store::MediaStore;
