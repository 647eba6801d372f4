//! Error handling for the import pipeline
//!
//! Malformed CSV input is data, not an error: normalizers and the row
//! validator report it through the batch's error list. Only infrastructure
//! failures (store unreachable, unreadable file) surface as `Err`, carried
//! through anyhow for context chaining.

use thiserror::Error;

/// Infrastructure-level failures.
#[derive(Error, Debug)]
pub enum CrmError {
    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = anyhow::Result<T>;
