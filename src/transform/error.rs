// ABOUTME: Error types for content transform operations
// ABOUTME: Transform faults degrade to best-effort output at the helper boundary

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

pub type Result<T> = std::result::Result<T, TransformError>;
