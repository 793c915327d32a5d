// ABOUTME: Error types for helper execution
// ABOUTME: Wraps store and transform faults crossing the helper boundary

use thiserror::Error;

use crate::query::StoreError;
use crate::transform::TransformError;

#[derive(Error, Debug)]
pub enum HelperError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),
}

pub type Result<T> = std::result::Result<T, HelperError>;
