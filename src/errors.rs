//! Error types for codepress.

use std::path::PathBuf;

use crate::layout::LayoutError;
use crate::output::OutputError;
use crate::walker::WalkError;

/// Top-level error type for codepress operations.
#[derive(Debug, thiserror::Error)]
pub enum CodepressError {
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("invalid page setup: {0}")]
    Layout(#[from] LayoutError),
}

/// Map an error to its exit code.
pub fn exit_code(error: &CodepressError) -> i32 {
    match error {
        CodepressError::PathNotFound(_) => 3,
        CodepressError::PermissionDenied(_) => 4,
        CodepressError::Io(_) => 1,
        CodepressError::Walk(WalkError::NotFound { .. }) => 3,
        CodepressError::Walk(WalkError::PermissionDenied { .. }) => 4,
        CodepressError::Walk(_) => 2,
        CodepressError::Output(_) => 1,
        CodepressError::Layout(_) => 2,
    }
}
