//! Error types for the embedding engine.

use std::path::PathBuf;

/// Error produced while embedding assets into a stylesheet.
///
/// Any of these aborts the whole run; no partial output is produced.
/// Recoverable conditions (oversized image, oversized URI, non-image
/// reference, missing file under skip-missing) are not errors — they fall
/// back to the original reference text with at most a warning.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// Malformed `url(...)` token (mismatched quote or missing `)`).
    #[error("invalid CSS URL format ({detail}) at line {line}, col {column}")]
    Format {
        line: usize,
        column: usize,
        detail: String,
    },

    /// A referenced local image file does not exist.
    #[error("image file not found: {0}")]
    NotFound(PathBuf),

    /// A remote image fetch failed. Never downgraded by skip-missing.
    #[error("failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    /// Underlying read failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
