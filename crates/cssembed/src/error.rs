//! CLI error types.

use cssembed_core::EmbedError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Embed(#[from] EmbedError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),
}
