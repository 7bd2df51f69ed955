//! Embedding options.
//!
//! A single configuration value with named, defaulted fields. The options
//! are threaded explicitly through the embedder; there is no process-wide
//! state.

/// Maximum data URI length applied by default (IE8 caps data URIs at 32KB).
pub const DEFAULT_MAX_URI_LENGTH: usize = 32_768;

/// Boundary token separating parts of the MHTML envelope.
pub const MHTML_BOUNDARY: &str = "CSSEmbed_Image";

/// How embedded images are written back into the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Replace references with inline `data:` URIs.
    #[default]
    DataUri,
    /// Replace references with `mhtml:` tokens backed by a
    /// `multipart/related` envelope.
    Mhtml,
}

/// Options controlling one embedding run.
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    /// Output mode (data URI or MHTML).
    pub mode: OutputMode,
    /// Re-emit the original reference instead of failing when a local
    /// image file does not exist. Remote fetch failures still abort.
    pub skip_missing: bool,
    /// Maximum length of an encoded data URI; longer results fall back to
    /// the original reference. `0` means unlimited.
    pub max_uri_length: usize,
    /// Maximum size in bytes of a local image file to embed; larger files
    /// are skipped. `0` means unlimited. Never applied to remote images.
    pub max_image_size: u64,
    /// Root URL the `mhtml:` reference tokens point at (required in MHTML
    /// mode). Normalized to end with `/` when tokens are built.
    pub mhtml_root: String,
    /// Basename of the stylesheet being produced, used as the MHTML
    /// content-location root inside reference tokens.
    pub output_filename: String,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            skip_missing: false,
            max_uri_length: DEFAULT_MAX_URI_LENGTH,
            max_image_size: 0,
            mhtml_root: String::new(),
            output_filename: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EmbedOptions::default();
        assert_eq!(options.mode, OutputMode::DataUri);
        assert!(!options.skip_missing);
        assert_eq!(options.max_uri_length, 32_768);
        assert_eq!(options.max_image_size, 0);
    }
}
