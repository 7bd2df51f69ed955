//! Base64 data URI encoding.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;

use crate::classify::mime_for_url;

/// Encode image bytes as a `data:<mime>;base64,<payload>` URI.
///
/// The MIME type comes from `url`'s extension (query string ignored).
/// Returns `None` when the extension is not a supported image type; the
/// caller only invokes this for URLs already classified as images.
#[must_use]
pub fn data_uri(url: &str, bytes: &[u8]) -> Option<String> {
    let mime = mime_for_url(url)?;
    let payload = BASE64_STANDARD.encode(bytes);
    Some(format!("data:{mime};base64,{payload}"))
}
