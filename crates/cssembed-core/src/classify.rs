//! Extension-based image detection.
//!
//! Classification looks only at the URL text: the segment after the last
//! `.`, truncated at a trailing `?` query string. Content sniffing and
//! response headers are deliberately out of scope.

/// Extract the extension segment of a URL: the text after the last `.`,
/// cut at a `?` that occurs after that `.` (query parameters are not part
/// of the extension).
fn extension_of(url: &str) -> &str {
    let start = url.rfind('.').map_or(0, |dot| dot + 1);
    let end = match url.rfind('?') {
        Some(q) if q > start => q,
        _ => url.len(),
    };
    &url[start..end]
}

/// Return true when the URL denotes an embeddable image.
///
/// Compares the extension segment case-sensitively against
/// `jpg`, `jpeg`, `gif`, `png`. URLs of the form `image.png?a=b` classify
/// as images; `image.png?param=illegal.value.with.period` does not, since
/// the last `.` then sits inside the query string.
#[must_use]
pub fn is_image_url(url: &str) -> bool {
    matches!(extension_of(url), "jpg" | "jpeg" | "gif" | "png")
}

/// Return the MIME type string for an image URL, `None` when the
/// extension is not a supported image type.
#[must_use]
pub fn mime_for_url(url: &str) -> Option<&'static str> {
    match extension_of(url) {
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}
