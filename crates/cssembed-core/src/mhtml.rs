//! MHTML envelope assembly.
//!
//! Builds a `multipart/related` envelope (RFC 2557 style) inside a CSS
//! comment block, one base64 part per embedded image. The envelope is
//! accumulated incrementally while the stylesheet is rewritten and
//! serialized once at the end; when no parts were added the envelope is
//! omitted entirely.

/// Return the base filename of a path: the segment after the last `/` or,
/// failing that, the last `\`.
#[must_use]
pub fn entry_name(path: &str) -> &str {
    if let Some(pos) = path.rfind('/') {
        &path[pos + 1..]
    } else if let Some(pos) = path.rfind('\\') {
        &path[pos + 1..]
    } else {
        path
    }
}

/// Incrementally built `multipart/related` envelope.
///
/// Owned by one embedding run; parts appear in the order they were added,
/// which is the order references are encountered in the source.
pub struct MhtmlEnvelope {
    boundary: String,
    mhtml_root: String,
    output_filename: String,
    parts: String,
    part_count: usize,
}

impl MhtmlEnvelope {
    #[must_use]
    pub fn new(
        boundary: impl Into<String>,
        mhtml_root: impl Into<String>,
        output_filename: impl Into<String>,
    ) -> Self {
        Self {
            boundary: boundary.into(),
            mhtml_root: mhtml_root.into(),
            output_filename: output_filename.into(),
            parts: String::new(),
            part_count: 0,
        }
    }

    /// Number of parts added so far.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.part_count
    }

    /// Append one base64 part and return the `mhtml:` reference token to
    /// substitute into the stylesheet.
    pub fn add_part(&mut self, entry: &str, base64_payload: &str) -> String {
        self.parts.push_str("--");
        self.parts.push_str(&self.boundary);
        self.parts.push_str("\nContent-Location:");
        self.parts.push_str(entry);
        self.parts.push_str("\nContent-Transfer-Encoding:base64\n\n");
        self.parts.push_str(base64_payload);
        self.parts.push('\n');
        self.part_count += 1;

        format!("mhtml:{}!{entry}", self.mhtml_path())
    }

    /// Serialize the envelope, `None` when no parts were added.
    ///
    /// The trailing `--<boundary>--` delimiter is always present; it works
    /// around an IE/Vista parsing issue in the historical consumer.
    #[must_use]
    pub fn finalize(self) -> Option<String> {
        if self.part_count == 0 {
            return None;
        }

        let mut envelope = String::with_capacity(self.parts.len() + 128);
        envelope.push_str("/*\nContent-Type: multipart/related; boundary=\"");
        envelope.push_str(&self.boundary);
        envelope.push_str("\"\n\n");
        envelope.push_str(&self.parts);
        envelope.push_str("\n--");
        envelope.push_str(&self.boundary);
        envelope.push_str("--\n*/\n");
        Some(envelope)
    }

    /// Root-relative location of the output stylesheet, root normalized to
    /// end with `/`.
    fn mhtml_path(&self) -> String {
        let mut path = self.mhtml_root.clone();
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(&self.output_filename);
        path
    }
}
