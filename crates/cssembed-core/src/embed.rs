//! Line scanner / rewriter.
//!
//! Walks the stylesheet line by line, locates `url(...)` tokens, and
//! substitutes each with its embedded form. Everything outside the matched
//! tokens is copied through byte-for-byte; lines are rejoined with `\n`
//! regardless of the original terminator.
//!
//! References are processed strictly in source order (left-to-right within
//! a line, top-to-bottom across lines), which fixes the order of MHTML
//! envelope parts and of duplicate-URL warnings. Repeated URLs are
//! resolved and encoded repeatedly; the seen-URL map only feeds the
//! duplicate warning.

use std::collections::HashMap;

use crate::classify::is_image_url;
use crate::datauri::data_uri;
use crate::error::EmbedError;
use crate::mhtml::{entry_name, MhtmlEnvelope};
use crate::options::{EmbedOptions, OutputMode, MHTML_BOUNDARY};
use crate::resolver::{AssetResolver, FetchResolver, Resolution, SkipReason};

/// Result of one embedding run.
#[derive(Debug)]
pub struct EmbedOutcome {
    /// Rewritten stylesheet text.
    pub css: String,
    /// Serialized MHTML envelope; `Some` only in MHTML mode with at least
    /// one embedded image. Prepend it to the stylesheet (or write it to a
    /// separate stream).
    pub mhtml: Option<String>,
    /// Number of references successfully embedded.
    pub conversions: usize,
}

/// CSS asset embedder.
///
/// Generic over the [`AssetResolver`] so tests can substitute a fake
/// resolver; production code uses [`Embedder::new`], which wires in the
/// filesystem/HTTP [`FetchResolver`].
pub struct Embedder<R = FetchResolver> {
    options: EmbedOptions,
    resolver: R,
}

impl Embedder<FetchResolver> {
    #[must_use]
    pub fn new(options: EmbedOptions) -> Self {
        Self {
            options,
            resolver: FetchResolver::new(),
        }
    }
}

impl<R: AssetResolver> Embedder<R> {
    /// Create an embedder with an injected resolver.
    #[must_use]
    pub fn with_resolver(options: EmbedOptions, resolver: R) -> Self {
        Self { options, resolver }
    }

    /// Embed image references in `css`, prefixing non-`http:` URLs with
    /// `root` when given.
    ///
    /// Fails atomically: a format error, a missing local file without
    /// `skip_missing`, or any remote fetch failure aborts the run and no
    /// partial output is produced.
    pub fn embed(&self, css: &str, root: Option<&str>) -> Result<EmbedOutcome, EmbedError> {
        let mut out = String::with_capacity(css.len());
        let mut envelope = MhtmlEnvelope::new(
            MHTML_BOUNDARY,
            self.options.mhtml_root.clone(),
            self.options.output_filename.clone(),
        );
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut conversions = 0usize;

        for (index, line) in css.lines().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            self.rewrite_line(
                line,
                index + 1,
                root,
                &mut out,
                &mut envelope,
                &mut seen,
                &mut conversions,
            )?;
        }

        tracing::info!("converted {conversions} images");

        Ok(EmbedOutcome {
            css: out,
            mhtml: envelope.finalize(),
            conversions,
        })
    }

    /// Rewrite one line, appending to `out`.
    #[allow(clippy::too_many_arguments)]
    fn rewrite_line(
        &self,
        line: &str,
        line_num: usize,
        root: Option<&str>,
        out: &mut String,
        envelope: &mut MhtmlEnvelope,
        seen: &mut HashMap<String, usize>,
        conversions: &mut usize,
    ) -> Result<(), EmbedError> {
        let mut start = 0;

        while let Some(found) = line[start..].find("url(") {
            // Index just past "url("; also the 0-based column reported in
            // format errors (1-based for the reader).
            let pos = start + found + 4;
            out.push_str(&line[start..pos]);

            let Some(close) = line[pos..].find(')') else {
                return Err(EmbedError::Format {
                    line: line_num,
                    column: pos + 1,
                    detail: format!("unterminated url( token '{}'", &line[pos..]),
                });
            };
            let npos = pos + close;

            let raw = line[pos..npos].trim();
            let url = strip_quotes(raw, line_num, pos + 1)?;

            if let Some(previous) = seen.get(url) {
                tracing::warn!(
                    "duplicate URL '{url}' found at line {line_num}, \
                     previously declared at line {previous}"
                );
            }
            seen.insert(url.to_owned(), line_num);

            tracing::info!("found URL '{url}' at line {line_num}, col {}", pos + 1);

            // Root applies to anything that is not scheme-absolute.
            let resolve_url = match root {
                Some(root) if !url.starts_with("http:") => {
                    let prefixed = format!("{root}{url}");
                    tracing::info!("applying root, URL is now '{prefixed}'");
                    prefixed
                }
                _ => url.to_owned(),
            };

            let replacement = self.process_url(&resolve_url, url, envelope, conversions)?;
            out.push_str(&replacement);

            start = npos;
        }

        out.push_str(&line[start..]);
        Ok(())
    }

    /// Produce the replacement text for one reference: the embedded form
    /// on success, the original unquoted text on any fallback.
    fn process_url(
        &self,
        resolve_url: &str,
        original: &str,
        envelope: &mut MhtmlEnvelope,
        conversions: &mut usize,
    ) -> Result<String, EmbedError> {
        if !is_image_url(resolve_url) {
            tracing::info!("URL '{original}' is not an image, skipping");
            return Ok(original.to_owned());
        }

        let resolution = match self
            .resolver
            .resolve(resolve_url, self.options.max_image_size)
        {
            Ok(resolution) => resolution,
            Err(EmbedError::NotFound(path)) if self.options.skip_missing => {
                tracing::info!("could not find file '{}', skipping", path.display());
                return Ok(original.to_owned());
            }
            Err(err) => return Err(err),
        };

        let asset = match resolution {
            Resolution::Asset(asset) => asset,
            Resolution::Skip(SkipReason::ImageTooLarge { size, limit }) => {
                tracing::info!(
                    "file '{original}' is {size} bytes, larger than {limit} bytes, skipping"
                );
                return Ok(original.to_owned());
            }
        };

        let Some(uri) = data_uri(resolve_url, &asset.bytes) else {
            return Ok(original.to_owned());
        };

        if self.options.max_uri_length > 0 && uri.len() > self.options.max_uri_length {
            tracing::warn!(
                "file '{resolve_url}' creates a data URI larger than {} bytes, skipping",
                self.options.max_uri_length
            );
            return Ok(original.to_owned());
        }

        match self.options.mode {
            OutputMode::DataUri => {
                *conversions += 1;
                Ok(uri)
            }
            OutputMode::Mhtml => {
                let entry = entry_name(original);
                let payload = uri.find(',').map_or(uri.as_str(), |comma| &uri[comma + 1..]);
                let token = envelope.add_part(entry, payload);
                *conversions += 1;
                Ok(token)
            }
        }
    }
}

/// Strip a matching leading/trailing quote pair. A quote on only one side
/// is a fatal format error.
fn strip_quotes<'a>(url: &'a str, line: usize, column: usize) -> Result<&'a str, EmbedError> {
    for quote in ['"', '\''] {
        if url.starts_with(quote) {
            if url.len() >= 2 && url.ends_with(quote) {
                return Ok(&url[1..url.len() - 1]);
            }
            return Err(EmbedError::Format {
                line,
                column,
                detail: url.to_owned(),
            });
        }
    }
    Ok(url)
}
