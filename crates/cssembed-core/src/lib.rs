//! CSS `url()` asset inlining engine.
//!
//! Scans CSS source text for `url(...)` references, resolves each reference
//! to an image resource (local file or remote HTTP), encodes it as an
//! embedded representation, and rewrites the CSS with the embedded form
//! substituted in place. Two output modes are supported:
//!
//! - **Data URI**: the image bytes become an inline
//!   `data:<mime>;base64,<payload>` URI.
//! - **MHTML**: the image bytes become a part of a `multipart/related`
//!   envelope prepended to the stylesheet inside a CSS comment, and the
//!   reference becomes an `mhtml:<root>/<file>!<entry>` token.
//!
//! # Architecture
//!
//! - [`classify`]: extension-based image detection and MIME lookup
//! - [`resolver`]: the [`AssetResolver`] trait plus the filesystem/HTTP
//!   implementation
//! - [`datauri`]: base64 data URI encoding
//! - [`mhtml`]: incremental MHTML envelope assembly
//! - [`embed`]: the line scanner / rewriter driving everything
//!
//! # Example
//!
//! ```ignore
//! use cssembed_core::{EmbedOptions, Embedder};
//!
//! let css = "background: url(folder.png);";
//! let embedder = Embedder::new(EmbedOptions::default());
//! let outcome = embedder.embed(css, Some("assets/"))?;
//! assert!(outcome.css.contains("data:image/png;base64,"));
//! ```
//!
//! The scan is strictly per line: a `url(` token without a closing `)` on
//! the same line is rejected as a format error rather than reconstructed
//! across line breaks.

pub mod classify;
pub mod datauri;
pub mod embed;
pub mod mhtml;
pub mod resolver;

mod error;
mod options;

pub use embed::{EmbedOutcome, Embedder};
pub use error::EmbedError;
pub use options::{EmbedOptions, OutputMode, DEFAULT_MAX_URI_LENGTH, MHTML_BOUNDARY};
pub use resolver::{AssetResolver, FetchResolver, Resolution, ResolvedAsset, SkipReason, SourceKind};
