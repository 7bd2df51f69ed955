//! Asset resolution: turning a URL into raw bytes.
//!
//! The embedder depends only on the [`AssetResolver`] trait, so tests can
//! inject a fake resolver instead of touching the filesystem or network.
//! [`FetchResolver`] is the production implementation: local files are
//! read from disk, `http://` URLs are fetched with a blocking GET.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use ureq::Agent;

use crate::error::EmbedError;

/// Where a resolved asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Read from the local filesystem.
    Local,
    /// Fetched over HTTP.
    Remote,
}

/// Raw bytes of a successfully resolved asset.
#[derive(Debug)]
pub struct ResolvedAsset {
    pub bytes: Vec<u8>,
    pub kind: SourceKind,
}

/// Why resolution declined to produce an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The local file exceeds the configured maximum image size.
    ImageTooLarge { size: u64, limit: u64 },
}

/// Outcome of resolving one URL.
///
/// `Skip` instructs the caller to re-emit the original reference text
/// unchanged; it is not an error.
#[derive(Debug)]
pub enum Resolution {
    Asset(ResolvedAsset),
    Skip(SkipReason),
}

/// Capability for fetching the bytes behind a URL.
pub trait AssetResolver {
    /// Resolve `url` to raw bytes.
    ///
    /// `max_image_size` caps the size of *local* files only (`0` means
    /// unlimited); oversized files yield [`Resolution::Skip`] without the
    /// bytes being read. A missing local file is [`EmbedError::NotFound`];
    /// any remote failure is [`EmbedError::Fetch`].
    fn resolve(&self, url: &str, max_image_size: u64) -> Result<Resolution, EmbedError>;
}

/// Filesystem and HTTP resolver.
///
/// Holds a [`ureq::Agent`] so repeated remote fetches within one run reuse
/// connections. No timeout is configured: a run blocks until every fetch
/// completes.
pub struct FetchResolver {
    agent: Agent,
}

impl FetchResolver {
    #[must_use]
    pub fn new() -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    fn resolve_remote(&self, url: &str) -> Result<Resolution, EmbedError> {
        tracing::info!("downloading '{url}' to generate data URI");

        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| EmbedError::Fetch {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            return Err(EmbedError::Fetch {
                url: url.to_owned(),
                reason: format!("HTTP {status}"),
            });
        }

        let bytes = body.read_to_vec().map_err(|e| EmbedError::Fetch {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Resolution::Asset(ResolvedAsset {
            bytes,
            kind: SourceKind::Remote,
        }))
    }

    fn resolve_local(url: &str, max_image_size: u64) -> Result<Resolution, EmbedError> {
        tracing::info!("opening file '{url}' to generate data URI");
        let path = Path::new(url);

        let metadata = fs::metadata(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                EmbedError::NotFound(path.to_path_buf())
            } else {
                EmbedError::Io(e)
            }
        })?;

        // Size check happens before the bytes are read.
        if max_image_size > 0 && metadata.len() > max_image_size {
            return Ok(Resolution::Skip(SkipReason::ImageTooLarge {
                size: metadata.len(),
                limit: max_image_size,
            }));
        }

        let bytes = fs::read(path)?;
        Ok(Resolution::Asset(ResolvedAsset {
            bytes,
            kind: SourceKind::Local,
        }))
    }
}

impl Default for FetchResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetResolver for FetchResolver {
    fn resolve(&self, url: &str, max_image_size: u64) -> Result<Resolution, EmbedError> {
        if url.starts_with("http://") {
            self.resolve_remote(url)
        } else {
            Self::resolve_local(url, max_image_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> String {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path.to_str().unwrap().to_owned()
    }

    #[test]
    fn test_local_file_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "a.png", b"\x89PNG-ish");

        let resolver = FetchResolver::new();
        let resolution = resolver.resolve(&path, 0).unwrap();

        match resolution {
            Resolution::Asset(asset) => {
                assert_eq!(asset.bytes, b"\x89PNG-ish");
                assert_eq!(asset.kind, SourceKind::Local);
            }
            Resolution::Skip(reason) => panic!("unexpected skip: {reason:?}"),
        }
    }

    #[test]
    fn test_local_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");

        let resolver = FetchResolver::new();
        let err = resolver.resolve(path.to_str().unwrap(), 0).unwrap_err();

        assert!(matches!(err, EmbedError::NotFound(p) if p == path));
    }

    #[test]
    fn test_local_file_over_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "big.png", &[0u8; 64]);

        let resolver = FetchResolver::new();
        let resolution = resolver.resolve(&path, 32).unwrap();

        assert!(matches!(
            resolution,
            Resolution::Skip(SkipReason::ImageTooLarge { size: 64, limit: 32 })
        ));
    }

    #[test]
    fn test_local_file_at_size_limit_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "edge.png", &[0u8; 32]);

        let resolver = FetchResolver::new();
        let resolution = resolver.resolve(&path, 32).unwrap();

        assert!(matches!(resolution, Resolution::Asset(_)));
    }
}
