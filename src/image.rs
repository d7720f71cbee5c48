//! Image reference normalization
//!
//! Vision endpoints accept images only as a URI inside an `image_url` content
//! block. Callers, on the other hand, hold images as remote URLs, files on
//! disk, or bytes already in memory. [`ImageReference`] captures those three
//! shapes once, at the boundary, and [`build_image_content`] turns any of them
//! into an [`ImageUrlBlock`] whose URL the server can use directly:
//!
//! | Reference   | Resulting URL                                 |
//! |-------------|-----------------------------------------------|
//! | `RemoteUrl` | the URL, untouched (no fetch, no validation)  |
//! | `LocalPath` | `data:<mime from extension>;base64,<file>`    |
//! | `RawBytes`  | `data:image/jpeg;base64,<bytes>`              |
//!
//! # Examples
//!
//! ```rust,no_run
//! use vision_chat::{build_image_content, ImageDetail, ImageReference};
//!
//! # async fn example() -> vision_chat::Result<()> {
//! let remote = ImageReference::from("https://example.com/cat.jpg");
//! let local = ImageReference::from("frames/screenshot_0001.png");
//!
//! let block = build_image_content(&local, ImageDetail::High).await?;
//! assert!(block.url().starts_with("data:image/png;base64,"));
//! # Ok(())
//! # }
//! ```

use crate::types::{ImageDetail, ImageUrlBlock};
use crate::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::path::{Path, PathBuf};

/// MIME type assumed when nothing better is known
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// An image as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// `http://` or `https://` URL, forwarded as-is
    RemoteUrl(String),
    /// Image file on the local filesystem, read when the block is built
    LocalPath(PathBuf),
    /// Encoded image bytes already in memory
    RawBytes(Vec<u8>),
}

impl ImageReference {
    /// Classify a string: `http://`/`https://` prefixes are remote URLs,
    /// everything else is a local path.
    pub fn parse(s: impl Into<String>) -> Self {
        let s = s.into();
        if is_remote_url(&s) {
            ImageReference::RemoteUrl(s)
        } else {
            ImageReference::LocalPath(PathBuf::from(s))
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        ImageReference::RemoteUrl(url.into())
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        ImageReference::LocalPath(path.into())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ImageReference::RawBytes(bytes.into())
    }

    /// Short description for logs; never includes image payloads
    pub fn describe(&self) -> String {
        match self {
            ImageReference::RemoteUrl(url) => format!("url {}", url),
            ImageReference::LocalPath(path) => format!("file {}", path.display()),
            ImageReference::RawBytes(bytes) => format!("{} raw bytes", bytes.len()),
        }
    }
}

impl From<&str> for ImageReference {
    fn from(s: &str) -> Self {
        ImageReference::parse(s)
    }
}

impl From<String> for ImageReference {
    fn from(s: String) -> Self {
        ImageReference::parse(s)
    }
}

impl From<PathBuf> for ImageReference {
    fn from(path: PathBuf) -> Self {
        ImageReference::LocalPath(path)
    }
}

impl From<&Path> for ImageReference {
    fn from(path: &Path) -> Self {
        ImageReference::LocalPath(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageReference {
    fn from(bytes: Vec<u8>) -> Self {
        ImageReference::RawBytes(bytes)
    }
}

impl From<&[u8]> for ImageReference {
    fn from(bytes: &[u8]) -> Self {
        ImageReference::RawBytes(bytes.to_vec())
    }
}

fn is_remote_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Infer an image MIME type from a file extension (case-insensitive).
///
/// Unknown or missing extensions map to `image/jpeg`.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => DEFAULT_IMAGE_MIME,
    }
}

/// Build a `data:<mime>;base64,<payload>` URI
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
}

/// Normalize an image reference into an `image_url` content block.
///
/// Only `LocalPath` touches the outside world (one file read); the other
/// variants are pure.
///
/// # Errors
///
/// Returns [`Error::FileRead`] when a local path does not exist or cannot be
/// read.
pub async fn build_image_content(
    reference: &ImageReference,
    detail: ImageDetail,
) -> Result<ImageUrlBlock> {
    let url = match reference {
        ImageReference::RemoteUrl(url) => url.clone(),
        ImageReference::LocalPath(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| Error::file_read(path, e))?;
            data_uri(mime_type_for_path(path), &bytes)
        }
        // No content sniffing: raw bytes are always declared as JPEG
        ImageReference::RawBytes(bytes) => data_uri(DEFAULT_IMAGE_MIME, bytes),
    };

    log::debug!(
        "Built image block from {}: {} (detail: {})",
        reference.describe(),
        truncate_for_log(&url),
        detail
    );

    Ok(ImageUrlBlock::new(url, detail))
}

// Data URIs can run to megabytes; keep log lines short.
fn truncate_for_log(url: &str) -> String {
    const MAX: usize = 100;
    match url.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}... ({} chars)", &url[..idx], url.chars().count()),
        None => url.to_string(),
    }
}
