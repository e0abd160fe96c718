//! Helpers for photo identifiers and image references.
//!
//! The journal never decodes image bytes; these functions only look at URIs
//! and metadata supplied by the capture side.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::types::Photo;

const ID_SUFFIX_LEN: usize = 9;
const DEFAULT_EXTENSION: &str = "jpg";

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\w+)(?:\?|$)").expect("Invalid extension regex"));

static PHOTO_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:file://|content://|data:image|https?://|ph://)").expect("Invalid URI regex")
});

/// Generate a photo id of the form `photo_<unix-millis>_<suffix>`.
///
/// The random suffix keeps ids unique when two photos are saved within the
/// same millisecond.
pub fn generate_photo_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("photo_{}_{}", now.timestamp_millis(), &suffix[..ID_SUFFIX_LEN])
}

/// File extension of `uri`, ignoring any query string. Defaults to `jpg`.
pub fn file_extension(uri: &str) -> &str {
    EXTENSION_RE
        .captures(uri)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_EXTENSION)
}

/// MIME type for a file extension; unknown extensions are treated as JPEG.
pub fn mime_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "image/jpeg",
    }
}

/// True when `uri` uses one of the schemes capture sources produce.
pub fn is_valid_photo_uri(uri: &str) -> bool {
    PHOTO_URI_RE.is_match(uri)
}

/// Structural check used when accepting records from outside the store.
pub fn is_valid_photo(photo: &Photo) -> bool {
    !photo.id.trim().is_empty() && !photo.path.trim().is_empty()
}

/// Fit `width` x `height` inside `max_width` x `max_height`, keeping the
/// aspect ratio. Returns the rounded size.
pub fn calculate_dimensions(width: f64, height: f64, max_width: f64, max_height: f64) -> (u32, u32) {
    let (mut w, mut h) = (width, height);

    if w > max_width {
        h *= max_width / w;
        w = max_width;
    }
    if h > max_height {
        w *= max_height / h;
        h = max_height;
    }

    (w.round().max(0.0) as u32, h.round().max(0.0) as u32)
}
