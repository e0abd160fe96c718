//! Hashtag and mention extraction from caption text.
//!
//! The hashtag grammar is `#` followed by one or more ASCII word characters
//! or letters from the Latin-1 Supplement, Latin Extended-A/B and Latin
//! Extended Additional blocks, which covers precomposed Vietnamese letters.
//! No word boundary is required before `#`, so `Cool#tag` yields `#tag`.
//! Existing captions depend on this, so it must stay permissive.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::types::Photo;

const TAG_BODY: &str = r"[A-Za-z0-9_\x{00C0}-\x{024F}\x{1E00}-\x{1EFF}]+";

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("#{}", TAG_BODY)).expect("Invalid hashtag regex"));

static WHOLE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^#{}$", TAG_BODY)).expect("Invalid tag regex"));

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_]+").expect("Invalid mention regex"));

/// Extract lowercase hashtags (with the leading `#`) in first-seen order,
/// without duplicates. `None` and empty text yield an empty list.
pub fn extract_tags<'a>(text: impl Into<Option<&'a str>>) -> Vec<String> {
    let Some(text) = text.into() else {
        return Vec::new();
    };
    dedup_in_order(HASHTAG_RE.find_iter(text).map(|m| m.as_str().to_lowercase()))
}

/// Extract `@mentions` with the `@` stripped, in first-seen order, without
/// duplicates. Case is preserved.
pub fn extract_mentions<'a>(text: impl Into<Option<&'a str>>) -> Vec<String> {
    let Some(text) = text.into() else {
        return Vec::new();
    };
    dedup_in_order(MENTION_RE.find_iter(text).map(|m| m.as_str()[1..].to_string()))
}

/// Wrap every hashtag in `text` with `open` and `close`.
pub fn highlight_tags(text: &str, open: &str, close: &str) -> String {
    HASHTAG_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("{}{}{}", open, &caps[0], close)
        })
        .into_owned()
}

/// True when `tag` is exactly one hashtag and nothing else.
pub fn is_valid_tag(tag: &str) -> bool {
    WHOLE_TAG_RE.is_match(tag)
}

/// Every distinct tag across `photos`, sorted ascending.
pub fn all_unique_tags(photos: &[Photo]) -> Vec<String> {
    photos
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

const MAX_SUGGESTIONS: usize = 5;

/// Up to five known tags containing the partial `input`.
///
/// The first `#` in the input is ignored, so `#tra` and `tra` both suggest
/// `#travel`.
pub fn suggest_tags(photos: &[Photo], input: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase().replacen('#', "", 1);

    all_unique_tags(photos)
        .into_iter()
        .filter(|tag| tag.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn dedup_in_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}
