//! Pure queries over a photo collection snapshot.
//!
//! None of these functions mutate their input; sorting clones first.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, TimeZone};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::{Photo, PhotoStatistics, SortOrder, TagCount};

/// Photos whose caption contains `query`, case-insensitively.
///
/// A blank or whitespace-only query returns the input unchanged. Any other
/// query is matched as written, surrounding whitespace included. Photos
/// without a caption never match a non-blank query.
pub fn filter_by_search(photos: &[Photo], query: &str) -> Vec<Photo> {
    if query.trim().is_empty() {
        return photos.to_vec();
    }
    let needle = query.to_lowercase();

    photos
        .iter()
        .filter(|p| {
            p.caption
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Like [`filter_by_search`], but a photo also matches when the query is a
/// substring of its space-joined tags.
pub fn search_photos(photos: &[Photo], query: &str) -> Vec<Photo> {
    if query.trim().is_empty() {
        return photos.to_vec();
    }
    let needle = query.to_lowercase();

    photos
        .iter()
        .filter(|p| {
            p.caption_str().to_lowercase().contains(&needle)
                || p.tags.join(" ").to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// A sorted copy of `photos`. The sort is stable.
pub fn sort_photos(photos: &[Photo], order: SortOrder) -> Vec<Photo> {
    let mut sorted = photos.to_vec();

    match order {
        SortOrder::Newest => sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Oldest => sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortOrder::Caption => sorted.sort_by_cached_key(|p| CaptionKey::new(p.caption_str())),
        SortOrder::Favorites => sorted.sort_by(|a, b| {
            b.favorite
                .cmp(&a.favorite)
                .then_with(|| b.timestamp.cmp(&a.timestamp))
        }),
        SortOrder::Unsorted => {}
    }

    sorted
}

/// Filter by search query, then sort the matches.
pub fn filter_and_sort(photos: &[Photo], query: &str, order: SortOrder) -> Vec<Photo> {
    sort_photos(&filter_by_search(photos, query), order)
}

/// Collation key for caption sorting.
///
/// Captions compare first on their base letters, with accents and case
/// removed, so "Ăn sáng" sorts among the a's and "Đà Lạt" among the d's.
/// Ties fall back to the accented lowercase form, then to case with the
/// lowercase form first: "apple" < "banana" < "Banana" < "bánh" < "cherry".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct CaptionKey {
    base: String,
    accented: String,
    cased: Reverse<String>,
}

impl CaptionKey {
    fn new(caption: &str) -> Self {
        let accented: String = caption.to_lowercase().nfd().collect();
        let mut base = String::with_capacity(accented.len());
        for c in accented.chars().filter(|c| !is_combining_mark(*c)) {
            push_base_letter(&mut base, c);
        }
        Self {
            base,
            accented,
            cased: Reverse(caption.to_string()),
        }
    }
}

/// Letters that carry a stroke instead of a combining mark have no
/// canonical decomposition and are folded by hand.
fn push_base_letter(out: &mut String, c: char) {
    match c {
        'đ' | 'ð' => out.push('d'),
        'ø' => out.push('o'),
        'ł' => out.push('l'),
        'ħ' => out.push('h'),
        'ı' => out.push('i'),
        'ß' => out.push_str("ss"),
        'æ' => out.push_str("ae"),
        'œ' => out.push_str("oe"),
        _ => out.push(c),
    }
}

/// Aggregate figures for the statistics view.
pub fn compute_statistics(photos: &[Photo]) -> PhotoStatistics {
    if photos.is_empty() {
        return PhotoStatistics::default();
    }

    let captioned: Vec<&Photo> = photos.iter().filter(|p| p.has_caption()).collect();
    let with_captions = captioned.len();
    let caption_chars: usize = captioned.iter().map(|p| p.caption_str().chars().count()).sum();
    let average_caption_length = if with_captions == 0 {
        0
    } else {
        (caption_chars + with_captions / 2) / with_captions
    };

    let total_tags = photos.iter().map(|p| p.tags.len()).sum();
    let unique_tag_count = photos
        .iter()
        .flat_map(|p| p.tags.iter())
        .collect::<HashSet<_>>()
        .len();

    PhotoStatistics {
        total: photos.len(),
        with_captions,
        without_captions: photos.len() - with_captions,
        favorites: photos.iter().filter(|p| p.favorite).count(),
        total_tags,
        unique_tag_count,
        average_caption_length,
        oldest_timestamp: photos.iter().map(|p| p.timestamp).min(),
        newest_timestamp: photos.iter().map(|p| p.timestamp).max(),
    }
}

/// Number of photos carrying each tag.
pub fn tag_frequency(photos: &[Photo]) -> HashMap<String, usize> {
    ordered_frequency(photos)
        .into_iter()
        .map(|tc| (tc.tag, tc.count))
        .collect()
}

/// The `limit` most used tags, by descending count. Equal counts keep the
/// order in which the tags were first seen.
pub fn popular_tags(photos: &[Photo], limit: usize) -> Vec<TagCount> {
    let mut counts = ordered_frequency(photos);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

fn ordered_frequency(photos: &[Photo]) -> Vec<TagCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TagCount> = Vec::new();

    for tag in photos.iter().flat_map(|p| p.tags.iter()) {
        match index.get(tag.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(tag.as_str(), counts.len());
                counts.push(TagCount {
                    tag: tag.clone(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Photos carrying `tag`, compared case-insensitively. An empty tag
/// matches nothing.
pub fn filter_by_tag(photos: &[Photo], tag: &str) -> Vec<Photo> {
    if tag.is_empty() {
        return Vec::new();
    }
    let wanted = tag.to_lowercase();

    photos
        .iter()
        .filter(|p| p.tags.iter().any(|t| t.to_lowercase() == wanted))
        .cloned()
        .collect()
}

/// Group photos by calendar date in `tz`. Groups appear in the order their
/// first photo appears; photos keep input order within a group.
pub fn group_by_date<Tz: TimeZone>(photos: &[Photo], tz: &Tz) -> Vec<(NaiveDate, Vec<Photo>)> {
    let mut groups: Vec<(NaiveDate, Vec<Photo>)> = Vec::new();

    for photo in photos {
        let date = photo.timestamp.with_timezone(tz).date_naive();
        match groups.iter_mut().find(|(d, _)| *d == date) {
            Some((_, members)) => members.push(photo.clone()),
            None => groups.push((date, vec![photo.clone()])),
        }
    }

    groups
}
