//! Mood description to Last.fm tag mapping

use tracing::debug;

use crate::models::TagSet;

/// Keyword table; matched in this order, tags unioned in first-seen order
pub const KEYWORD_TAGS: &[(&str, &[&str])] = &[
    ("upbeat", &["funk", "dance", "pop"]),
    ("kitchen", &["soul", "rnb"]),
    ("chill", &["chillout", "ambient"]),
    ("jazz", &["jazz"]),
    ("workout", &["hip-hop", "edm"]),
    ("focus", &["lo-fi", "classical"]),
];

/// Tag used when no keyword matches
pub const DEFAULT_TAG: &str = "pop";

/// Map a free-text description onto tags
///
/// Matching is a case-insensitive substring test, so "chilled" matches
/// `chill`. Never returns an empty set.
pub fn map_description_to_tags(description: &str) -> TagSet {
    let lowered = description.to_lowercase();

    let matched = KEYWORD_TAGS
        .iter()
        .filter(|(keyword, _)| lowered.contains(keyword))
        .flat_map(|(_, tags)| tags.iter().copied());

    let mut tags = TagSet::from_ordered(matched);
    if tags.is_empty() {
        tags = TagSet::from_ordered([DEFAULT_TAG]);
    }

    debug!(description = %description, tags = ?tags.as_slice(), "Mapped description to tags");
    tags
}
