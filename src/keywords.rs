use crate::models::{Entry, KeywordTag, WeightedTag};
use std::collections::HashMap;

/// Counts keywords across `entries`, most frequent first.
///
/// Ties keep the order in which each keyword was first seen. An input with no
/// keywords at all yields an empty vector, which views render as "no data".
pub fn aggregate(entries: &[Entry]) -> Vec<KeywordTag> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut tags: Vec<KeywordTag> = Vec::new();

    for keyword in entries.iter().flat_map(|entry| entry.keywords.iter()) {
        match positions.get(keyword.as_str()) {
            Some(&index) => tags[index].count += 1,
            None => {
                positions.insert(keyword.as_str(), tags.len());
                tags.push(KeywordTag {
                    value: keyword.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable sort keeps first-occurrence order among equal counts
    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags
}

/// Maps `tag.count` linearly onto `[min_size, max_size]` relative to `all_tags`.
pub fn weight(tag: &KeywordTag, all_tags: &[KeywordTag], min_size: f64, max_size: f64) -> f64 {
    let counts = all_tags.iter().map(|t| t.count).chain(std::iter::once(tag.count));
    let (min_count, max_count) = counts.fold((u32::MAX, u32::MIN), |(lo, hi), count| {
        (lo.min(count), hi.max(count))
    });

    if max_count == min_count {
        return (min_size + max_size) / 2.0;
    }

    let ratio = f64::from(tag.count - min_count) / f64::from(max_count - min_count);
    min_size + ratio * (max_size - min_size)
}

/// Top `limit` keywords of `entries` with weights computed among the shown tags.
pub fn cloud(entries: &[Entry], limit: usize, min_size: f64, max_size: f64) -> Vec<WeightedTag> {
    let mut tags = aggregate(entries);
    tags.truncate(limit);

    tags.iter()
        .map(|tag| WeightedTag {
            value: tag.value.clone(),
            count: tag.count,
            weight: weight(tag, &tags, min_size, max_size),
        })
        .collect()
}
