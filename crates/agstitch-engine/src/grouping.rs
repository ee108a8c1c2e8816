use serde::Serialize;
use std::collections::BTreeMap;

/// Fragments sharing one group tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitGroup<T> {
    pub tag: String,
    pub members: Vec<T>,
}

/// Bucket items by their group tag and keep buckets of two or more.
///
/// Items without a tag are never grouped. Groups come back sorted by tag and
/// members keep their input order. The function holds no state between
/// calls; every scan recomputes the groups from scratch.
pub fn find_split_groups<T, F>(items: impl IntoIterator<Item = T>, tag_of: F) -> Vec<SplitGroup<T>>
where
    F: Fn(&T) -> Option<&str>,
{
    let mut buckets: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for item in items {
        let Some(tag) = tag_of(&item).map(str::to_string) else {
            continue;
        };
        buckets.entry(tag).or_default().push(item);
    }

    buckets
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(tag, members)| SplitGroup { tag, members })
        .collect()
}
