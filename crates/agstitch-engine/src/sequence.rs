use crate::trunk::Trunk;
use agstitch_types::{Fragment, FragmentId, RecordId, Timestamp};
use serde::Serialize;
use std::collections::HashMap;

/// Chronological merge order: earliest timestamp ascending, fragments
/// without any timestamp last. The sort is stable, so equal keys keep the
/// order they were given in.
pub fn order_fragments(mut fragments: Vec<Fragment>) -> Vec<Fragment> {
    fragments.sort_by_cached_key(|f| f.earliest_timestamp().unwrap_or(Timestamp::MAX));
    fragments
}

/// One rewritten boundary: `record` in `fragment` gets `new_parent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Splice {
    pub fragment: FragmentId,
    pub record: RecordId,
    pub new_parent: RecordId,
}

/// Trunk roots to re-parent, keyed by fragment so that an id reused in two
/// fragments is still rewritten only where it is a boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpliceMap {
    entries: HashMap<(FragmentId, RecordId), RecordId>,
    order: Vec<Splice>,
}

impl SpliceMap {
    pub fn get(&self, fragment: &FragmentId, record: &str) -> Option<&RecordId> {
        self.entries
            .get(&(fragment.clone(), RecordId::from(record)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Splices in merge order
    pub fn splices(&self) -> &[Splice] {
        &self.order
    }

    fn insert(&mut self, splice: Splice) {
        self.entries.insert(
            (splice.fragment.clone(), splice.record.clone()),
            splice.new_parent.clone(),
        );
        self.order.push(splice);
    }
}

/// Link consecutive trunks: each trunk root adopts the previous trunk's leaf.
///
/// `ordered` must already be in merge order. A fragment without a trunk is
/// passed over, and the next trunk links to the last one seen before it.
pub fn build_splice_map(ordered: &[(FragmentId, Option<&Trunk>)]) -> SpliceMap {
    let mut map = SpliceMap::default();
    let mut previous: Option<&Trunk> = None;

    for (fragment, trunk) in ordered {
        let Some(trunk) = *trunk else {
            continue;
        };
        if let Some(prev) = previous
            && prev.leaf != trunk.root
        {
            map.insert(Splice {
                fragment: fragment.clone(),
                record: trunk.root.clone(),
                new_parent: prev.leaf.clone(),
            });
        }
        previous = Some(trunk);
    }

    map
}
