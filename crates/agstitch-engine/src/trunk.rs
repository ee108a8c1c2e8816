use agstitch_types::{Fragment, Record, RecordId};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// The longest parent chain of a fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trunk {
    pub root: RecordId,
    pub leaf: RecordId,
    /// Chain members, root first
    pub members: Vec<RecordId>,
}

impl Trunk {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.as_str() == id)
    }
}

/// Trunk plus the tree shape observed while finding it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrunkAnalysis {
    pub trunk: Option<Trunk>,
    /// Distinct record ids in the fragment
    pub identified: usize,
    /// Records without a parent
    pub roots: usize,
    /// Records nothing points to; more than one means the tree branches
    pub leaves: usize,
    /// Parent references that point outside the fragment
    pub dangling_parents: usize,
    /// A walk revisited a record and was cut short
    pub cycle_detected: bool,
}

/// Find the main trunk of a fragment.
///
/// Every leaf is walked back to its root; the longest chain wins and the
/// first such leaf in file order breaks ties. Returns `None` when no record
/// carries an id.
pub fn extract_trunk(fragment: &Fragment) -> Option<Trunk> {
    analyze_trunk(fragment).trunk
}

pub fn analyze_trunk(fragment: &Fragment) -> TrunkAnalysis {
    // Arena keyed by id; a duplicated id resolves to its first record
    let mut arena: HashMap<&str, &Record> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for record in fragment.records() {
        if let Some(id) = record.id()
            && let Entry::Vacant(slot) = arena.entry(id)
        {
            slot.insert(record);
            order.push(id);
        }
    }

    let referenced: HashSet<&str> = arena.values().filter_map(|r| r.parent_id()).collect();

    let mut analysis = TrunkAnalysis {
        identified: order.len(),
        ..TrunkAnalysis::default()
    };
    for id in &order {
        match arena.get(id).copied().and_then(Record::parent_id) {
            None => analysis.roots += 1,
            Some(parent) if !arena.contains_key(parent) => analysis.dangling_parents += 1,
            Some(_) => {}
        }
    }

    let mut starts: Vec<&str> = order
        .iter()
        .copied()
        .filter(|id| !referenced.contains(id))
        .collect();
    analysis.leaves = starts.len();

    // Pure cycles have no leaf; start from the first record so the guard
    // still yields a partial chain.
    if starts.is_empty()
        && let Some(&first) = order.first()
    {
        starts.push(first);
    }

    let mut best: Option<Vec<&str>> = None;
    for start in starts {
        let (chain, cut) = walk_to_root(&arena, start);
        analysis.cycle_detected |= cut;
        if best.as_ref().is_none_or(|b| chain.len() > b.len()) {
            best = Some(chain);
        }
    }

    analysis.trunk = best.and_then(|mut chain| {
        chain.reverse();
        let root = RecordId::from(*chain.first()?);
        let leaf = RecordId::from(*chain.last()?);
        Some(Trunk {
            root,
            leaf,
            members: chain.into_iter().map(RecordId::from).collect(),
        })
    });

    analysis
}

/// Follow parent links from `leaf`, leaf first.
///
/// Stops at a root, at a parent outside the arena, or on revisiting a record
/// (second value is `true` in that case).
fn walk_to_root<'a>(arena: &HashMap<&'a str, &'a Record>, leaf: &'a str) -> (Vec<&'a str>, bool) {
    let mut chain = vec![leaf];
    let mut seen: HashSet<&str> = HashSet::from([leaf]);
    let mut current = leaf;

    loop {
        let Some(parent) = arena.get(current).copied().and_then(Record::parent_id) else {
            return (chain, false);
        };
        let Some((&parent, _)) = arena.get_key_value(parent) else {
            return (chain, false);
        };
        if !seen.insert(parent) {
            return (chain, true);
        }
        chain.push(parent);
        current = parent;
    }
}
