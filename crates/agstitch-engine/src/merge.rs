use crate::sequence::{Splice, build_splice_map, order_fragments};
use crate::trunk::{Trunk, extract_trunk};
use agstitch_types::{Fragment, FragmentId, Record, Timestamp};

#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// `sessionId` written to every output record
    pub session_id: String,
    /// New `customTitle`; when set it goes on every record and a title
    /// marker is appended
    pub title: Option<String>,
    /// Timestamp of the title marker
    pub now: Timestamp,
}

#[derive(Debug, Clone)]
pub struct StitchOutput {
    pub records: Vec<Record>,
    /// Fragment ids in merge order
    pub order: Vec<FragmentId>,
    /// Trunk of each fragment, in merge order
    pub trunks: Vec<(FragmentId, Option<Trunk>)>,
    pub splices: Vec<Splice>,
    pub marker_appended: bool,
}

/// Merge fragments into one chronological, singly-linked conversation.
///
/// Records are ordered by timestamp with a stable sort over (merge order,
/// file order). Each fragment boundary rewrites exactly one `parentUuid`;
/// every record gets the new `sessionId`.
pub fn stitch(fragments: Vec<Fragment>, options: &MergeOptions) -> StitchOutput {
    let ordered = order_fragments(fragments);

    let trunks: Vec<(FragmentId, Option<Trunk>)> = ordered
        .iter()
        .map(|f| (f.id().clone(), extract_trunk(f)))
        .collect();
    let links: Vec<(FragmentId, Option<&Trunk>)> = trunks
        .iter()
        .map(|(id, trunk)| (id.clone(), trunk.as_ref()))
        .collect();
    let splice_map = build_splice_map(&links);

    let order: Vec<FragmentId> = ordered.iter().map(|f| f.id().clone()).collect();
    let mut keyed: Vec<(Timestamp, Record)> = Vec::new();

    for fragment in ordered {
        let fragment_id = fragment.id().clone();
        let keys = sort_keys(&fragment);
        let mut spliced = false;

        for (mut record, key) in fragment.into_records().into_iter().zip(keys) {
            record.set_session_label(&options.session_id);
            if let Some(title) = &options.title {
                record.set_group_tag(title);
            }
            if !spliced
                && let Some(new_parent) = record
                    .id()
                    .and_then(|id| splice_map.get(&fragment_id, id))
            {
                record.set_parent_id(new_parent);
                spliced = true;
            }
            keyed.push((key, record));
        }
    }

    keyed.sort_by_key(|(key, _)| *key);
    let mut records: Vec<Record> = keyed.into_iter().map(|(_, record)| record).collect();

    let marker_appended = match &options.title {
        Some(title) => {
            records.push(Record::title_marker(title, &options.session_id, options.now));
            true
        }
        None => false,
    };

    StitchOutput {
        records,
        order,
        trunks,
        splices: splice_map.splices().to_vec(),
        marker_appended,
    }
}

/// Sort key per record. Untimed records inherit the last timestamp seen
/// above them, or the fragment's earliest one before any.
fn sort_keys(fragment: &Fragment) -> Vec<Timestamp> {
    let mut carried = fragment.earliest_timestamp().unwrap_or(Timestamp::MAX);
    fragment
        .records()
        .iter()
        .map(|record| {
            if let Some(ts) = record.timestamp() {
                carried = ts;
            }
            carried
        })
        .collect()
}
