use agstitch_engine::{MergeOptions, extract_trunk, find_split_groups, stitch};
use agstitch_types::{Fragment, FragmentId, Record, Timestamp};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Fragment with a branching tree: a linear chain of `len` records, a
/// retried step hanging off the second record, and one untimed metadata line.
fn branching_fragment(id: &str, start_minute: u32, len: usize) -> Fragment {
    let mut lines: Vec<Value> = Vec::new();
    let mut parent: Option<String> = None;
    for i in 0..len {
        let uuid = format!("{}-{}", id, i);
        let kind = if i % 2 == 0 { "user" } else { "assistant" };
        lines.push(json!({
            "parentUuid": parent,
            "isSidechain": false,
            "type": kind,
            "uuid": uuid,
            "sessionId": id,
            "timestamp": format!("2025-06-01T10:{:02}:00.000Z", start_minute + i as u32),
            "opaque": { "n": i, "id": id },
        }));
        if i == 1 {
            lines.push(json!({
                "parentUuid": uuid,
                "type": "assistant",
                "uuid": format!("{}-retry", id),
                "sessionId": id,
                "timestamp": format!("2025-06-01T10:{:02}:30.000Z", start_minute + i as u32),
            }));
            lines.push(json!({ "type": "file-history-snapshot", "messageId": uuid }));
        }
        parent = Some(uuid);
    }

    let text = lines
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    Fragment::parse(FragmentId::new(id), id, &text).fragment
}

fn corpus() -> Vec<Fragment> {
    vec![
        branching_fragment("late", 40, 4),
        branching_fragment("first", 0, 5),
        branching_fragment("middle", 20, 4),
    ]
}

fn options(title: Option<&str>) -> MergeOptions {
    MergeOptions {
        session_id: "merged-session".to_string(),
        title: title.map(str::to_string),
        now: Timestamp::parse("2025-07-01T00:00:00Z").unwrap(),
    }
}

#[test]
fn test_record_count_is_sum_plus_marker() {
    let input_count: usize = corpus().iter().map(Fragment::len).sum();

    let titled = stitch(corpus(), &options(Some("one conversation")));
    assert_eq!(titled.records.len(), input_count + 1);

    let untitled = stitch(corpus(), &options(None));
    assert_eq!(untitled.records.len(), input_count);
}

#[test]
fn test_output_is_chronological_with_marker_last() {
    let out = stitch(corpus(), &options(Some("t")));
    let (marker, body) = out.records.split_last().unwrap();

    assert_eq!(marker.record_type(), Some("custom-title"));
    let stamps: Vec<Timestamp> = body.iter().filter_map(Record::timestamp).collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_every_record_has_new_session_id() {
    let out = stitch(corpus(), &options(Some("t")));
    assert!(
        out.records
            .iter()
            .all(|r| r.session_label() == Some("merged-session"))
    );
}

#[test]
fn test_trunks_are_chained_across_fragments() {
    let fragments = corpus();
    let trunks: HashMap<String, _> = fragments
        .iter()
        .map(|f| (f.id().to_string(), extract_trunk(f).unwrap()))
        .collect();
    let out = stitch(fragments, &options(None));

    let by_id: HashMap<&str, &Record> = out
        .records
        .iter()
        .filter_map(|r| r.id().map(|id| (id, r)))
        .collect();
    assert_eq!(
        by_id["middle-0"].parent_id(),
        Some(trunks["first"].leaf.as_str())
    );
    assert_eq!(
        by_id["late-0"].parent_id(),
        Some(trunks["middle"].leaf.as_str())
    );
    assert_eq!(by_id["first-0"].parent_id(), None);

    // Retried branches keep their original parent
    assert_eq!(by_id["middle-retry"].parent_id(), Some("middle-1"));

    // Following parents from the last trunk leaf reaches the first root
    let mut current = trunks["late"].leaf.as_str();
    let mut hops = 0;
    while let Some(parent) = by_id[current].parent_id() {
        current = parent;
        hops += 1;
    }
    assert_eq!(current, "first-0");
    assert_eq!(hops, 5 + 4 + 4 - 1);
}

#[test]
fn test_trunk_ignores_retry_branch() {
    let fragment = branching_fragment("f", 0, 4);
    let trunk = extract_trunk(&fragment).unwrap();

    assert_eq!(trunk.root.as_str(), "f-0");
    assert_eq!(trunk.leaf.as_str(), "f-3");
    assert_eq!(trunk.len(), 4);
    assert!(!trunk.contains("f-retry"));
}

#[test]
fn test_opaque_fields_round_trip() {
    let out = stitch(corpus(), &options(None));
    let record = out
        .records
        .iter()
        .find(|r| r.id() == Some("middle-2"))
        .unwrap();

    assert_eq!(record.get("opaque"), Some(&json!({ "n": 2, "id": "middle" })));
    assert_eq!(record.get("isSidechain"), Some(&json!(false)));
}

#[test]
fn test_grouping_feeds_stitching() {
    let tagged = [("a", Some("auth")), ("b", None), ("c", Some("auth"))];
    let groups = find_split_groups(tagged, |(_, tag)| *tag);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].members.len(), 2);
}
