use agstitch_testing::assertions::{
    assert_all_session_ids, assert_chain_connected, assert_sorted_by_timestamp, read_jsonl,
};
use agstitch_testing::{SessionBuilder, TestWorld};
use serde_json::json;

const PROJECT: &str = "/Users/test_user/agent-sample";

fn split_pair() -> (TestWorld, SessionBuilder, SessionBuilder) {
    let a = SessionBuilder::new("aaaa1111")
        .starting_at("2025-01-01T10:00:00Z")
        .user("start")
        .assistant("ok");
    let b = SessionBuilder::new("bbbb2222")
        .starting_at("2025-01-01T12:00:00Z")
        .user("resume");
    let world = TestWorld::new()
        .with_session(PROJECT, b.clone())
        .with_session(PROJECT, a.clone());
    (world, a, b)
}

#[test]
fn test_merge_two_sessions() -> anyhow::Result<()> {
    let (world, a, b) = split_pair();

    let result = world.run_json(&["merge", "bbbb", "aaaa", "--id", "joined", "--name", "S"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;

    let content = &json["content"];
    assert_eq!(content["status"], "merged");
    assert_eq!(content["sources"][0]["id"], "aaaa1111");
    assert_eq!(content["records_written"], 4);

    let records = read_jsonl(&world.session_path(PROJECT, "joined"))?;
    assert_eq!(records.len(), 4);
    assert_eq!(records[0]["uuid"], a.uuids()[0].as_str());
    assert_eq!(records[1]["uuid"], a.uuids()[1].as_str());
    assert_eq!(records[2]["uuid"], b.uuids()[0].as_str());
    assert_eq!(records[2]["parentUuid"], a.uuids()[1].as_str());
    assert_eq!(records[3]["type"], "custom-title");
    assert_all_session_ids(&records, "joined")?;
    assert_sorted_by_timestamp(&records)?;
    assert_chain_connected(&records, &b.uuids()[0], 2)?;

    // Sources stay without --delete
    assert!(world.session_path(PROJECT, "aaaa1111").exists());
    assert!(world.session_path(PROJECT, "bbbb2222").exists());
    Ok(())
}

#[test]
fn test_merge_without_name_adds_no_marker() -> anyhow::Result<()> {
    let (world, _, _) = split_pair();

    let result = world.run(&["merge", "aaaa1111", "bbbb2222", "--id", "plain"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let records = read_jsonl(&world.session_path(PROJECT, "plain"))?;
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r["type"] != "custom-title"));
    Ok(())
}

#[test]
fn test_merge_dry_run_changes_nothing() -> anyhow::Result<()> {
    let (world, _, _) = split_pair();
    let before = world.jsonl_files();

    let result = world.run_json(&["merge", "aaaa", "bbbb", "--delete", "--dry-run"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;

    let content = &json["content"];
    assert_eq!(content["status"], "planned");
    assert_eq!(content["sources"].as_array().map(Vec::len), Some(2));
    assert!(content["records_written"].is_null());
    assert_eq!(world.jsonl_files(), before);
    Ok(())
}

#[test]
fn test_merge_delete_removes_sources() -> anyhow::Result<()> {
    let (world, _, _) = split_pair();

    let result = world.run(&["merge", "aaaa", "bbbb", "--id", "joined", "--delete"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    assert!(world.session_path(PROJECT, "joined").exists());
    assert!(!world.session_path(PROJECT, "aaaa1111").exists());
    assert!(!world.session_path(PROJECT, "bbbb2222").exists());
    Ok(())
}

#[test]
fn test_merge_needs_two_sessions() -> anyhow::Result<()> {
    let (world, _, _) = split_pair();
    let before = world.jsonl_files();

    let result = world.run(&["merge", "aaaa"])?;
    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("At least two sessions"));
    assert_eq!(world.jsonl_files(), before);
    Ok(())
}

#[test]
fn test_merge_unknown_session_fails_before_writing() -> anyhow::Result<()> {
    let (world, _, _) = split_pair();
    let before = world.jsonl_files();

    let result = world.run(&["merge", "aaaa", "nope", "--delete"])?;
    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("Session not found: nope"));
    assert_eq!(world.jsonl_files(), before);
    Ok(())
}

#[test]
fn test_merge_into_existing_id_is_refused() -> anyhow::Result<()> {
    let (world, _, _) = split_pair();

    let result = world.run(&["merge", "aaaa", "bbbb", "--id", "aaaa1111"])?;
    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("already exists"));
    Ok(())
}

#[test]
fn test_merge_warns_once_per_malformed_line() -> anyhow::Result<()> {
    let mut a = SessionBuilder::new("aaaa1111").user("u1");
    for i in 0..9 {
        a = if i == 1 {
            a.malformed()
        } else if i % 2 == 0 {
            a.assistant("reply")
        } else {
            a.user("more")
        };
    }
    let b = SessionBuilder::new("bbbb2222")
        .starting_at("2025-02-01T00:00:00Z")
        .user("later")
        .raw(json!({"type": "summary", "summary": "kept as is", "leafUuid": "x"}));
    let world = TestWorld::new()
        .with_session(PROJECT, a)
        .with_session(PROJECT, b);

    let result = world.run_json(&["merge", "aaaa", "bbbb", "--id", "joined"])?;
    assert!(result.success(), "stderr: {}", result.stderr());
    assert_eq!(result.stderr().matches("skipped malformed record").count(), 1);

    // 9 of 10 lines from the first file, both lines of the second
    let records = read_jsonl(&world.session_path(PROJECT, "joined"))?;
    assert_eq!(records.len(), 11);
    let summary = records
        .iter()
        .find(|r| r["type"] == "summary")
        .ok_or_else(|| anyhow::anyhow!("summary record missing"))?;
    assert_eq!(summary["summary"], "kept as is");
    assert_eq!(summary["leafUuid"], "x");
    Ok(())
}
