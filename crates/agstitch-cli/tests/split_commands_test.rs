use agstitch_testing::assertions::{assert_all_session_ids, read_jsonl};
use agstitch_testing::{SessionBuilder, TestWorld};
use std::path::PathBuf;

const PROJECT_A: &str = "/Users/test_user/project-a";
const PROJECT_B: &str = "/Users/test_user/project-b";

/// Five sessions, three of them titled "x" across two projects
fn corpus() -> TestWorld {
    TestWorld::new()
        .with_session(
            PROJECT_A,
            SessionBuilder::new("x1").starting_at("2025-01-01T10:00:00Z").user("one").title("x"),
        )
        .with_session(
            PROJECT_B,
            SessionBuilder::new("x2").starting_at("2025-01-02T10:00:00Z").user("two").title("x"),
        )
        .with_session(
            PROJECT_A,
            SessionBuilder::new("x3").starting_at("2025-01-03T10:00:00Z").user("three").title("x"),
        )
        .with_session(PROJECT_A, SessionBuilder::new("solo").user("alone").title("y"))
        .with_session(PROJECT_B, SessionBuilder::new("untitled").user("plain"))
}

fn merged_dir(world: &TestWorld) -> PathBuf {
    world.corpus_root().join("-agstitch-merged")
}

#[test]
fn test_split_list_reports_one_group() -> anyhow::Result<()> {
    let world = corpus();

    let result = world.run_json(&["split", "list"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let groups = result.json()?["content"]["groups"].clone();
    let groups = groups.as_array().cloned().unwrap_or_default();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["tag"], "x");

    let ids: Vec<&str> = groups[0]["members"]
        .as_array()
        .map(|m| m.iter().filter_map(|s| s["id"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec!["x1", "x2", "x3"]);
    assert_eq!(groups[0]["suggested_command"], "agstitch merge x1 x2 x3 --name x");
    Ok(())
}

#[test]
fn test_split_list_empty_corpus() -> anyhow::Result<()> {
    let world = TestWorld::new();

    let result = world.run(&["split", "list"])?;
    assert!(result.success());
    assert!(result.stdout().contains("No split sessions found."));
    Ok(())
}

#[test]
fn test_split_merge_refuses_without_confirmation() -> anyhow::Result<()> {
    let world = corpus();
    let before = world.jsonl_files();

    let result = world.run(&["split", "merge", "--delete"])?;
    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("pass --yes"));
    assert_eq!(world.jsonl_files(), before);
    Ok(())
}

#[test]
fn test_split_merge_dry_run() -> anyhow::Result<()> {
    let world = corpus();
    let before = world.jsonl_files();

    let result = world.run_json(&["split", "merge", "--dry-run"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;

    let content = &json["content"];
    assert_eq!(content["dry_run"], true);
    assert_eq!(content["groups"][0]["merge"]["status"], "planned");
    assert_eq!(world.jsonl_files(), before);
    Ok(())
}

#[test]
fn test_split_merge_all_groups() -> anyhow::Result<()> {
    let world = corpus();

    let result = world.run_json(&["split", "merge", "--yes", "--delete"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;

    let content = &json["content"];
    assert_eq!(content["merged"], 1);
    assert_eq!(content["failed"], 0);
    let target_id = content["groups"][0]["merge"]["target_id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("no target id"))?;

    let target = merged_dir(&world).join(format!("{}.jsonl", target_id));
    let records = read_jsonl(&target)?;
    // three messages, three title lines, one marker
    assert_eq!(records.len(), 7);
    assert_all_session_ids(&records, &target_id)?;
    assert!(records.iter().all(|r| r["customTitle"] == "x"));

    for id in ["x1", "x3"] {
        assert!(!world.session_path(PROJECT_A, id).exists());
    }
    assert!(!world.session_path(PROJECT_B, "x2").exists());
    assert!(world.session_path(PROJECT_A, "solo").exists());
    assert!(world.session_path(PROJECT_B, "untitled").exists());

    // The merged output is not offered for merging again
    let again = world.run_json(&["split", "list"])?;
    assert_eq!(again.json()?["content"]["groups"].as_array().map(Vec::len), Some(0));
    Ok(())
}
