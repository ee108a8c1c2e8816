use agstitch_testing::{SessionBuilder, TestWorld, assertions};
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const PROJECT_A: &str = "/Users/test_user/project-a";
const PROJECT_B: &str = "/Users/test_user/project-b";

fn two_project_world() -> TestWorld {
    TestWorld::new()
        .with_session(PROJECT_A, SessionBuilder::new("aaaa1111").cwd(PROJECT_A).user("first"))
        .with_session(
            PROJECT_A,
            SessionBuilder::new("aaaa2222")
                .cwd(PROJECT_A)
                .starting_at("2025-01-05T10:00:00Z")
                .user("second"),
        )
        .with_session(PROJECT_B, SessionBuilder::new("bbbb1111").cwd(PROJECT_B).user("other"))
}

#[test]
fn test_session_list_all_projects() -> anyhow::Result<()> {
    let world = two_project_world();

    let result = world.run_json(&["session", "list", "--all-projects"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;
    assertions::assert_session_count(&json, 3)?;
    assert_eq!(json["content"]["project_filter"], serde_json::Value::Null);
    Ok(())
}

#[test]
fn test_session_list_scoped_to_project_newest_first() -> anyhow::Result<()> {
    let world = two_project_world();

    let result = world.run_json(&["session", "list", "--project-root", PROJECT_A])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;
    assertions::assert_session_count(&json, 2)?;
    assert_eq!(json["content"]["sessions"][0]["id"], "aaaa2222");
    assert_eq!(json["content"]["sessions"][1]["id"], "aaaa1111");
    Ok(())
}

#[test]
fn test_session_list_limit() -> anyhow::Result<()> {
    let world = two_project_world();

    let result = world.run_json(&["session", "list", "--all-projects", "--limit", "1"])?;
    let json = result.json()?;
    assertions::assert_session_count(&json, 1)?;
    assert_eq!(json["content"]["total_count"], 3);
    Ok(())
}

#[test]
fn test_session_list_plain_output() {
    let world = two_project_world();

    let mut cmd = cargo_bin_cmd!("agstitch");
    world
        .configure_command(&mut cmd)
        .args(["session", "list", "--project-root", PROJECT_B]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bbbb1111"))
        .stdout(predicate::str::contains("other"))
        .stdout(predicate::str::contains("aaaa1111").not());
}

#[test]
fn test_session_show_reports_trunk_and_warnings() -> anyhow::Result<()> {
    let world = TestWorld::new().with_session(
        PROJECT_A,
        SessionBuilder::new("cccc3333")
            .user("q")
            .assistant("a1")
            .malformed()
            .retry("a2")
            .user("next")
            .title("demo"),
    );

    let result = world.run_json(&["session", "show", "cccc"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;

    let content = &json["content"];
    assert_eq!(content["id"], "cccc3333");
    assert_eq!(content["group_tag"], "demo");
    assert_eq!(content["malformed_lines"], 1);
    assert_eq!(content["trunk"]["length"], 3);
    assert_eq!(content["branches"], 1);
    assert_eq!(content["warnings"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn test_session_show_unknown_id_fails() -> anyhow::Result<()> {
    let world = two_project_world();

    let result = world.run(&["session", "show", "zzzz"])?;
    assert_eq!(result.code(), Some(1));
    assert!(result.stderr().contains("Error: Session not found: zzzz"));
    Ok(())
}
