use super::merge::merge_view_model;
use super::session::list_entry;
use crate::presentation::formatters::text::shell_quote;
use crate::presentation::view_models::{
    CommandResultViewModel, GroupResultViewModel, Guidance, SplitGroupViewModel,
    SplitListViewModel, SplitMergeViewModel, StatusBadge,
};
use agstitch_engine::SplitGroup;
use agstitch_providers::FragmentSummary;
use agstitch_runtime::GroupOutcome;
use std::path::Path;

/// Copy-pasteable `agstitch merge` line for one group
pub fn suggested_merge_command(tag: &str, members: &[FragmentSummary]) -> String {
    let mut parts = vec!["agstitch".to_string(), "merge".to_string()];
    parts.extend(members.iter().map(|m| shell_quote(m.id.as_str())));
    parts.push("--name".to_string());
    parts.push(shell_quote(tag));
    parts.join(" ")
}

pub fn present_split_list(
    groups: &[SplitGroup<FragmentSummary>],
    preview_chars: usize,
) -> CommandResultViewModel<SplitListViewModel> {
    let groups_vm: Vec<SplitGroupViewModel> = groups
        .iter()
        .map(|group| SplitGroupViewModel {
            tag: group.tag.clone(),
            members: group.members.iter().map(list_entry).collect(),
            total_bytes: group.members.iter().map(|m| m.size_bytes).sum(),
            first_timestamp: group
                .members
                .iter()
                .filter_map(|m| m.first_timestamp)
                .min()
                .map(|t| t.to_rfc3339()),
            last_timestamp: group
                .members
                .iter()
                .filter_map(|m| m.last_timestamp)
                .max()
                .map(|t| t.to_rfc3339()),
            suggested_command: suggested_merge_command(&group.tag, &group.members),
        })
        .collect();

    let has_groups = !groups_vm.is_empty();
    let result = CommandResultViewModel::new(SplitListViewModel {
        groups: groups_vm,
        preview_chars,
    });
    if has_groups {
        result.with_suggestion(
            Guidance::new("Merge every group at once").with_command("agstitch split merge --dry-run"),
        )
    } else {
        result
    }
}

pub fn present_split_merge(
    outcomes: &[GroupOutcome],
    dry_run: bool,
    target_dir: &Path,
) -> CommandResultViewModel<SplitMergeViewModel> {
    let groups: Vec<GroupResultViewModel> = outcomes
        .iter()
        .map(|outcome| {
            let (merge, error) = match &outcome.result {
                Ok(merged) => (Some(merge_view_model(merged)), None),
                Err(err) => (None, Some(err.to_string())),
            };
            GroupResultViewModel {
                tag: outcome.tag.clone(),
                members: outcome.members.iter().map(|m| m.id.to_string()).collect(),
                merge,
                error,
            }
        })
        .collect();

    let failed = groups.iter().filter(|g| g.error.is_some()).count();
    let merged = groups.len() - failed;

    let badge = if failed > 0 {
        StatusBadge::error(format!("{} of {} groups failed", failed, groups.len()))
    } else if dry_run {
        StatusBadge::info(format!("Dry run: {} groups would be merged", merged))
    } else {
        StatusBadge::success(format!("Merged {} groups", merged))
    };

    CommandResultViewModel::new(SplitMergeViewModel {
        dry_run,
        target_dir: target_dir.display().to_string(),
        groups,
        merged,
        failed,
    })
    .with_badge(badge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agstitch_types::FragmentId;
    use std::path::PathBuf;

    fn member(id: &str) -> FragmentSummary {
        FragmentSummary {
            id: FragmentId::new(id),
            path: PathBuf::from(format!("/p/-w/{}.jsonl", id)),
            project_dir: PathBuf::from("/p/-w"),
            project_root: None,
            size_bytes: 100,
            modified: None,
            record_count: 2,
            message_count: 2,
            malformed_lines: 0,
            first_timestamp: None,
            last_timestamp: None,
            group_tag: Some("auth flow".to_string()),
            preview: None,
            sidechain_files: Vec::new(),
        }
    }

    #[test]
    fn test_suggested_merge_command() {
        let members = vec![member("aaaa1111"), member("bbbb2222")];
        insta::assert_snapshot!(
            suggested_merge_command("auth flow", &members),
            @"agstitch merge aaaa1111 bbbb2222 --name 'auth flow'"
        );
    }

    #[test]
    fn test_split_list_totals() {
        let groups = vec![SplitGroup {
            tag: "auth flow".to_string(),
            members: vec![member("a"), member("b"), member("c")],
        }];
        let result = present_split_list(&groups, 80);

        assert_eq!(result.content.groups.len(), 1);
        assert_eq!(result.content.groups[0].total_bytes, 300);
        assert_eq!(result.suggestions.len(), 1);
    }
}
