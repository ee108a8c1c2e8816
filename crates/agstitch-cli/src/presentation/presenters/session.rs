use crate::presentation::view_models::{
    CommandResultViewModel, Guidance, SessionDetailViewModel, SessionListEntry,
    SessionListViewModel, StatusBadge, TrunkViewModel,
};
use agstitch_providers::FragmentSummary;
use agstitch_runtime::{Scope, SessionInspection};

pub fn list_entry(summary: &FragmentSummary) -> SessionListEntry {
    SessionListEntry {
        id: summary.id.clone(),
        path: summary.path.display().to_string(),
        project_root: summary.project_root.clone(),
        first_timestamp: summary.first_timestamp.map(|t| t.to_rfc3339()),
        last_timestamp: summary.last_timestamp.map(|t| t.to_rfc3339()),
        message_count: summary.message_count,
        size_bytes: summary.size_bytes,
        group_tag: summary.group_tag.clone(),
        preview: summary.preview.clone(),
    }
}

pub fn present_session_list(
    sessions: &[FragmentSummary],
    scope: &Scope,
    limit: usize,
    preview_chars: usize,
) -> CommandResultViewModel<SessionListViewModel> {
    let project_filter = match scope {
        Scope::All => None,
        Scope::Project(root) => Some(root.display().to_string()),
    };
    let is_empty = sessions.is_empty();
    let scoped = project_filter.is_some();

    let content = SessionListViewModel {
        sessions: sessions.iter().take(limit).map(list_entry).collect(),
        total_count: sessions.len(),
        project_filter,
        limit,
        preview_chars,
    };

    let mut result = CommandResultViewModel::new(content);
    if is_empty && scoped {
        result = result.with_suggestion(
            Guidance::new("List sessions of every project").with_command("agstitch session list --all-projects"),
        );
    }
    result
}

pub fn present_session_detail(
    inspection: SessionInspection,
) -> CommandResultViewModel<SessionDetailViewModel> {
    let SessionInspection {
        summary,
        analysis,
        warnings,
    } = inspection;

    let trunk = analysis.trunk.as_ref().map(|t| TrunkViewModel {
        root: t.root.to_string(),
        leaf: t.leaf.to_string(),
        length: t.len(),
    });
    let linkable = trunk.is_some();

    let content = SessionDetailViewModel {
        id: summary.id.to_string(),
        path: summary.path.display().to_string(),
        project_dir: summary.project_dir.display().to_string(),
        project_root: summary.project_root,
        size_bytes: summary.size_bytes,
        modified: summary.modified,
        record_count: summary.record_count,
        message_count: summary.message_count,
        malformed_lines: summary.malformed_lines,
        first_timestamp: summary.first_timestamp.map(|t| t.to_rfc3339()),
        last_timestamp: summary.last_timestamp.map(|t| t.to_rfc3339()),
        group_tag: summary.group_tag,
        preview: summary.preview,
        sidechain_files: summary
            .sidechain_files
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        trunk,
        identified_records: analysis.identified,
        roots: analysis.roots,
        leaves: analysis.leaves,
        branches: analysis.leaves.saturating_sub(1),
        dangling_parents: analysis.dangling_parents,
        cycle_detected: analysis.cycle_detected,
        warnings,
    };

    let result = CommandResultViewModel::new(content);
    if linkable {
        result
    } else {
        result.with_badge(StatusBadge::warning(
            "No record carries an id; this session cannot be linked into a merge",
        ))
    }
}
