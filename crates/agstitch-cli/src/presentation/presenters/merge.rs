use crate::presentation::view_models::{
    CommandResultViewModel, MergeResultViewModel, PlannedSourceViewModel, SidechainViewModel,
    SpliceViewModel, StatusBadge,
};
use agstitch_runtime::{MergeOutcome, MergePlan};

fn plan_sources(plan: &MergePlan) -> Vec<PlannedSourceViewModel> {
    plan.sources
        .iter()
        .map(|s| PlannedSourceViewModel {
            id: s.id.clone(),
            path: s.path.display().to_string(),
            size_bytes: s.size_bytes,
            first_timestamp: s.first_timestamp.map(|t| t.to_rfc3339()),
            record_count: s.record_count,
            sidechain_files: s.sidechain_files,
        })
        .collect()
}

pub fn merge_view_model(outcome: &MergeOutcome) -> MergeResultViewModel {
    let plan = outcome.plan();
    let mut vm = MergeResultViewModel {
        status: "planned",
        target_id: plan.target_id.clone(),
        target_path: plan.target_path.display().to_string(),
        title: plan.title.clone(),
        delete_sources: plan.delete_sources,
        sources: plan_sources(plan),
        records_written: None,
        message_count: None,
        splices: Vec::new(),
        unlinked: Vec::new(),
        sidechains: Vec::new(),
        catalog: None,
        deleted: Vec::new(),
        warnings: Vec::new(),
    };

    if let MergeOutcome::Merged(report) = outcome {
        vm.status = "merged";
        vm.records_written = Some(report.records_written);
        vm.message_count = Some(report.message_count);
        vm.splices = report
            .splices
            .iter()
            .map(|s| SpliceViewModel {
                fragment: s.fragment.to_string(),
                record: s.record.to_string(),
                new_parent: s.new_parent.to_string(),
            })
            .collect();
        vm.unlinked = report.unlinked.iter().map(ToString::to_string).collect();
        vm.sidechains = report
            .sidechains
            .iter()
            .map(|c| SidechainViewModel {
                from: c.from.display().to_string(),
                to: c.to.display().to_string(),
                renamed: c.renamed,
            })
            .collect();
        vm.catalog = report.catalog.as_ref().map(|p| p.display().to_string());
        vm.deleted = report
            .deleted
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        vm.warnings = report.warnings.clone();
    }

    vm
}

pub fn present_merge(outcome: &MergeOutcome) -> CommandResultViewModel<MergeResultViewModel> {
    let vm = merge_view_model(outcome);
    let badge = match outcome {
        MergeOutcome::Planned(plan) => StatusBadge::info(format!(
            "Dry run: would merge {} sessions into {}",
            plan.sources.len(),
            plan.target_id
        )),
        MergeOutcome::Merged(report) if report.warnings.is_empty() => StatusBadge::success(format!(
            "Merged {} sessions into {}",
            report.plan.sources.len(),
            report.plan.target_id
        )),
        MergeOutcome::Merged(report) => StatusBadge::warning(format!(
            "Merged {} sessions into {} with {} warning(s)",
            report.plan.sources.len(),
            report.plan.target_id,
            report.warnings.len()
        )),
    };
    CommandResultViewModel::new(vm).with_badge(badge)
}
