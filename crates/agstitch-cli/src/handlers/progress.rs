use agstitch_runtime::{MergeProgress, SplitProgress};
use owo_colors::OwoColorize;

/// Route merge events: warnings to stderr for the user, the rest to the log
pub fn report_merge(event: &MergeProgress) {
    match event {
        MergeProgress::RecordSkipped { warning } => warn(warning),
        MergeProgress::CatalogSkipped { reason } => warn(reason),
        MergeProgress::DeleteFailed { path, reason } => {
            warn(&format!("failed to delete {}: {}", path.display(), reason))
        }
        MergeProgress::Planned { sources, target } => {
            tracing::debug!(sources, target = %target.display(), "planned merge")
        }
        MergeProgress::SourceLoaded { id, records } => {
            tracing::debug!(%id, records, "loaded source")
        }
        MergeProgress::Stitched { records, splices } => {
            tracing::debug!(records, splices, "stitched")
        }
        MergeProgress::Written { path, records } => {
            tracing::debug!(path = %path.display(), records, "written")
        }
        MergeProgress::SidechainCopied { copy } => {
            tracing::debug!(from = %copy.from.display(), to = %copy.to.display(), "side file copied")
        }
        MergeProgress::CatalogUpdated { path } => {
            tracing::debug!(path = %path.display(), "catalog updated")
        }
        MergeProgress::SourceDeleted { path } => {
            tracing::debug!(path = %path.display(), "source deleted")
        }
    }
}

pub fn report_split(event: &SplitProgress) {
    match event {
        SplitProgress::GroupStarted { tag, members } => {
            tracing::info!(%tag, members, "merging group")
        }
        SplitProgress::Merge { event, .. } => report_merge(event),
        SplitProgress::GroupFailed { tag, reason } => {
            tracing::debug!(%tag, %reason, "group failed")
        }
        SplitProgress::GroupFinished { tag } => tracing::debug!(%tag, "group finished"),
    }
}

fn warn(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}
