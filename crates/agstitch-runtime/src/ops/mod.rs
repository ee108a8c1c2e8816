mod corpus;
mod merge;
mod split;

pub use corpus::{CorpusService, Scope, SessionInspection};
pub use merge::{
    MergeOutcome, MergePipeline, MergePlan, MergeProgress, MergeReport, MergeRequest,
    PlannedSource, WrittenFragment,
};
pub use split::{GroupOutcome, SplitProgress, SplitService};
