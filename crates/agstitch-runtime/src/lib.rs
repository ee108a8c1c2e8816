pub mod config;
pub mod error;
pub mod ops;

pub use config::Config;
pub use error::{Error, Result};
pub use ops::{
    CorpusService, GroupOutcome, MergeOutcome, MergePipeline, MergePlan, MergeProgress,
    MergeReport, MergeRequest, PlannedSource, Scope, SessionInspection, SplitProgress,
    SplitService, WrittenFragment,
};
