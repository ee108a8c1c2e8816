pub mod common;
pub mod merge;
pub mod result;
pub mod session;
pub mod split;

pub use common::{Guidance, StatusBadge, StatusLevel};
pub use merge::{
    MergeResultViewModel, PlannedSourceViewModel, SidechainViewModel, SpliceViewModel,
};
pub use result::CommandResultViewModel;
pub use session::{SessionDetailViewModel, SessionListEntry, SessionListViewModel, TrunkViewModel};
pub use split::{GroupResultViewModel, SplitGroupViewModel, SplitListViewModel, SplitMergeViewModel};
