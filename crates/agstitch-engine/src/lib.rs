// Engine - pure stitching logic over parsed fragments.
// No I/O happens here; callers load fragments and persist the output.

pub mod grouping;
pub mod merge;
pub mod sequence;
pub mod trunk;

pub use grouping::{SplitGroup, find_split_groups};
pub use merge::{MergeOptions, StitchOutput, stitch};
pub use sequence::{Splice, SpliceMap, build_splice_map, order_fragments};
pub use trunk::{Trunk, TrunkAnalysis, analyze_trunk, extract_trunk};
