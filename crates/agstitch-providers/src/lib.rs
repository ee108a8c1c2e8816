// Error types
pub mod error;

// Claude Code corpus layout
pub mod claude;

// Fragment metadata
pub mod summary;

pub use claude::{
    SidechainCopy, copy_sidechains, is_fragment_file, project_log_dir, read_fragment,
    remove_fragment, scan_corpus, scan_project_dir, sidechain_dir, sidechain_files,
    summarize_fragment, write_fragment,
};
pub use error::{Error, Result};
pub use summary::FragmentSummary;
