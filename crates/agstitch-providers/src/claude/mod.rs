mod discovery;
mod io;
mod sidechain;

pub use discovery::{is_fragment_file, project_log_dir, scan_corpus, scan_project_dir};
pub use io::{read_fragment, remove_fragment, summarize_fragment, write_fragment};
pub use sidechain::{SidechainCopy, copy_sidechains, sidechain_dir, sidechain_files};

use agstitch_types::FragmentId;
use std::path::Path;

/// Fragment identifier for a session file: its stem
pub(crate) fn fragment_id_from_path(path: &Path) -> crate::Result<FragmentId> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(FragmentId::from)
        .ok_or_else(|| crate::Error::NotAFragment(path.to_path_buf()))
}
