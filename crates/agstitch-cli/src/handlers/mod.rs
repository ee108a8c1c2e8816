mod progress;

pub mod merge;
pub mod session_list;
pub mod session_show;
pub mod split_list;
pub mod split_merge;
