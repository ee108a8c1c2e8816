mod merge;
mod session;
mod split;

pub use merge::{merge_view_model, present_merge};
pub use session::{list_entry, present_session_detail, present_session_list};
pub use split::{present_split_list, present_split_merge, suggested_merge_command};
