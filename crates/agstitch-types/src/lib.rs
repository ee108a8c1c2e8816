pub mod error;
pub mod fragment;
pub mod ids;
pub mod record;
pub mod timestamp;

pub use error::{Error, Result};
pub use fragment::{Fragment, FragmentLoad, ParseWarning};
pub use ids::{FragmentId, RecordId};
pub use record::{Record, keys};
pub use timestamp::Timestamp;
