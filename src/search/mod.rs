//! Option lookup for select fields.
//!
//! Static options filter locally on every keystroke. Remote sources are
//! queried once input has been quiet for the debounce delay, and every
//! dispatched lookup carries a sequence number so that only the newest
//! response is ever applied.

mod debounce;
mod sequence;
mod source;

pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use sequence::SequenceGuard;
pub use source::{OptionSource, StaticOptions, filter_options};
