//! Interactive terminal session: key routing, popups, the record overlay and
//! the event loop that drives submissions.

mod form_ui;
pub(crate) mod input;
pub(crate) mod keymap;
mod options;
mod overlay;
mod popup;
mod runtime;
mod status;
mod terminal;

pub use form_ui::{FormUI, UiOutcome};
pub use input::KeyAction;
pub use keymap::{KeymapContext, KeymapStore};
pub use options::UiOptions;
pub use status::StatusLine;
pub use terminal::TerminalGuard;
