//! Ratatui rendering of form state. Nothing here mutates form values; the
//! only state written back is each section's scroll offset.

mod components;
mod view;

pub use view::{OverlayRender, PopupRender, UiContext, draw};
