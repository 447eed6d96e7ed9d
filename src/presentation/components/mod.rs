mod body;
mod fields;
mod footer;
mod layout;
mod overlay;
mod popup;
mod tabstrip;

pub use body::render_body;
pub use footer::render_footer;
pub use overlay::render_record_overlay;
pub use popup::render_popup;
