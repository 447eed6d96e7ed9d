//! Form state, field widgets and the values they produce.

mod actions;
mod field;
mod keywords;
mod preview;
mod record;
mod reducers;
mod section;
mod state;
mod value;

pub use actions::FormCommand;
pub use field::FieldState;
pub use field::components::{
    CheckboxPresentation, CollectionHints, CollectionPanel, ComponentEnv, ComponentKind,
    ComponentPalette, NumericTuning, SelectStateRef,
};
pub use keywords::KeywordList;
pub use preview::{PreviewGuard, PreviewStore};
pub use record::{
    EditMode, RecordDraft, RecordEditError, RecordEditor, RecordRow, RecordValueKind,
};
pub use reducers::{FormEngine, apply_command};
pub use section::SectionState;
pub use state::{FormLayout, FormState};
pub use value::{FileHandle, FormValue, FormValues, ImageSource, RecordMap, RecordValue};
pub(crate) use value::parse_number;
