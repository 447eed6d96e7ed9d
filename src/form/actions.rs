#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    FocusNextField,
    FocusPrevField,
    FocusNextSection(i32),
    FieldEdited { name: String },
}
