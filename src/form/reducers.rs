use super::{actions::FormCommand, state::FormState};

pub fn apply_command(state: &mut FormState, command: FormCommand) {
    match command {
        FormCommand::FocusNextField => state.focus_next_field(),
        FormCommand::FocusPrevField => state.focus_prev_field(),
        FormCommand::FocusNextSection(delta) => state.focus_next_section(delta),
        FormCommand::FieldEdited { .. } => {}
    }
}

pub struct FormEngine<'a> {
    state: &'a mut FormState,
}

impl<'a> FormEngine<'a> {
    pub fn new(state: &'a mut FormState) -> Self {
        Self { state }
    }

    /// Apply a command. A field edit re-validates that field alone and
    /// returns its message when it fails.
    pub fn dispatch(&mut self, command: FormCommand) -> Result<(), String> {
        match command {
            FormCommand::FieldEdited { name } => self.state.validate_field(&name),
            other => {
                apply_command(self.state, other);
                Ok(())
            }
        }
    }
}
