use crossterm::event::KeyEvent;

use crate::form::FormCommand;

use super::keymap::{KeymapContext, KeymapStore};

/// Action a bound key combo resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Save,
    Quit,
    ResetStatus,
    TogglePopup,
    EditEntry,
    FieldStep(i32),
    SectionStep(i32),
    ListAddEntry,
    ListRemoveEntry,
    ListSelect(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppCommand {
    Save,
    Quit,
    ResetStatus,
    TogglePopup,
    EditEntry,
    ListAddEntry,
    ListRemoveEntry,
    ListSelect(i32),
}

/// Outcome of routing one key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommandDispatch {
    Form(FormCommand),
    App(AppCommand),
    /// Unbound key; forwarded to the focused widget.
    Input(KeyEvent),
}

pub(crate) struct InputRouter<'a> {
    keymap: &'a KeymapStore,
}

impl<'a> InputRouter<'a> {
    pub(crate) fn new(keymap: &'a KeymapStore) -> Self {
        Self { keymap }
    }

    pub(crate) fn route(&self, key: KeyEvent, context: KeymapContext) -> CommandDispatch {
        match self.keymap.classify(&key, context) {
            Some(action) => action.into(),
            None => CommandDispatch::Input(key),
        }
    }
}

impl From<KeyAction> for CommandDispatch {
    fn from(action: KeyAction) -> Self {
        match action {
            KeyAction::Save => CommandDispatch::App(AppCommand::Save),
            KeyAction::Quit => CommandDispatch::App(AppCommand::Quit),
            KeyAction::ResetStatus => CommandDispatch::App(AppCommand::ResetStatus),
            KeyAction::TogglePopup => CommandDispatch::App(AppCommand::TogglePopup),
            KeyAction::EditEntry => CommandDispatch::App(AppCommand::EditEntry),
            KeyAction::ListAddEntry => CommandDispatch::App(AppCommand::ListAddEntry),
            KeyAction::ListRemoveEntry => CommandDispatch::App(AppCommand::ListRemoveEntry),
            KeyAction::ListSelect(delta) => CommandDispatch::App(AppCommand::ListSelect(delta)),
            KeyAction::FieldStep(delta) if delta < 0 => {
                CommandDispatch::Form(FormCommand::FocusPrevField)
            }
            KeyAction::FieldStep(_) => CommandDispatch::Form(FormCommand::FocusNextField),
            KeyAction::SectionStep(delta) => {
                CommandDispatch::Form(FormCommand::FocusNextSection(delta))
            }
        }
    }
}
