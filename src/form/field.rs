pub mod components;

use crossterm::event::KeyEvent;

use crate::domain::{FieldDescriptor, SelectOption};

use self::components::{
    CollectionPanel, ComponentEnv, ComponentKind, FieldComponent, SelectStateRef, component_for,
};
use super::record::RecordEditor;
use super::value::FormValue;

/// One form field: its descriptor, widget, dirty flag and inline error.
#[derive(Debug)]
pub struct FieldState {
    pub descriptor: FieldDescriptor,
    component: Box<dyn FieldComponent>,
    pub dirty: bool,
    pub error: Option<String>,
}

impl FieldState {
    pub fn from_descriptor(descriptor: FieldDescriptor, env: &ComponentEnv) -> Self {
        let component = component_for(&descriptor, env);
        Self {
            descriptor,
            component,
            dirty: false,
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.component.kind()
    }

    pub fn is_collection(&self) -> bool {
        self.kind().is_collection()
    }

    pub fn is_select(&self) -> bool {
        self.kind() == ComponentKind::Select
    }

    pub fn is_record(&self) -> bool {
        self.kind() == ComponentKind::Record
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let changed = self.component.handle_key(key);
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn value(&self) -> FormValue {
        self.component.value()
    }

    /// Load a value without marking the field dirty.
    pub fn seed(&mut self, value: &FormValue) {
        self.component.seed(value);
        self.dirty = false;
        self.error = None;
    }

    /// Replace the value as a user edit.
    pub fn set_value(&mut self, value: FormValue) -> bool {
        if self.component.value() == value {
            return false;
        }
        self.component.seed(&value);
        self.dirty = true;
        true
    }

    pub fn display_value(&self) -> String {
        self.component.display_value()
    }

    pub fn visible_rows(&self) -> u16 {
        self.component.visible_rows()
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn select_state(&self) -> Option<SelectStateRef<'_>> {
        self.component.select_state()
    }

    pub fn choose(&mut self, option: SelectOption) -> bool {
        let changed = self.component.choose(option);
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn collection_panel(&self) -> Option<CollectionPanel> {
        self.component.collection_panel()
    }

    pub fn collection_select(&mut self, delta: i32) -> bool {
        self.component.collection_select(delta)
    }

    pub fn collection_add(&mut self) -> bool {
        let changed = self.component.collection_add();
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn collection_remove(&mut self) -> bool {
        let changed = self.component.collection_remove();
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn record_editor(&self) -> Option<&RecordEditor> {
        self.component.record_editor()
    }

    /// Run `edit` against the record editor, marking the field dirty when the
    /// stored entries changed.
    pub fn with_record_editor<R>(&mut self, edit: impl FnOnce(&mut RecordEditor) -> R) -> Option<R> {
        let editor = self.component.record_editor_mut()?;
        let before = editor.entries().clone();
        let result = edit(editor);
        if editor.entries() != &before {
            self.dirty = true;
        }
        Some(result)
    }
}
