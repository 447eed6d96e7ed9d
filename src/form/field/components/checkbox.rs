use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};

use crate::form::value::FormValue;

use super::{ComponentKind, FieldComponent, palette::ComponentPalette};

#[derive(Debug, Clone)]
pub struct CheckboxComponent {
    value: bool,
    palette: Arc<ComponentPalette>,
}

impl CheckboxComponent {
    pub fn new(palette: Arc<ComponentPalette>) -> Self {
        Self {
            value: false,
            palette,
        }
    }
}

impl FieldComponent for CheckboxComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Checkbox
    }

    fn display_value(&self) -> String {
        if self.value {
            self.palette.checkbox.checked_label.to_string()
        } else {
            self.palette.checkbox.unchecked_label.to_string()
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let presentation = &self.palette.checkbox;
        match key.code {
            KeyCode::Char(' ') if presentation.toggle_with_space => {
                self.value = !self.value;
                true
            }
            KeyCode::Left | KeyCode::Right if presentation.toggle_with_arrows => {
                self.value = !self.value;
                true
            }
            _ => false,
        }
    }

    fn seed(&mut self, value: &FormValue) {
        self.value = match value {
            FormValue::Bool(flag) => *flag,
            FormValue::Text(text) => text == "true",
            _ => false,
        };
    }

    fn value(&self) -> FormValue {
        FormValue::Bool(self.value)
    }
}
