use crossterm::event::{KeyCode, KeyEvent};

use crate::domain::SelectOption;
use crate::form::value::FormValue;

use super::{ComponentKind, FieldComponent, SelectStateRef};

/// Holds the whole chosen option, not only its id.
#[derive(Debug, Clone)]
pub struct SelectComponent {
    options: Vec<SelectOption>,
    selected: Option<SelectOption>,
    source: Option<String>,
    wrap: bool,
}

impl SelectComponent {
    pub fn new(options: Vec<SelectOption>, source: Option<String>, wrap: bool) -> Self {
        Self {
            options,
            selected: None,
            source,
            wrap,
        }
    }

    fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.options.iter().position(|option| option.id == selected.id)
    }

    fn cycle(&mut self, delta: i32) -> bool {
        if self.options.is_empty() {
            return false;
        }
        let len = self.options.len() as i32;
        let next = match self.selected_index() {
            None if delta >= 0 => 0,
            None => len - 1,
            Some(current) => {
                let raw = current as i32 + delta;
                if self.wrap {
                    raw.rem_euclid(len)
                } else {
                    raw.clamp(0, len - 1)
                }
            }
        };
        let option = self.options[next as usize].clone();
        self.choose(option)
    }
}

impl FieldComponent for SelectComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Select
    }

    fn display_value(&self) -> String {
        self.selected
            .as_ref()
            .map(|option| option.label.clone())
            .unwrap_or_default()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => self.cycle(-1),
            KeyCode::Right => self.cycle(1),
            KeyCode::Delete | KeyCode::Backspace => self.selected.take().is_some(),
            _ => false,
        }
    }

    fn seed(&mut self, value: &FormValue) {
        self.selected = match value {
            FormValue::Choice(option) => Some(
                self.options
                    .iter()
                    .find(|candidate| candidate.id == option.id)
                    .cloned()
                    .unwrap_or_else(|| option.clone()),
            ),
            _ => None,
        };
    }

    fn value(&self) -> FormValue {
        match &self.selected {
            Some(option) => FormValue::Choice(option.clone()),
            None => FormValue::Empty,
        }
    }

    fn select_state(&self) -> Option<SelectStateRef<'_>> {
        Some(SelectStateRef {
            options: &self.options,
            selected: self.selected.as_ref(),
            source: self.source.as_deref(),
        })
    }

    fn choose(&mut self, option: SelectOption) -> bool {
        if self.selected.as_ref() == Some(&option) {
            return false;
        }
        self.selected = Some(option);
        true
    }
}
