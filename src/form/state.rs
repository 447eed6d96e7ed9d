use std::sync::Arc;

use crate::domain::{FieldDescriptor, Tab};
use crate::validation::{FormValidator, ValidationErrors};

use super::field::{FieldState, components::ComponentEnv};
use super::section::SectionState;
use super::value::{FormValue, FormValues};

/// How fields are grouped on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormLayout {
    /// One section per language tab (create flow).
    #[default]
    Tabbed,
    /// A single section in declaration order (update flow).
    Flat,
}

#[derive(Debug)]
pub struct FormState {
    layout: FormLayout,
    pub sections: Vec<SectionState>,
    pub section_index: usize,
    pub field_index: usize,
    order: Vec<String>,
    validator: Arc<FormValidator>,
    initial: FormValues,
}

impl FormState {
    pub fn new(
        fields: &[FieldDescriptor],
        layout: FormLayout,
        validator: Arc<FormValidator>,
        env: &ComponentEnv,
    ) -> Self {
        let sections = match layout {
            FormLayout::Tabbed => Tab::ALL
                .iter()
                .map(|tab| {
                    SectionState::new(
                        Some(*tab),
                        tab.title(),
                        fields.iter().filter(|field| field.tab == *tab),
                        env,
                    )
                })
                .collect(),
            FormLayout::Flat => vec![SectionState::new(None, "Fields", fields, env)],
        };
        let mut state = Self {
            layout,
            sections,
            section_index: 0,
            field_index: 0,
            order: fields.iter().map(|field| field.name.clone()).collect(),
            validator,
            initial: FormValues::new(),
        };
        state.initial = state.values();
        state
    }

    pub fn layout(&self) -> FormLayout {
        self.layout
    }

    pub fn validator(&self) -> &FormValidator {
        &self.validator
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|section| section.fields.is_empty())
    }

    pub fn active_section(&self) -> Option<&SectionState> {
        self.sections.get(self.section_index)
    }

    pub fn focused_field(&self) -> Option<&FieldState> {
        self.active_section()
            .and_then(|section| section.fields.get(self.field_index))
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut FieldState> {
        self.normalize_focus();
        self.sections
            .get_mut(self.section_index)?
            .fields
            .get_mut(self.field_index)
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.iter_fields().find(|field| field.name() == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldState> {
        self.iter_fields_mut().find(|field| field.name() == name)
    }

    pub fn focus_next_field(&mut self) {
        self.normalize_focus();
        let Some(section) = self.active_section() else {
            return;
        };
        if self.field_index + 1 < section.fields.len() {
            self.field_index += 1;
        } else {
            self.advance_section(1);
        }
    }

    pub fn focus_prev_field(&mut self) {
        self.normalize_focus();
        if self.field_index > 0 {
            self.field_index -= 1;
            return;
        }
        self.advance_section(-1);
        if let Some(section) = self.active_section() {
            self.field_index = section.fields.len().saturating_sub(1);
        }
    }

    pub fn focus_next_section(&mut self, delta: i32) {
        self.advance_section(delta);
    }

    /// Move focus onto the named field, switching tabs if needed.
    pub fn focus_field(&mut self, name: &str) -> bool {
        for (section_index, section) in self.sections.iter().enumerate() {
            if let Some(field_index) = section.fields.iter().position(|f| f.name() == name) {
                self.section_index = section_index;
                self.field_index = field_index;
                return true;
            }
        }
        false
    }

    /// Current values of every field, in declaration order.
    pub fn values(&self) -> FormValues {
        self.order
            .iter()
            .filter_map(|name| {
                self.field(name)
                    .map(|field| (name.clone(), field.value()))
            })
            .collect()
    }

    pub fn initial_values(&self) -> &FormValues {
        &self.initial
    }

    /// Load values (e.g. the entity's current data) and make them the
    /// snapshot `reset` returns to.
    pub fn seed(&mut self, values: &FormValues) {
        for field in self.iter_fields_mut() {
            field.seed(values.get_or_empty(&field.descriptor.name));
        }
        self.initial = self.values();
    }

    /// Restore the initial snapshot, clearing dirty flags and errors.
    pub fn reset(&mut self) {
        let initial = self.initial.clone();
        for field in self.iter_fields_mut() {
            field.seed(initial.get_or_empty(&field.descriptor.name));
        }
        self.section_index = 0;
        self.field_index = 0;
    }

    /// Make the current values the new snapshot.
    pub fn rebase(&mut self) {
        self.initial = self.values();
        self.mark_clean();
    }

    pub fn mark_clean(&mut self) {
        for field in self.iter_fields_mut() {
            field.dirty = false;
        }
    }

    /// Write one value and re-validate only that field.
    pub fn handle_input_change(&mut self, name: &str, value: FormValue) -> bool {
        let Some(field) = self.field_mut(name) else {
            return false;
        };
        field.set_value(value);
        let _ = self.validate_field(name);
        true
    }

    pub fn validate_field(&mut self, name: &str) -> Result<(), String> {
        let values = self.values();
        let outcome = self.validator.validate_field(name, &values);
        if let Some(field) = self.field_mut(name) {
            match &outcome {
                Ok(()) => field.clear_error(),
                Err(message) => field.set_error(message.clone()),
            }
        }
        outcome
    }

    /// Validate every field, replacing all inline errors with the result.
    pub fn validate_all(&mut self) -> Result<FormValues, ValidationErrors> {
        let values = self.values();
        self.clear_errors();
        match self.validator.validate(&values) {
            Ok(()) => Ok(values),
            Err(errors) => {
                self.apply_errors(&errors);
                Err(errors)
            }
        }
    }

    pub fn apply_errors(&mut self, errors: &ValidationErrors) {
        for (name, message) in errors.iter() {
            self.set_error(name, message.to_string());
        }
    }

    pub fn set_error(&mut self, name: &str, message: String) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                field.set_error(message);
                true
            }
            None => false,
        }
    }

    pub fn clear_errors(&mut self) {
        for field in self.iter_fields_mut() {
            field.clear_error();
        }
    }

    pub fn error_count(&self) -> usize {
        self.iter_fields()
            .filter(|field| field.error.is_some())
            .count()
    }

    pub fn first_error_field(&self) -> Option<&str> {
        self.order.iter().map(String::as_str).find(|name| {
            self.field(name)
                .is_some_and(|field| field.error.is_some())
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.iter_fields().any(|field| field.dirty)
    }

    pub fn iter_fields(&self) -> impl Iterator<Item = &FieldState> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    fn iter_fields_mut(&mut self) -> impl Iterator<Item = &mut FieldState> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.fields.iter_mut())
    }

    fn advance_section(&mut self, delta: i32) {
        let len = self.sections.len() as i32;
        if len == 0 {
            return;
        }
        self.section_index = (self.section_index as i32 + delta).rem_euclid(len) as usize;
        self.field_index = 0;
    }

    fn normalize_focus(&mut self) {
        if self.sections.is_empty() {
            self.section_index = 0;
            self.field_index = 0;
            return;
        }
        if self.section_index >= self.sections.len() {
            self.section_index = 0;
        }
        let len = self.sections[self.section_index].fields.len();
        if len == 0 {
            self.field_index = 0;
        } else if self.field_index >= len {
            self.field_index = len - 1;
        }
    }
}
