use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    domain::SelectOption,
    form::FieldState,
    presentation::PopupRender,
    search::{Debouncer, SequenceGuard, filter_options},
};

/// A remote lookup the popup wants sent, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LookupRequest {
    pub(crate) field: String,
    pub(crate) endpoint: String,
    pub(crate) query: String,
    pub(crate) seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PopupKey {
    Handled,
    Close,
    Choose(SelectOption),
}

/// Searchable option list for a select field.
#[derive(Debug)]
pub(crate) struct SelectPopup {
    field: String,
    title: String,
    query: String,
    base: Vec<SelectOption>,
    results: Vec<SelectOption>,
    labels: Vec<String>,
    cursor: usize,
    source: Option<String>,
    debouncer: Debouncer,
    sequence: SequenceGuard,
    loading: bool,
}

impl SelectPopup {
    /// `remote` is false when no option source is configured; endpoint
    /// fields then filter their static options locally.
    pub(crate) fn from_field(field: &FieldState, debounce: Duration, remote: bool) -> Option<Self> {
        let state = field.select_state()?;
        let base = state.options.to_vec();
        let cursor = state
            .selected
            .and_then(|selected| base.iter().position(|option| option.id == selected.id))
            .unwrap_or(0);
        let mut popup = Self {
            field: field.name().to_string(),
            title: field.descriptor.display_label(),
            query: String::new(),
            results: Vec::new(),
            labels: Vec::new(),
            base,
            cursor,
            source: state.source.filter(|_| remote).map(str::to_string),
            debouncer: Debouncer::new(debounce),
            sequence: SequenceGuard::new(),
            loading: false,
        };
        popup.set_results(popup.base.clone());
        popup.cursor = cursor.min(popup.results.len().saturating_sub(1));
        Some(popup)
    }

    pub(crate) fn field(&self) -> &str {
        &self.field
    }

    /// Lookup to send immediately when a remote popup opens.
    pub(crate) fn initial_lookup(&mut self) -> Option<LookupRequest> {
        let endpoint = self.source.clone()?;
        self.loading = true;
        Some(LookupRequest {
            field: self.field.clone(),
            endpoint,
            query: self.query.clone(),
            seq: self.sequence.issue(),
        })
    }

    pub(crate) fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> PopupKey {
        match key.code {
            KeyCode::Esc => return PopupKey::Close,
            KeyCode::Enter => {
                return match self.results.get(self.cursor) {
                    Some(option) => PopupKey::Choose(option.clone()),
                    None => PopupKey::Close,
                };
            }
            KeyCode::Up => self.select_previous(),
            KeyCode::Down | KeyCode::Tab => self.select_next(),
            KeyCode::Backspace => {
                if self.query.pop().is_some() {
                    self.query_changed(now);
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.query.push(ch);
                self.query_changed(now);
            }
            _ => {}
        }
        PopupKey::Handled
    }

    /// Release a debounced lookup once the quiet period has elapsed.
    pub(crate) fn tick(&mut self, now: Instant) -> Option<LookupRequest> {
        let endpoint = self.source.clone()?;
        let query = self.debouncer.poll(now)?;
        Some(LookupRequest {
            field: self.field.clone(),
            endpoint,
            query,
            seq: self.sequence.issue(),
        })
    }

    /// Apply lookup results unless a newer lookup has been issued since.
    pub(crate) fn apply_results(&mut self, seq: u64, options: Vec<SelectOption>) -> bool {
        if !self.sequence.accept(seq) {
            return false;
        }
        self.loading = false;
        self.set_results(options);
        true
    }

    pub(crate) fn lookup_failed(&mut self, seq: u64) {
        if self.sequence.is_current(seq) {
            self.loading = false;
        }
    }

    pub(crate) fn as_render(&self) -> PopupRender<'_> {
        PopupRender {
            title: &self.title,
            query: &self.query,
            options: &self.labels,
            selected: self.cursor,
            loading: self.loading,
        }
    }

    fn query_changed(&mut self, now: Instant) {
        if self.source.is_some() {
            self.loading = true;
            self.debouncer.push(self.query.clone(), now);
        } else {
            let filtered = filter_options(&self.base, &self.query);
            self.set_results(filtered);
        }
    }

    fn set_results(&mut self, options: Vec<SelectOption>) {
        self.labels = options.iter().map(|option| option.label.clone()).collect();
        self.results = options;
        if self.cursor >= self.results.len() {
            self.cursor = 0;
        }
    }

    fn select_previous(&mut self) {
        if self.results.is_empty() {
            return;
        }
        if self.cursor == 0 {
            self.cursor = self.results.len() - 1;
        } else {
            self.cursor -= 1;
        }
    }

    fn select_next(&mut self) {
        if self.results.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.results.len();
    }
}
