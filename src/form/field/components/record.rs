use std::sync::Arc;

use crate::form::record::RecordEditor;
use crate::form::value::{FormValue, RecordMap, RecordValue};

use super::palette::ComponentPalette;
use super::{CollectionPanel, ComponentKind, FieldComponent};

/// `record` fields. Edits go through the record overlay; the panel only
/// tracks which row is selected.
#[derive(Debug, Clone)]
pub struct RecordComponent {
    editor: RecordEditor,
    selected: usize,
    palette: Arc<ComponentPalette>,
}

impl RecordComponent {
    pub fn new(palette: Arc<ComponentPalette>) -> Self {
        Self {
            editor: RecordEditor::default(),
            selected: 0,
            palette,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.editor.rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

impl FieldComponent for RecordComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Record
    }

    fn display_value(&self) -> String {
        let entries = self.editor.entries();
        if entries.is_empty() {
            return "empty".to_string();
        }
        let keys = entries.keys().map(String::as_str).collect::<Vec<_>>();
        format!("{{{}}}", keys.join(", "))
    }

    fn seed(&mut self, value: &FormValue) {
        let entries = match value {
            FormValue::Record(map) => map.clone(),
            FormValue::Text(text) => serde_json::from_str::<serde_json::Value>(text)
                .ok()
                .and_then(|value| match value {
                    serde_json::Value::Object(map) => Some(
                        map.iter()
                            .map(|(key, value)| (key.clone(), RecordValue::from_json(value)))
                            .collect(),
                    ),
                    _ => None,
                })
                .unwrap_or_default(),
            _ => RecordMap::new(),
        };
        self.editor.replace_entries(entries);
        self.selected = 0;
    }

    fn value(&self) -> FormValue {
        FormValue::Record(self.editor.entries().clone())
    }

    fn collection_panel(&self) -> Option<CollectionPanel> {
        let rows = self.editor.rows();
        let selected = (!rows.is_empty()).then(|| self.selected.min(rows.len() - 1));
        Some(CollectionPanel {
            entries: rows.into_iter().map(|row| row.summary).collect(),
            selected,
            hint: self.palette.collection.record_hint.to_string(),
        })
    }

    fn collection_select(&mut self, delta: i32) -> bool {
        let len = self.editor.rows().len();
        if len == 0 {
            return false;
        }
        let next = (self.selected as i32 + delta).clamp(0, len as i32 - 1) as usize;
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    fn collection_remove(&mut self) -> bool {
        let rows = self.editor.rows();
        let Some(row) = rows.get(self.selected) else {
            return false;
        };
        let removed = self.editor.remove(&row.key, row.index);
        self.clamp_selection();
        removed
    }

    fn record_editor(&self) -> Option<&RecordEditor> {
        Some(&self.editor)
    }

    fn record_editor_mut(&mut self) -> Option<&mut RecordEditor> {
        Some(&mut self.editor)
    }
}
