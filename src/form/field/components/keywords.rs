use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};

use crate::form::keywords::KeywordList;
use crate::form::value::FormValue;

use super::helpers::{format_collection_value, handle_text_edit};
use super::palette::ComponentPalette;
use super::{CollectionPanel, ComponentKind, FieldComponent};

#[derive(Debug, Clone)]
pub struct KeywordsComponent {
    list: KeywordList,
    palette: Arc<ComponentPalette>,
}

impl KeywordsComponent {
    pub fn new(palette: Arc<ComponentPalette>) -> Self {
        Self {
            list: KeywordList::default(),
            palette,
        }
    }
}

impl FieldComponent for KeywordsComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Keywords
    }

    fn display_value(&self) -> String {
        let selection = self
            .list
            .selected_index()
            .and_then(|index| self.list.items().get(index))
            .map(String::as_str);
        format_collection_value(self.list.len(), selection, self.list.pending())
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.code == KeyCode::Enter {
            return self.list.commit_pending();
        }
        handle_text_edit(self.list.pending_mut(), key)
    }

    fn seed(&mut self, value: &FormValue) {
        let items = match value {
            FormValue::Keywords(items) => items.clone(),
            FormValue::Text(text) => text.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        };
        self.list.replace(items);
        self.list.pending_mut().clear();
    }

    fn value(&self) -> FormValue {
        FormValue::Keywords(self.list.items().to_vec())
    }

    fn collection_panel(&self) -> Option<CollectionPanel> {
        Some(CollectionPanel {
            entries: self.list.items().to_vec(),
            selected: self.list.selected_index(),
            hint: self.palette.collection.list_hint.to_string(),
        })
    }

    fn collection_select(&mut self, delta: i32) -> bool {
        self.list.select(delta)
    }

    fn collection_add(&mut self) -> bool {
        self.list.commit_pending()
    }

    fn collection_remove(&mut self) -> bool {
        self.list.remove_selected()
    }
}
