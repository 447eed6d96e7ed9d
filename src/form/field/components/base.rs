use crossterm::event::KeyEvent;

use crate::domain::SelectOption;
use crate::form::record::RecordEditor;
use crate::form::value::FormValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Text,
    Textarea,
    Number,
    Checkbox,
    Select,
    Image,
    MultiImage,
    Keywords,
    Record,
}

impl ComponentKind {
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            ComponentKind::MultiImage | ComponentKind::Keywords | ComponentKind::Record
        )
    }
}

pub(crate) trait FieldComponent: std::fmt::Debug {
    fn kind(&self) -> ComponentKind;
    fn display_value(&self) -> String;
    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let _ = key;
        false
    }
    fn seed(&mut self, value: &FormValue);
    fn value(&self) -> FormValue;

    fn visible_rows(&self) -> u16 {
        1
    }

    fn select_state(&self) -> Option<SelectStateRef<'_>> {
        None
    }

    fn choose(&mut self, _option: SelectOption) -> bool {
        false
    }

    fn collection_panel(&self) -> Option<CollectionPanel> {
        None
    }

    fn collection_select(&mut self, _delta: i32) -> bool {
        false
    }

    fn collection_add(&mut self) -> bool {
        false
    }

    fn collection_remove(&mut self) -> bool {
        false
    }

    fn record_editor(&self) -> Option<&RecordEditor> {
        None
    }

    fn record_editor_mut(&mut self) -> Option<&mut RecordEditor> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct SelectStateRef<'a> {
    pub options: &'a [SelectOption],
    pub selected: Option<&'a SelectOption>,
    pub source: Option<&'a str>,
}

/// Rows of a collection field plus the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionPanel {
    pub entries: Vec<String>,
    pub selected: Option<usize>,
    pub hint: String,
}
