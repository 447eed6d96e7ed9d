use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};

use crate::form::preview::PreviewStore;
use crate::form::value::FormValue;

use super::helpers::{format_collection_value, handle_text_edit};
use super::image::PreviewedImage;
use super::palette::ComponentPalette;
use super::{CollectionPanel, ComponentKind, FieldComponent};

/// `multi_image` fields. Every entry owns its own preview handle.
#[derive(Debug)]
pub struct MultiImageComponent {
    items: Vec<PreviewedImage>,
    pending: String,
    selected: usize,
    previews: PreviewStore,
    palette: Arc<ComponentPalette>,
}

impl MultiImageComponent {
    pub fn new(previews: PreviewStore, palette: Arc<ComponentPalette>) -> Self {
        Self {
            items: Vec::new(),
            pending: String::new(),
            selected: 0,
            previews,
            palette,
        }
    }

    fn add_pending(&mut self) -> bool {
        let Some(image) = PreviewedImage::resolve(&self.pending, &self.previews) else {
            return false;
        };
        self.items.push(image);
        self.pending.clear();
        self.selected = self.items.len() - 1;
        true
    }
}

impl FieldComponent for MultiImageComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::MultiImage
    }

    fn display_value(&self) -> String {
        let selection = self.items.get(self.selected).map(PreviewedImage::describe);
        format_collection_value(self.items.len(), selection.as_deref(), &self.pending)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.code == KeyCode::Enter {
            return self.add_pending();
        }
        handle_text_edit(&mut self.pending, key)
    }

    fn seed(&mut self, value: &FormValue) {
        self.items = match value {
            FormValue::Images(sources) => sources
                .iter()
                .cloned()
                .map(|source| PreviewedImage::from_source(source, &self.previews))
                .collect(),
            FormValue::Image(source) => {
                vec![PreviewedImage::from_source(source.clone(), &self.previews)]
            }
            _ => Vec::new(),
        };
        self.pending.clear();
        self.selected = 0;
    }

    fn value(&self) -> FormValue {
        if self.items.is_empty() {
            FormValue::Empty
        } else {
            FormValue::Images(self.items.iter().map(|item| item.source.clone()).collect())
        }
    }

    fn collection_panel(&self) -> Option<CollectionPanel> {
        Some(CollectionPanel {
            entries: self.items.iter().map(PreviewedImage::describe).collect(),
            selected: (!self.items.is_empty()).then_some(self.selected),
            hint: self.palette.collection.list_hint.to_string(),
        })
    }

    fn collection_select(&mut self, delta: i32) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let len = self.items.len() as i32;
        let next = (self.selected as i32 + delta).clamp(0, len - 1) as usize;
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    fn collection_add(&mut self) -> bool {
        self.add_pending()
    }

    fn collection_remove(&mut self) -> bool {
        if self.selected >= self.items.len() {
            return false;
        }
        self.items.remove(self.selected);
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        true
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::form::value::ImageSource;

    #[test]
    fn removing_entry_revokes_its_preview_only() {
        let mut first = tempfile::NamedTempFile::new().unwrap();
        first.write_all(b"a").unwrap();
        let mut second = tempfile::NamedTempFile::new().unwrap();
        second.write_all(b"b").unwrap();

        let previews = PreviewStore::new();
        let mut images =
            MultiImageComponent::new(previews.clone(), Arc::new(ComponentPalette::default()));
        for path in [first.path(), second.path()] {
            images.pending = path.to_string_lossy().into_owned();
            assert!(images.handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        }
        images.pending = "https://cdn.example.com/c.png".into();
        assert!(images.collection_add());
        assert_eq!(previews.live_count(), 2);

        images.collection_select(-2);
        assert!(images.collection_remove());
        assert_eq!(previews.live_count(), 1);
        match images.value() {
            FormValue::Images(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(items[1], ImageSource::Url(_)));
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn blank_pending_is_not_added() {
        let mut images = MultiImageComponent::new(
            PreviewStore::new(),
            Arc::new(ComponentPalette::default()),
        );
        images.pending = "   ".into();
        assert!(!images.collection_add());
        assert_eq!(images.value(), FormValue::Empty);
    }
}
