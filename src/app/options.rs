use std::{sync::Arc, time::Duration};

use super::keymap::KeymapStore;
use crate::form::{CheckboxPresentation, CollectionHints, ComponentPalette, NumericTuning};
use crate::search::DEFAULT_DEBOUNCE;

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub auto_validate: bool,
    pub confirm_exit: bool,
    pub show_help: bool,
    /// Quiet period before a remote option lookup is sent.
    pub search_debounce: Duration,
    pub(crate) keymap_store: Arc<KeymapStore>,
    pub(crate) component_palette: Arc<ComponentPalette>,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
            auto_validate: true,
            confirm_exit: true,
            show_help: true,
            search_debounce: DEFAULT_DEBOUNCE,
            keymap_store: KeymapStore::bundled(),
            component_palette: Arc::new(ComponentPalette::default()),
        }
    }
}

impl UiOptions {
    /// Replace the bundled key bindings with a JSON keymap document.
    pub fn with_keymap_json(mut self, source: &str) -> anyhow::Result<Self> {
        self.keymap_store = Arc::new(KeymapStore::from_json(source)?);
        Ok(self)
    }

    pub fn with_auto_validate(mut self, enabled: bool) -> Self {
        self.auto_validate = enabled;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    pub fn with_component_palette(mut self, palette: ComponentPalette) -> Self {
        self.component_palette = Arc::new(palette);
        self
    }

    pub fn with_numeric_tuning(self, tuning: NumericTuning) -> Self {
        self.map_palette(|palette| palette.with_numeric(tuning))
    }

    pub fn with_number_step(self, step: f64) -> Self {
        self.map_palette(|palette| {
            let numeric = palette.numeric.clone().with_step(step);
            palette.with_numeric(numeric)
        })
    }

    pub fn with_checkbox_presentation(self, presentation: CheckboxPresentation) -> Self {
        self.map_palette(|palette| palette.with_checkbox(presentation))
    }

    pub fn with_collection_hints(self, hints: CollectionHints) -> Self {
        self.map_palette(|palette| palette.with_collection_hints(hints))
    }

    pub fn with_textarea_rows(self, rows: u16) -> Self {
        self.map_palette(|palette| palette.with_textarea_rows(rows))
    }

    pub fn with_select_wrap(self, wrap: bool) -> Self {
        self.map_palette(|palette| palette.with_select_wrap(wrap))
    }

    pub fn component_palette(&self) -> &ComponentPalette {
        &self.component_palette
    }

    fn map_palette<F>(mut self, map: F) -> Self
    where
        F: FnOnce(ComponentPalette) -> ComponentPalette,
    {
        let palette = (*self.component_palette).clone();
        self.component_palette = Arc::new(map(palette));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_builders_apply_on_top_of_defaults() {
        let options = UiOptions::default()
            .with_number_step(5.0)
            .with_textarea_rows(0);
        assert_eq!(options.component_palette().numeric.step, 5.0);
        assert_eq!(options.component_palette().textarea_rows, 1);
        assert!(options.component_palette().select_wrap);
    }

    #[test]
    fn custom_keymap_must_parse() {
        assert!(UiOptions::default().with_keymap_json("not json").is_err());
    }
}
