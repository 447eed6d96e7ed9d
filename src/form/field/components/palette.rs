use std::borrow::Cow;

/// Arrow-key stepping for number fields.
#[derive(Debug, Clone)]
pub struct NumericTuning {
    pub step: f64,
    pub fast_step: Option<f64>,
}

impl NumericTuning {
    #[inline]
    pub fn step(&self, fast: bool) -> f64 {
        if fast {
            self.fast_step.unwrap_or(self.step)
        } else {
            self.step
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step.max(f64::EPSILON);
        self
    }

    pub fn with_fast_step(mut self, step: f64) -> Self {
        self.fast_step = Some(step.max(f64::EPSILON));
        self
    }
}

impl Default for NumericTuning {
    fn default() -> Self {
        Self {
            step: 1.0,
            fast_step: Some(10.0),
        }
    }
}

/// Labels and toggle keys for checkbox fields.
#[derive(Debug, Clone)]
pub struct CheckboxPresentation {
    pub checked_label: Cow<'static, str>,
    pub unchecked_label: Cow<'static, str>,
    pub toggle_with_space: bool,
    pub toggle_with_arrows: bool,
}

impl CheckboxPresentation {
    pub fn with_labels(
        mut self,
        checked: impl Into<Cow<'static, str>>,
        unchecked: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.checked_label = checked.into();
        self.unchecked_label = unchecked.into();
        self
    }

    pub fn with_toggle_with_space(mut self, enabled: bool) -> Self {
        self.toggle_with_space = enabled;
        self
    }

    pub fn with_toggle_with_arrows(mut self, enabled: bool) -> Self {
        self.toggle_with_arrows = enabled;
        self
    }
}

impl Default for CheckboxPresentation {
    fn default() -> Self {
        Self {
            checked_label: Cow::Borrowed("[x]"),
            unchecked_label: Cow::Borrowed("[ ]"),
            toggle_with_space: true,
            toggle_with_arrows: true,
        }
    }
}

/// Hint text shown next to collection fields (keywords, images, records).
#[derive(Debug, Clone)]
pub struct CollectionHints {
    pub list_hint: Cow<'static, str>,
    pub record_hint: Cow<'static, str>,
}

impl CollectionHints {
    pub fn with_list_hint(mut self, hint: impl Into<Cow<'static, str>>) -> Self {
        self.list_hint = hint.into();
        self
    }

    pub fn with_record_hint(mut self, hint: impl Into<Cow<'static, str>>) -> Self {
        self.record_hint = hint.into();
        self
    }
}

impl Default for CollectionHints {
    fn default() -> Self {
        Self {
            list_hint: Cow::Borrowed("Enter add • Ctrl+←/→ select • Ctrl+D remove"),
            record_hint: Cow::Borrowed("Ctrl+N add • Ctrl+E edit • Ctrl+D remove"),
        }
    }
}

/// Aggregated widget configuration shared by every field of a form.
#[derive(Debug, Clone)]
pub struct ComponentPalette {
    pub numeric: NumericTuning,
    pub checkbox: CheckboxPresentation,
    pub collection: CollectionHints,
    pub select_wrap: bool,
    pub textarea_rows: u16,
}

impl Default for ComponentPalette {
    fn default() -> Self {
        Self {
            numeric: NumericTuning::default(),
            checkbox: CheckboxPresentation::default(),
            collection: CollectionHints::default(),
            select_wrap: true,
            textarea_rows: 4,
        }
    }
}

impl ComponentPalette {
    pub fn with_numeric(mut self, tuning: NumericTuning) -> Self {
        self.numeric = tuning;
        self
    }

    pub fn with_checkbox(mut self, presentation: CheckboxPresentation) -> Self {
        self.checkbox = presentation;
        self
    }

    pub fn with_collection_hints(mut self, hints: CollectionHints) -> Self {
        self.collection = hints;
        self
    }

    pub fn with_select_wrap(mut self, wrap: bool) -> Self {
        self.select_wrap = wrap;
        self
    }

    pub fn with_textarea_rows(mut self, rows: u16) -> Self {
        self.textarea_rows = rows.max(1);
        self
    }
}
