use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use crate::{
    domain::{FieldDescriptor, FieldType, SelectOption},
    form::{
        ComponentEnv, FieldState, FormLayout, FormState, FormValue, FormValues, RecordDraft,
        RecordRow, RecordValueKind,
    },
    i18n::Translator,
    presentation::OverlayRender,
    validation::{FormValidator, RuleRegistry},
};

const KEY_FIELD: &str = "key";
const KIND_FIELD: &str = "kind";
const VALUE_FIELD: &str = "value";

/// Modal editor for one record entry: key, value shape and raw value.
#[derive(Debug)]
pub(crate) struct RecordOverlay {
    field: String,
    title: String,
    form: FormState,
    error: Option<String>,
}

impl RecordOverlay {
    /// Open the overlay for `field`, editing `row` or adding a new entry.
    pub(crate) fn open(
        field: &mut FieldState,
        row: Option<&RecordRow>,
        env: &ComponentEnv,
        translator: &Translator,
    ) -> Result<Option<Self>> {
        let draft = match row {
            Some(row) => field
                .with_record_editor(|editor| editor.begin_edit(&row.key, row.index))
                .flatten(),
            None => field
                .with_record_editor(|editor| {
                    editor.cancel();
                    RecordDraft::default()
                }),
        };
        let Some(draft) = draft else {
            return Ok(None);
        };
        let editing_element = row.is_some_and(|row| row.index.is_some());

        let mut descriptors = vec![
            FieldDescriptor::new(KEY_FIELD, translator.t("Key"), FieldType::Text).required(),
        ];
        if !editing_element {
            descriptors.push(
                FieldDescriptor::new(KIND_FIELD, translator.t("Value type"), FieldType::Select)
                    .with_options(
                        RecordValueKind::ALL
                            .iter()
                            .map(|kind| SelectOption::new(kind.as_str(), kind.as_str()))
                            .collect(),
                    ),
            );
        }
        descriptors.push(FieldDescriptor::new(
            VALUE_FIELD,
            translator.t("Value"),
            FieldType::Textarea,
        ));

        let validator =
            FormValidator::synthesize(&descriptors, &RuleRegistry::empty(), translator)?;
        let mut form = FormState::new(&descriptors, FormLayout::Flat, Arc::new(validator), env);
        form.seed(
            &FormValues::new()
                .with(KEY_FIELD, FormValue::text(draft.key.clone()))
                .with(
                    KIND_FIELD,
                    FormValue::Choice(SelectOption::new(
                        json!(draft.kind.as_str()),
                        draft.kind.as_str(),
                    )),
                )
                .with(VALUE_FIELD, FormValue::text(draft.raw.clone())),
        );
        if editing_element {
            form.focus_field(VALUE_FIELD);
        }

        let title = match row {
            Some(row) => translator.format("Edit {key}", &[("key", &row.key)]),
            None => translator.t("New entry").into_owned(),
        };
        Ok(Some(Self {
            field: field.name().to_string(),
            title,
            form,
            error: None,
        }))
    }

    pub(crate) fn field(&self) -> &str {
        &self.field
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub(crate) fn as_render(&mut self) -> OverlayRender<'_> {
        OverlayRender {
            title: &self.title,
            form: &mut self.form,
            error: self.error.as_deref(),
        }
    }

    /// Validate the overlay fields and read them back as a draft.
    pub(crate) fn draft(&mut self) -> Option<RecordDraft> {
        let values = self.form.validate_all().ok()?;
        let key = match values.get_or_empty(KEY_FIELD) {
            FormValue::Text(text) => text.trim().to_string(),
            _ => String::new(),
        };
        let kind = match values.get_or_empty(KIND_FIELD) {
            FormValue::Choice(option) => option
                .id
                .as_str()
                .and_then(RecordValueKind::parse)
                .unwrap_or_default(),
            _ => RecordValueKind::String,
        };
        let raw = match values.get_or_empty(VALUE_FIELD) {
            FormValue::Text(text) => text.clone(),
            _ => String::new(),
        };
        Some(RecordDraft::new(key, kind, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::RecordValue;

    fn record_field(entries: FormValue) -> FieldState {
        let mut field = FieldState::from_descriptor(
            FieldDescriptor::new("meta", "Meta", FieldType::Record),
            &ComponentEnv::default(),
        );
        field.seed(&entries);
        field
    }

    #[test]
    fn new_entry_requires_a_key() {
        let mut field = record_field(FormValue::Record(Default::default()));
        let translator = Translator::default();
        let mut overlay = RecordOverlay::open(&mut field, None, &ComponentEnv::default(), &translator)
            .unwrap()
            .expect("overlay opens");
        assert!(overlay.draft().is_none());
        assert_eq!(
            overlay.form_mut().field(KEY_FIELD).and_then(|f| f.error.as_deref()),
            Some("Key is required")
        );
    }

    #[test]
    fn editing_prefills_the_draft() {
        let mut entries = crate::form::RecordMap::new();
        entries.insert("author".into(), RecordValue::Text("Sara".into()));
        let mut field = record_field(FormValue::Record(entries));
        let row = field.record_editor().unwrap().rows().remove(0);
        let translator = Translator::default();
        let mut overlay =
            RecordOverlay::open(&mut field, Some(&row), &ComponentEnv::default(), &translator)
                .unwrap()
                .expect("overlay opens");
        assert_eq!(overlay.title(), "Edit author");
        let draft = overlay.draft().expect("valid draft");
        assert_eq!(draft, RecordDraft::new("author", RecordValueKind::String, "Sara"));
        assert!(field.record_editor().unwrap().is_editing());
    }
}
