use serde_json::json;

use crate::{
    domain::{FieldDescriptor, FieldType},
    form::{
        ComponentEnv, FieldState, FormValue, FormValues, RecordDraft, RecordEditError,
        RecordValue, RecordValueKind,
    },
    i18n::Translator,
    validation::{FormValidator, RuleRegistry},
};

fn meta_field(seed: serde_json::Value) -> FieldState {
    let mut field = FieldState::from_descriptor(
        FieldDescriptor::new("meta", "meta", FieldType::Record),
        &ComponentEnv::default(),
    );
    field.seed(&FormValue::from_json(FieldType::Record, &seed));
    field
}

fn entries(field: &FieldState) -> serde_json::Value {
    field.value().to_json()
}

#[test]
fn invalid_json_commit_keeps_the_map_and_the_field_clean() {
    let mut field = meta_field(json!({"author": "Sara"}));
    let result = field
        .with_record_editor(|editor| {
            editor.commit(&RecordDraft::new(
                "extra",
                RecordValueKind::Object,
                "{not json",
            ))
        })
        .unwrap();
    assert!(matches!(result, Err(RecordEditError::InvalidJson(_))));
    assert_eq!(entries(&field), json!({"author": "Sara"}));
    assert!(!field.dirty);
}

#[test]
fn committed_object_marks_the_field_dirty() {
    let mut field = meta_field(json!({}));
    field
        .with_record_editor(|editor| {
            editor.commit(&RecordDraft::new(
                "seo",
                RecordValueKind::Object,
                r#"{"index": true}"#,
            ))
        })
        .unwrap()
        .unwrap();
    assert!(field.dirty);
    assert_eq!(entries(&field), json!({"seo": {"index": true}}));
}

#[test]
fn seeded_arrays_expand_into_rows() {
    let field = meta_field(json!({"tags": ["a", "b"], "author": "Sara"}));
    let panel = field.collection_panel().unwrap();
    assert_eq!(panel.entries.len(), 3);
    assert_eq!(panel.entries[0], "tags[0] = \"a\"");
    assert_eq!(panel.selected, Some(0));
}

#[test]
fn removing_rows_one_by_one_empties_the_record() {
    let mut field = meta_field(json!({"tags": ["a"], "author": "Sara"}));
    assert!(field.collection_remove());
    assert_eq!(entries(&field), json!({"author": "Sara"}));
    assert!(field.collection_remove());
    assert_eq!(field.value(), FormValue::Record(Default::default()));
    assert!(!field.collection_remove());
    assert!(field.dirty);
}

#[test]
fn editing_an_element_replaces_it_in_place() {
    let mut field = meta_field(json!({"tags": ["a", "b"]}));
    let draft = field
        .with_record_editor(|editor| editor.begin_edit("tags", Some(1)))
        .flatten()
        .unwrap();
    assert_eq!(draft.raw, "b");
    field
        .with_record_editor(|editor| {
            editor.commit(&RecordDraft::new("tags", RecordValueKind::String, "c"))
        })
        .unwrap()
        .unwrap();
    let record = field.record_editor().unwrap();
    assert_eq!(
        record.entries().get("tags"),
        Some(&RecordValue::List(vec!["a".into(), "c".into()]))
    );
    assert!(!record.is_editing());
}

#[test]
fn blank_array_commit_cannot_satisfy_a_required_record() {
    let descriptor = FieldDescriptor::new("meta", "meta", FieldType::Record).required();
    let validator = FormValidator::synthesize(
        std::slice::from_ref(&descriptor),
        &RuleRegistry::default(),
        &Translator::default(),
    )
    .unwrap();
    let mut field = FieldState::from_descriptor(descriptor, &ComponentEnv::default());

    let result = field
        .with_record_editor(|editor| {
            editor.commit(&RecordDraft::new("links", RecordValueKind::Array, " , ,"))
        })
        .unwrap();

    assert_eq!(result, Err(RecordEditError::EmptyArray));
    assert!(field.record_editor().unwrap().rows().is_empty());
    let values = FormValues::new().with("meta", field.value());
    assert_eq!(
        validator.validate_field("meta", &values),
        Err("meta is required".to_string())
    );
}
