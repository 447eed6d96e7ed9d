use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};

use dashform::{
    EntityStore, FieldType, FormLayout, FormUI, FormValue, FormValues, Language,
    SubmissionController, SubmitMode, SubmitOutcome, Tab, Translator,
    io::{DocumentFormat, form_definition_from_str, form_values_from_str},
    submit::{Payload, StoreError},
};

const BLOG_FORM: &str = r#"{
    "entity": "blogs",
    "title": "Blog posts",
    "fields": [
        {"name": "title", "label": "title", "type": "text", "required": true,
         "validation": {"minLength": 2}},
        {"name": "slug", "label": "slug", "type": "text",
         "validation": {"custom": "slug"}},
        {"name": "category", "label": "category", "type": "select",
         "options": [{"id": 1, "label": "News"}, {"id": 2, "label": "Events"}]},
        {"name": "tags", "label": "tags", "type": "keywords", "required": true},
        {"name": "order", "label": "order", "type": "number"},
        {"name": "meta", "label": "meta", "type": "record"},
        {"name": "title_ar", "label": "العنوان", "type": "text", "tab": "Arabic"},
        {"name": "body_ar", "label": "المحتوى", "type": "textarea", "tab": "Arabic", "rows": 4}
    ]
}"#;

#[derive(Default)]
struct CapturingStore {
    calls: AtomicUsize,
    payloads: Mutex<Vec<(Language, Value)>>,
}

#[async_trait]
impl EntityStore for CapturingStore {
    async fn create(
        &self,
        payload: Payload,
        language: Language,
        _parent_id: Option<&str>,
    ) -> Result<Value, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .lock()
            .unwrap()
            .push((language, payload.preview()));
        Ok(json!({"id": 1}))
    }

    async fn update(
        &self,
        payload: Payload,
        _entity_id: &str,
        language: Language,
    ) -> Result<Value, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .lock()
            .unwrap()
            .push((language, payload.preview()));
        Ok(json!(true))
    }

    async fn delete(&self, _entity_id: &str, _language: Language) -> Result<Value, StoreError> {
        Ok(json!(true))
    }
}

fn type_text(state: &mut dashform::FormState, name: &str, text: &str) {
    let field = state.field_mut(name).expect("field exists");
    for ch in text.chars() {
        field.handle_key(&KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
    }
}

#[test]
fn definition_document_builds_a_tabbed_create_form() {
    let definition = form_definition_from_str(BLOG_FORM, DocumentFormat::Json).unwrap();
    assert_eq!(definition.display_title(), "Blog posts");
    assert_eq!(definition.fields_for(Tab::Arabic).count(), 2);
    assert_eq!(definition.field("tags").map(|f| f.kind), Some(FieldType::Keywords));

    let ui = FormUI::new(definition);
    assert_eq!(ui.layout(), FormLayout::Tabbed);
    let state = ui.build_state().unwrap();
    assert_eq!(state.sections.len(), 2);
    assert_eq!(state.sections[0].fields.len(), 6);
    assert_eq!(state.sections[1].fields.len(), 2);
    assert!(!state.is_dirty());
}

#[tokio::test]
async fn typed_input_is_validated_then_submitted_once() {
    let definition = form_definition_from_str(BLOG_FORM, DocumentFormat::Json).unwrap();
    let mut state = FormUI::new(definition).build_state().unwrap();
    let store = Arc::new(CapturingStore::default());
    let controller = SubmissionController::new(
        store.clone(),
        SubmitMode::Create { parent_id: None },
        Translator::new(Language::English),
    );

    type_text(&mut state, "title", "A");
    type_text(&mut state, "slug", "Not A Slug");
    let outcome = controller.submit(&mut state).await;
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.get("title"), Some("title must be at least 2 characters"));
    assert_eq!(errors.get("tags"), Some("tags is required"));
    assert!(errors.get("slug").is_some());
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);

    state.handle_input_change("title", FormValue::text("Launch day"));
    state.handle_input_change("slug", FormValue::text("launch-day"));
    type_text(&mut state, "tags", "news");
    state
        .field_mut("tags")
        .unwrap()
        .handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    state.handle_input_change("order", FormValue::Number(2.0));

    let outcome = controller.submit(&mut state).await;
    assert!(outcome.is_saved(), "{outcome:?}");
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);

    let payloads = store.payloads.lock().unwrap();
    let (language, payload) = &payloads[0];
    assert_eq!(*language, Language::English);
    assert_eq!(
        payload,
        &json!({
            "title": "Launch day",
            "slug": "launch-day",
            "tags": ["news"],
            "order": 2.0
        })
    );
}

#[tokio::test]
async fn update_flow_seeds_current_data_and_submits_choice_ids() {
    let definition = form_definition_from_str(BLOG_FORM, DocumentFormat::Json).unwrap();
    let seed = form_values_from_str(
        r#"{"title": "Hello", "tags": ["a"], "category": {"id": 2, "label": "Events"},
            "meta": {"author": "Sara"}, "unknown": 1}"#,
        DocumentFormat::Json,
        &definition.fields,
    )
    .unwrap();
    let mode = SubmitMode::Update {
        entity_id: "12".into(),
    };
    let mut state = FormUI::new(definition)
        .with_mode(mode.clone())
        .with_language(Language::Arabic)
        .with_seed(seed)
        .build_state()
        .unwrap();
    assert_eq!(state.layout(), FormLayout::Flat);
    assert!(!state.is_dirty());

    let store = Arc::new(CapturingStore::default());
    let controller =
        SubmissionController::new(store.clone(), mode, Translator::new(Language::Arabic));
    let outcome = controller.submit(&mut state).await;
    let SubmitOutcome::Saved {
        notification,
        navigate_back,
        ..
    } = outcome
    else {
        panic!("expected saved outcome");
    };
    assert!(!navigate_back);
    assert_ne!(notification.text, "Updated successfully");

    let payloads = store.payloads.lock().unwrap();
    let (language, payload) = &payloads[0];
    assert_eq!(*language, Language::Arabic);
    assert_eq!(payload["category"], json!(2));
    assert_eq!(payload["meta"], json!({"author": "Sara"}));
    assert!(payload.get("unknown").is_none());
}

#[test]
fn values_serialize_in_declaration_order() {
    let values = FormValues::new()
        .with("title", FormValue::text("Hello"))
        .with("tags", FormValue::Keywords(vec!["a".into()]));
    let rendered = serde_json::to_string(&values).unwrap();
    assert_eq!(rendered, r#"{"title":"Hello","tags":["a"]}"#);
}
