use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    domain::{FieldDescriptor, FieldType, ValidationConstraint},
    form::{ComponentEnv, FormLayout, FormState, FormValue, FormValues},
    i18n::{Language, Translator},
    submit::{
        ApiErrorBody, EntityStore, NotificationLevel, Operation, Payload, StoreError, SubmissionController,
        SubmitMode, SubmitOutcome,
    },
    validation::{FormValidator, RuleRegistry},
};

/// Store double that records every call and answers with a canned result.
struct RecordingStore {
    calls: AtomicUsize,
    last: Mutex<Option<(String, Language, Value)>>,
    reply: Box<dyn Fn() -> Result<Value, StoreError> + Send + Sync>,
}

impl RecordingStore {
    fn replying(reply: impl Fn() -> Result<Value, StoreError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
            reply: Box::new(reply),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, operation: &str, language: Language, payload: &Payload) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((operation.to_string(), language, payload.preview()));
    }
}

#[async_trait]
impl EntityStore for RecordingStore {
    async fn create(
        &self,
        payload: Payload,
        language: Language,
        parent_id: Option<&str>,
    ) -> Result<Value, StoreError> {
        self.record(&format!("create:{}", parent_id.unwrap_or("-")), language, &payload);
        (self.reply)()
    }

    async fn update(
        &self,
        payload: Payload,
        entity_id: &str,
        language: Language,
    ) -> Result<Value, StoreError> {
        self.record(&format!("update:{entity_id}"), language, &payload);
        (self.reply)()
    }

    async fn delete(&self, entity_id: &str, language: Language) -> Result<Value, StoreError> {
        self.record(
            &format!("delete:{entity_id}"),
            language,
            &Payload::from_values(&FormValues::new(), Operation::Delete),
        );
        (self.reply)()
    }
}

fn blog_state() -> FormState {
    let fields = vec![
        FieldDescriptor::new("title", "title", FieldType::Text)
            .required()
            .with_validation(ValidationConstraint {
                min_length: Some(2),
                ..Default::default()
            }),
        FieldDescriptor::new("views", "views", FieldType::Number),
        FieldDescriptor::new("subtitle", "subtitle", FieldType::Text),
    ];
    let validator =
        FormValidator::synthesize(&fields, &RuleRegistry::default(), &Translator::default())
            .unwrap();
    FormState::new(&fields, FormLayout::Flat, Arc::new(validator), &ComponentEnv::default())
}

fn create_mode() -> SubmitMode {
    SubmitMode::Create { parent_id: None }
}

#[tokio::test]
async fn valid_submit_calls_the_store_exactly_once() {
    let store = RecordingStore::replying(|| Ok(json!({"id": 1})));
    let controller = SubmissionController::new(store.clone(), create_mode(), Translator::default());
    let mut state = blog_state();
    state.handle_input_change("title", FormValue::text("Valid Title"));

    let outcome = controller.submit(&mut state).await;

    assert_eq!(store.calls(), 1);
    match outcome {
        SubmitOutcome::Saved {
            response,
            notification,
            navigate_back,
        } => {
            assert_eq!(response, json!({"id": 1}));
            assert_eq!(notification.level, NotificationLevel::Success);
            assert_eq!(notification.text, "Created successfully");
            assert!(navigate_back);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let (operation, language, payload) = store.last.lock().unwrap().clone().unwrap();
    assert_eq!(operation, "create:-");
    assert_eq!(language, Language::English);
    assert_eq!(payload["title"], json!("Valid Title"));
    // create resets to the (empty) initial snapshot
    assert_eq!(state.values().get("title"), Some(&FormValue::Empty));
}

#[tokio::test]
async fn invalid_submit_never_reaches_the_store() {
    let store = RecordingStore::replying(|| Ok(json!(true)));
    let controller = SubmissionController::new(store.clone(), create_mode(), Translator::default());
    let mut state = blog_state();
    state.handle_input_change("title", FormValue::text("A"));
    state.handle_input_change("views", FormValue::text("-1"));

    let outcome = controller.submit(&mut state).await;

    assert_eq!(store.calls(), 0);
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.get("title"), Some("title must be at least 2 characters"));
    assert_eq!(
        errors.get("views"),
        Some("views must be greater than or equal to 0")
    );
    assert_eq!(state.error_count(), 2);
    assert_eq!(state.focused_field().map(|f| f.name()), Some("title"));
}

#[tokio::test]
async fn non_finite_numbers_are_rejected_before_submit() {
    let store = RecordingStore::replying(|| Ok(json!(true)));
    let controller = SubmissionController::new(store.clone(), create_mode(), Translator::default());
    let mut state = blog_state();
    state.handle_input_change("title", FormValue::text("Valid Title"));

    for raw in ["infinity", "-inf", "1e400"] {
        state.handle_input_change("views", FormValue::text(raw));
        assert_eq!(
            state.field("views").and_then(|f| f.error.as_deref()),
            Some("views must be a number"),
            "{raw}"
        );
        let SubmitOutcome::Invalid(errors) = controller.submit(&mut state).await else {
            panic!("{raw} should not submit");
        };
        assert_eq!(errors.get("views"), Some("views must be a number"));
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn update_sends_fields_the_user_cleared() {
    let store = RecordingStore::replying(|| Ok(json!(true)));
    let controller = SubmissionController::new(
        store.clone(),
        SubmitMode::Update {
            entity_id: "5".into(),
        },
        Translator::default(),
    );
    let mut state = blog_state();
    state.seed(
        &FormValues::new()
            .with("title", FormValue::text("Title"))
            .with("subtitle", FormValue::text("old subtitle")),
    );
    state.handle_input_change("subtitle", FormValue::text(""));

    assert!(controller.submit(&mut state).await.is_saved());

    let (_, _, payload) = store.last.lock().unwrap().clone().unwrap();
    let body = payload.as_object().unwrap();
    assert_eq!(body.get("subtitle"), Some(&Value::Null));
    assert_eq!(body.get("title"), Some(&json!("Title")));
    assert!(body.contains_key("views"));
}

#[tokio::test]
async fn update_rebases_and_stays_on_the_form() {
    let store = RecordingStore::replying(|| Ok(json!({"ok": true})));
    let controller = SubmissionController::new(
        store.clone(),
        SubmitMode::Update {
            entity_id: "42".into(),
        },
        Translator::new(Language::Arabic),
    );
    let mut state = blog_state();
    state.seed(&FormValues::new().with("title", FormValue::text("Old")));
    state.handle_input_change("title", FormValue::text("New title"));

    let outcome = controller.submit(&mut state).await;

    let SubmitOutcome::Saved { navigate_back, .. } = outcome else {
        panic!("expected saved");
    };
    assert!(!navigate_back);
    assert!(!state.is_dirty());
    assert_eq!(state.initial_values().get("title"), Some(&FormValue::text("New title")));
    let (operation, language, _) = store.last.lock().unwrap().clone().unwrap();
    assert_eq!(operation, "update:42");
    assert_eq!(language, Language::Arabic);
}

#[tokio::test]
async fn falsy_response_is_unconfirmed_and_keeps_values() {
    let store = RecordingStore::replying(|| Ok(json!(false)));
    let controller = SubmissionController::new(store.clone(), create_mode(), Translator::default());
    let mut state = blog_state();
    state.handle_input_change("title", FormValue::text("Kept"));

    let outcome = controller.submit(&mut state).await;

    assert_eq!(outcome, SubmitOutcome::Unconfirmed);
    assert!(outcome.notification().is_none());
    assert_eq!(state.values().get("title"), Some(&FormValue::text("Kept")));
    assert!(state.is_dirty());
}

#[tokio::test]
async fn field_errors_from_the_backend_become_one_notification() {
    let store = RecordingStore::replying(|| {
        Err(StoreError::from_response(
            400,
            r#"{"statusCode":400,"error":"Bad Request","message":[{"field":"slug","message":"taken"}]}"#,
        ))
    });
    let controller = SubmissionController::new(store.clone(), create_mode(), Translator::default());
    let mut state = blog_state();
    state.handle_input_change("title", FormValue::text("Valid Title"));

    let outcome = controller.submit(&mut state).await;

    let notification = outcome.notification().cloned().unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(notification.text, "slug: taken");
}

#[tokio::test]
async fn failures_without_a_message_use_the_localized_fallback() {
    let store = RecordingStore::replying(|| Err(StoreError::api(500, Some(ApiErrorBody::default()))));
    let controller = SubmissionController::new(
        store.clone(),
        SubmitMode::Update {
            entity_id: "1".into(),
        },
        Translator::default(),
    );
    let mut state = blog_state();
    state.handle_input_change("title", FormValue::text("Valid Title"));

    let outcome = controller.submit(&mut state).await;

    assert_eq!(
        outcome.notification().map(|n| n.text.as_str()),
        Some("Update failed")
    );
}

#[tokio::test]
async fn error_hook_replaces_the_default_notification() {
    let seen = Arc::new(AtomicUsize::new(0));
    let store = RecordingStore::replying(|| Err(StoreError::Transport("offline".into())));
    let hook_seen = Arc::clone(&seen);
    let controller = SubmissionController::new(store.clone(), create_mode(), Translator::default())
        .with_on_error(move |_| {
            hook_seen.fetch_add(1, Ordering::SeqCst);
        });
    let mut state = blog_state();
    state.handle_input_change("title", FormValue::text("Valid Title"));

    let outcome = controller.submit(&mut state).await;

    assert_eq!(outcome, SubmitOutcome::Failed { notification: None });
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn success_hook_sees_the_submitted_values() {
    let captured = Arc::new(Mutex::new(None));
    let store = RecordingStore::replying(|| Ok(json!({"id": 9})));
    let sink = Arc::clone(&captured);
    let controller = SubmissionController::new(store.clone(), create_mode(), Translator::default())
        .with_on_success(move |values, response| {
            *sink.lock().unwrap() = Some((values.to_json(), response.clone()));
        });
    let mut state = blog_state();
    state.handle_input_change("title", FormValue::text("Hooked"));

    controller.submit(&mut state).await;

    let (values, response) = captured.lock().unwrap().clone().unwrap();
    assert_eq!(values["title"], json!("Hooked"));
    assert_eq!(response, json!({"id": 9}));
}

#[tokio::test]
async fn delete_reports_success_and_navigates_back() {
    let store = RecordingStore::replying(|| Ok(Value::Null));
    let controller = SubmissionController::new(store.clone(), create_mode(), Translator::default());

    let outcome = controller.delete("7").await;

    assert_eq!(store.calls(), 1);
    assert_eq!(
        outcome.notification().map(|n| n.text.as_str()),
        Some("Deleted successfully")
    );
    assert!(matches!(outcome, SubmitOutcome::Saved { navigate_back: true, .. }));
}
