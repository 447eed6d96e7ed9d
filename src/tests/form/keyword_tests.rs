use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    domain::{FieldDescriptor, FieldType},
    form::{ComponentEnv, FormCommand, FormEngine, FormLayout, FormState, FormValue},
    i18n::Translator,
    validation::{FormValidator, RuleRegistry},
};

fn tags_state() -> FormState {
    let fields = vec![FieldDescriptor::new("tags", "tags", FieldType::Keywords).required()];
    let validator =
        FormValidator::synthesize(&fields, &RuleRegistry::default(), &Translator::default())
            .unwrap();
    FormState::new(&fields, FormLayout::Flat, Arc::new(validator), &ComponentEnv::default())
}

fn press(state: &mut FormState, code: KeyCode) {
    state
        .field_mut("tags")
        .unwrap()
        .handle_key(&KeyEvent::new(code, KeyModifiers::NONE));
}

fn tags_error(state: &FormState) -> Option<&str> {
    state.field("tags").and_then(|field| field.error.as_deref())
}

#[test]
fn adding_a_keyword_clears_the_required_error() {
    let mut state = tags_state();
    assert!(state.validate_all().is_err());
    assert_eq!(tags_error(&state), Some("tags is required"));

    for ch in "news".chars() {
        press(&mut state, KeyCode::Char(ch));
    }
    // typing alone does not commit the keyword
    let pending = FormEngine::new(&mut state).dispatch(FormCommand::FieldEdited {
        name: "tags".into(),
    });
    assert_eq!(pending, Err("tags is required".to_string()));
    assert_eq!(tags_error(&state), Some("tags is required"));

    press(&mut state, KeyCode::Enter);
    let committed = FormEngine::new(&mut state).dispatch(FormCommand::FieldEdited {
        name: "tags".into(),
    });

    assert_eq!(committed, Ok(()));
    assert_eq!(tags_error(&state), None);
    assert_eq!(
        state.values().get("tags"),
        Some(&FormValue::Keywords(vec!["news".into()]))
    );
    assert_eq!(state.error_count(), 0);
}

#[test]
fn input_change_revalidates_only_the_edited_field() {
    let mut state = tags_state();
    assert!(state.validate_all().is_err());

    state.handle_input_change("tags", FormValue::Keywords(vec!["cms".into()]));
    assert_eq!(tags_error(&state), None);

    state.handle_input_change("tags", FormValue::Keywords(vec![]));
    assert_eq!(tags_error(&state), Some("tags is required"));
}
