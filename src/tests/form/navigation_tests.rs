use std::sync::Arc;

use crate::{
    domain::{FieldDescriptor, FieldType, Tab},
    form::{ComponentEnv, FormLayout, FormState, FormValue, FormValues},
    i18n::Translator,
    validation::{FormValidator, RuleRegistry},
};

fn descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("title", "title", FieldType::Text).required(),
        FieldDescriptor::new("title_ar", "title_ar", FieldType::Text)
            .on_tab(Tab::Arabic)
            .required(),
        FieldDescriptor::new("slug", "slug", FieldType::Text),
    ]
}

fn state(layout: FormLayout) -> FormState {
    let fields = descriptors();
    let validator =
        FormValidator::synthesize(&fields, &RuleRegistry::default(), &Translator::default())
            .unwrap();
    FormState::new(&fields, layout, Arc::new(validator), &ComponentEnv::default())
}

#[test]
fn tabbed_layout_groups_fields_by_language() {
    let state = state(FormLayout::Tabbed);
    let names: Vec<Vec<&str>> = state
        .sections
        .iter()
        .map(|section| section.fields.iter().map(|f| f.name()).collect())
        .collect();
    assert_eq!(names, vec![vec!["title", "slug"], vec!["title_ar"]]);
}

#[test]
fn flat_layout_keeps_declaration_order() {
    let state = state(FormLayout::Flat);
    assert_eq!(state.sections.len(), 1);
    let names: Vec<&str> = state.sections[0].fields.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["title", "title_ar", "slug"]);
}

#[test]
fn focus_moves_across_tabs_and_wraps() {
    let mut state = state(FormLayout::Tabbed);
    state.focus_next_field();
    assert_eq!(state.focused_field().map(|f| f.name()), Some("slug"));
    state.focus_next_field();
    assert_eq!(state.section_index, 1);
    assert_eq!(state.focused_field().map(|f| f.name()), Some("title_ar"));
    state.focus_next_field();
    assert_eq!(state.focused_field().map(|f| f.name()), Some("title"));
    state.focus_prev_field();
    assert_eq!(state.focused_field().map(|f| f.name()), Some("title_ar"));
}

#[test]
fn submit_errors_focus_the_first_invalid_field_on_its_tab() {
    let mut state = state(FormLayout::Tabbed);
    state.handle_input_change("title", FormValue::text("Hello"));
    let errors = state.validate_all().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(state.first_error_field(), Some("title_ar"));
    assert!(state.focus_field("title_ar"));
    assert_eq!(state.section_index, 1);
}

#[test]
fn values_follow_declaration_order_across_tabs() {
    let state = state(FormLayout::Tabbed);
    let names: Vec<String> = state.values().iter().map(|(name, _)| name.clone()).collect();
    assert_eq!(names, vec!["title", "title_ar", "slug"]);
}

#[test]
fn reset_returns_to_the_seeded_snapshot() {
    let mut state = state(FormLayout::Flat);
    state.seed(&FormValues::new().with("title", FormValue::text("Original")));
    state.handle_input_change("title", FormValue::text("Changed"));
    assert!(state.is_dirty());
    state.reset();
    assert!(!state.is_dirty());
    assert_eq!(state.values().get("title"), Some(&FormValue::text("Original")));
}

#[test]
fn rebase_makes_current_values_the_snapshot() {
    let mut state = state(FormLayout::Flat);
    state.handle_input_change("slug", FormValue::text("hello-world"));
    state.rebase();
    assert!(!state.is_dirty());
    state.reset();
    assert_eq!(
        state.values().get("slug"),
        Some(&FormValue::text("hello-world"))
    );
}
