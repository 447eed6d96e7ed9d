use serde_json::json;

use crate::{
    domain::{FieldDescriptor, FieldType, ValidationConstraint},
    form::{FormValue, FormValues, ImageSource},
    i18n::{Language, Translator},
    validation::{FormValidator, RuleRegistry, SynthesisError},
};

fn validator(fields: &[FieldDescriptor]) -> FormValidator {
    FormValidator::synthesize(fields, &RuleRegistry::default(), &Translator::default()).unwrap()
}

fn min_title() -> FieldDescriptor {
    FieldDescriptor::new("title", "title", FieldType::Text)
        .required()
        .with_validation(ValidationConstraint {
            min_length: Some(2),
            ..Default::default()
        })
}

#[test]
fn min_length_reports_the_bound() {
    let validator = validator(&[min_title()]);
    let short = FormValues::new().with("title", FormValue::text("A"));
    assert_eq!(
        validator.validate_field("title", &short),
        Err("title must be at least 2 characters".to_string())
    );
    let ok = FormValues::new().with("title", FormValue::text("Valid Title"));
    assert!(validator.validate(&ok).is_ok());
}

#[test]
fn whitespace_only_text_counts_as_missing() {
    let validator = validator(&[min_title()]);
    let blank = FormValues::new().with("title", FormValue::text("   "));
    assert_eq!(
        validator.validate_field("title", &blank),
        Err("title is required".to_string())
    );
}

#[test]
fn required_keywords_reject_an_empty_list() {
    let validator = validator(&[FieldDescriptor::new("tags", "tags", FieldType::Keywords).required()]);
    let values = FormValues::new().with("tags", FormValue::Keywords(vec![]));
    let errors = validator.validate(&values).unwrap_err();
    assert_eq!(errors.get("tags"), Some("tags is required"));
}

#[test]
fn optional_number_accepts_empty_and_rejects_negatives() {
    let validator = validator(&[FieldDescriptor::new("order", "order", FieldType::Number)]);
    assert!(validator.validate(&FormValues::new()).is_ok());
    let zero = FormValues::new().with("order", FormValue::Number(0.0));
    assert!(validator.validate(&zero).is_ok());
    let negative = FormValues::new().with("order", FormValue::Number(-1.0));
    assert_eq!(
        validator.validate_field("order", &negative),
        Err("order must be greater than or equal to 0".to_string())
    );
    for raw in ["abc", "infinity", "inf", "1e400", "NaN"] {
        let junk = FormValues::new().with("order", FormValue::text(raw));
        assert_eq!(
            validator.validate_field("order", &junk),
            Err("order must be a number".to_string()),
            "{raw}"
        );
    }
    let overflow = FormValues::new().with("order", FormValue::Number(f64::INFINITY));
    assert_eq!(
        validator.validate_field("order", &overflow),
        Err("order must be a number".to_string())
    );
}

#[test]
fn every_image_needs_a_file_or_url() {
    for field in [
        FieldDescriptor::new("cover", "cover", FieldType::Image),
        FieldDescriptor::new("cover", "cover", FieldType::SectionImage).required(),
    ] {
        let validator = validator(&[field]);
        let errors = validator.validate(&FormValues::new()).unwrap_err();
        assert_eq!(errors.get("cover"), Some("cover is required."));
        let blank = FormValues::new().with("cover", FormValue::Image(ImageSource::Url("  ".into())));
        assert_eq!(
            validator.validate_field("cover", &blank),
            Err("cover is required.".to_string())
        );
        let url = FormValues::new().with(
            "cover",
            FormValue::Image(ImageSource::Url("https://cdn.example/a.png".into())),
        );
        assert!(validator.validate(&url).is_ok());
    }
}

#[test]
fn custom_message_overrides_every_failure() {
    let field = FieldDescriptor::new("slug", "slug", FieldType::Text)
        .required()
        .with_validation(ValidationConstraint {
            custom: Some("slug".into()),
            message: Some("Use lowercase words separated by dashes".into()),
            ..Default::default()
        });
    let validator = validator(&[field]);
    for raw in ["", "Not A Slug"] {
        let values = FormValues::new().with("slug", FormValue::text(raw));
        assert_eq!(
            validator.validate_field("slug", &values),
            Err("Use lowercase words separated by dashes".to_string())
        );
    }
    let ok = FormValues::new().with("slug", FormValue::text("hello-world"));
    assert!(validator.validate(&ok).is_ok());
}

#[test]
fn url_and_pattern_constraints() {
    let fields = [
        FieldDescriptor::new("link", "link", FieldType::Text).with_validation(ValidationConstraint {
            url: true,
            ..Default::default()
        }),
        FieldDescriptor::new("code", "code", FieldType::Text).with_validation(ValidationConstraint {
            pattern: Some("^[A-Z]{3}$".into()),
            ..Default::default()
        }),
    ];
    let validator = validator(&fields);
    let values = FormValues::new()
        .with("link", FormValue::text("not a url"))
        .with("code", FormValue::text("abc"));
    let errors = validator.validate(&values).unwrap_err();
    assert_eq!(errors.get("link"), Some("link must be a valid URL"));
    assert_eq!(errors.get("code"), Some("code has an invalid format"));
}

#[test]
fn messages_follow_the_session_language() {
    let translator = Translator::new(Language::Arabic);
    let validator =
        FormValidator::synthesize(&[min_title()], &RuleRegistry::default(), &translator).unwrap();
    let values = FormValues::new().with("title", FormValue::text("A"));
    let message = validator.validate_field("title", &values).unwrap_err();
    assert!(message.contains('2'));
    assert_ne!(message, "title must be at least 2 characters");
}

#[test]
fn synthesis_rejects_bad_descriptors() {
    let bad_pattern = FieldDescriptor::new("code", "code", FieldType::Text).with_validation(
        ValidationConstraint {
            pattern: Some("([".into()),
            ..Default::default()
        },
    );
    let err = FormValidator::synthesize(&[bad_pattern], &RuleRegistry::default(), &Translator::default())
        .unwrap_err();
    assert!(matches!(err, SynthesisError::InvalidPattern { .. }));

    let twice = [
        FieldDescriptor::new("title", "title", FieldType::Text),
        FieldDescriptor::new("title", "title", FieldType::Text),
    ];
    let err = FormValidator::synthesize(&twice, &RuleRegistry::default(), &Translator::default())
        .unwrap_err();
    assert!(matches!(err, SynthesisError::DuplicateField(name) if name == "title"));
}

#[test]
fn exported_schema_accepts_valid_values() {
    let fields = [
        min_title(),
        FieldDescriptor::new("tags", "tags", FieldType::Keywords).required(),
        FieldDescriptor::new("order", "order", FieldType::Number),
        FieldDescriptor::new("cover", "cover", FieldType::Image),
    ];
    let schema = validator(&fields).to_json_schema();
    let compiled = jsonschema::validator_for(&schema).unwrap();

    let valid = FormValues::new()
        .with("title", FormValue::text("Valid Title"))
        .with("tags", FormValue::Keywords(vec!["news".into()]))
        .with("order", FormValue::Number(3.0))
        .with("cover", FormValue::text("https://cdn.example/a.png"));
    assert!(compiled.is_valid(&valid.to_json()));
    let mut no_cover = valid.to_json();
    no_cover["cover"] = json!(null);
    assert!(!compiled.is_valid(&no_cover));
    assert!(!compiled.is_valid(&json!({"title": "A", "tags": ["x"]})));
    assert!(!compiled.is_valid(&json!({"title": "Valid", "tags": []})));
}
