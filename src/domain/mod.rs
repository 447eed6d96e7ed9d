mod parser;
mod schema;

pub use parser::{definition_schema, parse_form_definition};
pub use schema::{
    FieldDescriptor, FieldType, FormDefinition, SelectOption, Tab, ValidationConstraint,
};

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_minimal_definition_with_defaults() {
        let definition = parse_form_definition(&json!({
            "entity": "blogs",
            "fields": [
                {"name": "title", "label": "Title", "type": "text", "required": true},
                {"name": "title_ar", "label": "العنوان", "type": "text", "tab": "Arabic"}
            ]
        }))
        .expect("definition parses");
        assert_eq!(definition.fields.len(), 2);
        assert_eq!(definition.fields[0].tab, Tab::English);
        assert!(definition.fields[0].required);
        assert_eq!(definition.fields[1].tab, Tab::Arabic);
        assert!(!definition.fields[1].required);
        assert_eq!(definition.fields_for(Tab::Arabic).count(), 1);
    }

    #[test]
    fn reports_unknown_field_type_with_pointer() {
        let err = parse_form_definition(&json!({
            "entity": "blogs",
            "fields": [{"name": "title", "label": "Title", "type": "markdown"}]
        }))
        .expect_err("unknown type is rejected");
        let message = err.to_string();
        assert!(message.contains("/fields/0/type"), "message: {message}");
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let err = parse_form_definition(&json!({
            "entity": "careers",
            "fields": [
                {"name": "slug", "label": "Slug", "type": "text"},
                {"name": "slug", "label": "Slug again", "type": "text"}
            ]
        }))
        .expect_err("duplicates are rejected");
        assert!(err.to_string().contains("duplicate field name 'slug'"));
    }

    #[test]
    fn validation_constraints_use_camel_case_keys() {
        let definition = parse_form_definition(&json!({
            "entity": "offers",
            "fields": [{
                "name": "title",
                "label": "title",
                "type": "text",
                "validation": {"minLength": 2, "maxLength": 50, "url": false}
            }]
        }))
        .expect("definition parses");
        let validation = definition.fields[0].validation.as_ref().unwrap();
        assert_eq!(validation.min_length, Some(2));
        assert_eq!(validation.max_length, Some(50));
    }

    #[test]
    fn display_label_appends_name_when_different() {
        let field = FieldDescriptor::new("title_ar", "Title", FieldType::Text);
        assert_eq!(field.display_label(), "Title (title_ar)");
        let same = FieldDescriptor::new("title", "Title", FieldType::Text);
        assert_eq!(same.display_label(), "Title");
    }
}
