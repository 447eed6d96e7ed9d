use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::domain::{FieldDescriptor, FormDefinition, parse_form_definition};
use crate::form::FormValues;

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Try `preferred` first, then every other compiled-in format.
pub fn parse_document_any(contents: &str, preferred: DocumentFormat) -> Result<Value> {
    let primary = match parse_document_str(contents, preferred) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    for candidate in DocumentFormat::available_formats() {
        if candidate == preferred {
            continue;
        }
        if let Ok(value) = parse_document_str(contents, candidate) {
            return Ok(value);
        }
    }
    let tried = DocumentFormat::available_formats()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(anyhow!("tried {tried} (first error: {primary:#})"))
}

/// Parse and validate a form-definition document.
pub fn form_definition_from_str(contents: &str, format: DocumentFormat) -> Result<FormDefinition> {
    let value = parse_document_any(contents, format)?;
    parse_form_definition(&value)
}

/// Parse entity data into form values for `fields`.
pub fn form_values_from_str(
    contents: &str,
    format: DocumentFormat,
    fields: &[FieldDescriptor],
) -> Result<FormValues> {
    let value = parse_document_any(contents, format)?;
    if !value.is_object() {
        return Err(anyhow!("entity data must be an object"));
    }
    Ok(FormValues::from_json(fields, &value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormValue;

    #[test]
    fn definition_round_trips_from_json_text() {
        let definition = form_definition_from_str(
            r#"{"entity": "blogs", "fields": [{"name": "title", "label": "Title", "type": "text"}]}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        assert_eq!(definition.entity, "blogs");
        assert_eq!(definition.fields.len(), 1);
    }

    #[test]
    fn entity_data_must_be_an_object() {
        let err = form_values_from_str("[1, 2]", DocumentFormat::Json, &[]).unwrap_err();
        assert!(err.to_string().contains("object"));
    }

    #[test]
    fn entity_data_maps_onto_fields() {
        let definition = form_definition_from_str(
            r#"{"entity": "blogs", "fields": [{"name": "title", "label": "Title", "type": "text"}]}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        let values = form_values_from_str(
            r#"{"title": "Hello", "other": 1}"#,
            DocumentFormat::Json,
            &definition.fields,
        )
        .unwrap();
        assert_eq!(values.get("title"), Some(&FormValue::text("Hello")));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn garbage_reports_every_format_tried() {
        let err = parse_document_any("{not: valid", DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("json"));
    }
}
