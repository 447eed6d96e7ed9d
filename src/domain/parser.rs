use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::Validator;
use serde_json::Value;

use super::schema::FormDefinition;

static DEFINITION_VALIDATOR: LazyLock<Result<Validator, String>> = LazyLock::new(|| {
    jsonschema::validator_for(&definition_schema()).map_err(|err| err.to_string())
});

/// JSON Schema describing a form definition document.
pub fn definition_schema() -> Value {
    let root = schemars::schema_for!(FormDefinition);
    serde_json::to_value(root).unwrap_or(Value::Null)
}

/// Parse a form definition document, reporting every structural problem with
/// its JSON pointer before attempting deserialization.
pub fn parse_form_definition(value: &Value) -> Result<FormDefinition> {
    let validator = DEFINITION_VALIDATOR
        .as_ref()
        .map_err(|err| anyhow!("failed to compile definition schema: {err}"))?;

    let problems = validator
        .iter_errors(value)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let pointer = if pointer.is_empty() {
                "<root>".to_string()
            } else {
                pointer
            };
            format!("{pointer}: {error}")
        })
        .collect::<Vec<_>>();
    if !problems.is_empty() {
        bail!("invalid form definition:\n{}", problems.join("\n"));
    }

    let definition: FormDefinition =
        serde_json::from_value(value.clone()).context("failed to decode form definition")?;

    let mut seen = HashSet::new();
    for field in &definition.fields {
        if field.name.trim().is_empty() {
            bail!("field names cannot be empty");
        }
        if !seen.insert(field.name.as_str()) {
            bail!("duplicate field name '{}'", field.name);
        }
    }
    Ok(definition)
}
