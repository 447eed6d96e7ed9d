use async_trait::async_trait;
use serde_json::Value;

use crate::i18n::Language;

use super::error::StoreError;
use super::payload::Payload;

/// Persistence callbacks for one entity. A truthy response confirms the
/// operation.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn create(
        &self,
        payload: Payload,
        language: Language,
        parent_id: Option<&str>,
    ) -> Result<Value, StoreError>;

    async fn update(
        &self,
        payload: Payload,
        entity_id: &str,
        language: Language,
    ) -> Result<Value, StoreError>;

    async fn delete(&self, entity_id: &str, language: Language) -> Result<Value, StoreError>;
}

/// JavaScript-style truthiness of a store response.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn truthiness_follows_loose_semantics() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(1)));
    }
}
