use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::form::{FormState, FormValues};
use crate::i18n::{Language, Translator};
use crate::validation::ValidationErrors;

use super::error::StoreError;
use super::payload::Payload;
use super::store::{EntityStore, is_truthy};

/// Which persistence callback a submit goes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    Create { parent_id: Option<String> },
    Update { entity_id: String },
}

impl SubmitMode {
    pub fn operation(&self) -> Operation {
        match self {
            SubmitMode::Create { .. } => Operation::Create,
            SubmitMode::Update { .. } => Operation::Update,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn success_key(self) -> &'static str {
        match self {
            Operation::Create => "Created successfully",
            Operation::Update => "Updated successfully",
            Operation::Delete => "Deleted successfully",
        }
    }

    fn fallback_key(self) -> &'static str {
        match self {
            Operation::Create => "An error occurred",
            Operation::Update => "Update failed",
            Operation::Delete => "Deletion failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; errors are shown inline and nothing was sent.
    Invalid(ValidationErrors),
    Saved {
        response: Value,
        notification: Notification,
        navigate_back: bool,
    },
    /// The store answered with a falsy response; the form is left as is.
    Unconfirmed,
    /// The store failed. `None` when an error hook took over reporting.
    Failed { notification: Option<Notification> },
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            SubmitOutcome::Saved { notification, .. } => Some(notification),
            SubmitOutcome::Failed { notification } => notification.as_ref(),
            _ => None,
        }
    }
}

pub type SuccessHook = Box<dyn Fn(&FormValues, &Value) + Send + Sync>;
pub type ErrorHook = Box<dyn Fn(&StoreError) + Send + Sync>;

/// Validate, send and report one form submission.
pub struct SubmissionController {
    store: Arc<dyn EntityStore>,
    mode: SubmitMode,
    translator: Translator,
    on_success: Option<SuccessHook>,
    on_error: Option<ErrorHook>,
}

impl fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionController")
            .field("mode", &self.mode)
            .field("language", &self.translator.language())
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl SubmissionController {
    pub fn new(store: Arc<dyn EntityStore>, mode: SubmitMode, translator: Translator) -> Self {
        Self {
            store,
            mode,
            translator,
            on_success: None,
            on_error: None,
        }
    }

    pub fn with_on_success(
        mut self,
        hook: impl Fn(&FormValues, &Value) + Send + Sync + 'static,
    ) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    pub fn with_on_error(mut self, hook: impl Fn(&StoreError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    pub fn mode(&self) -> &SubmitMode {
        &self.mode
    }

    pub fn language(&self) -> Language {
        self.translator.language()
    }

    /// Run one submission. The store is called at most once and only for a
    /// form that passed validation.
    pub async fn submit(&self, state: &mut FormState) -> SubmitOutcome {
        let values = match state.validate_all() {
            Ok(values) => values,
            Err(errors) => {
                tracing::debug!(count = errors.len(), "submission blocked by validation");
                if let Some(name) = state.first_error_field().map(str::to_string) {
                    state.focus_field(&name);
                }
                return SubmitOutcome::Invalid(errors);
            }
        };

        let operation = self.mode.operation();
        let payload = Payload::from_values(&values, operation);
        let language = self.language();
        tracing::info!(
            operation = operation.as_str(),
            language = %language,
            multipart = payload.is_multipart(),
            "submitting form"
        );

        let result = match &self.mode {
            SubmitMode::Create { parent_id } => {
                self.store
                    .create(payload, language, parent_id.as_deref())
                    .await
            }
            SubmitMode::Update { entity_id } => {
                self.store.update(payload, entity_id, language).await
            }
        };

        match result {
            Ok(response) if is_truthy(&response) => {
                match operation {
                    Operation::Create => state.reset(),
                    _ => state.rebase(),
                }
                if let Some(hook) = &self.on_success {
                    hook(&values, &response);
                }
                SubmitOutcome::Saved {
                    response,
                    notification: Notification::success(self.translator.t(operation.success_key())),
                    navigate_back: operation == Operation::Create,
                }
            }
            Ok(response) => {
                tracing::warn!(operation = operation.as_str(), %response, "store returned a falsy response");
                SubmitOutcome::Unconfirmed
            }
            Err(err) => self.report_failure(operation, err),
        }
    }

    pub async fn delete(&self, entity_id: &str) -> SubmitOutcome {
        let language = self.language();
        tracing::info!(entity_id, language = %language, "deleting entity");
        match self.store.delete(entity_id, language).await {
            Ok(response) => SubmitOutcome::Saved {
                response,
                notification: Notification::success(
                    self.translator.t(Operation::Delete.success_key()),
                ),
                navigate_back: true,
            },
            Err(err) => self.report_failure(Operation::Delete, err),
        }
    }

    fn report_failure(&self, operation: Operation, err: StoreError) -> SubmitOutcome {
        tracing::warn!(operation = operation.as_str(), error = %err, "store call failed");
        if let Some(hook) = &self.on_error {
            hook(&err);
            return SubmitOutcome::Failed { notification: None };
        }
        let text = err
            .body()
            .and_then(|body| body.notification_text())
            .unwrap_or_else(|| self.translator.t(operation.fallback_key()).into_owned());
        SubmitOutcome::Failed {
            notification: Some(Notification::error(text)),
        }
    }
}
