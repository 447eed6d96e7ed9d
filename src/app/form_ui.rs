use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::{
    domain::FormDefinition,
    form::{ComponentEnv, FormLayout, FormState, FormValues, PreviewStore},
    i18n::{Language, Translator},
    search::OptionSource,
    submit::{EntityStore, ErrorHook, StoreError, SubmissionController, SubmitMode, SuccessHook},
    validation::{FormValidator, RuleRegistry},
};

use super::{
    options::UiOptions,
    runtime::{App, AppParts},
};

/// How an interactive session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum UiOutcome {
    /// The form validated and (when a store is attached) the store confirmed it.
    Saved {
        values: FormValues,
        response: Option<Value>,
        navigate_back: bool,
    },
    Cancelled,
}

/// Builder for one interactive create/update form session.
pub struct FormUI {
    definition: FormDefinition,
    title: Option<String>,
    layout: Option<FormLayout>,
    mode: SubmitMode,
    translator: Translator,
    seed: Option<FormValues>,
    store: Option<Arc<dyn EntityStore>>,
    option_source: Option<Arc<dyn OptionSource>>,
    registry: RuleRegistry,
    options: UiOptions,
    on_success: Option<SuccessHook>,
    on_error: Option<ErrorHook>,
}

impl fmt::Debug for FormUI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormUI")
            .field("entity", &self.definition.entity)
            .field("mode", &self.mode)
            .field("language", &self.translator.language())
            .field("store", &self.store.is_some())
            .field("option_source", &self.option_source.is_some())
            .finish()
    }
}

impl FormUI {
    pub fn new(definition: FormDefinition) -> Self {
        Self {
            definition,
            title: None,
            layout: None,
            mode: SubmitMode::Create { parent_id: None },
            translator: Translator::default(),
            seed: None,
            store: None,
            option_source: None,
            registry: RuleRegistry::default(),
            options: UiOptions::default(),
            on_success: None,
            on_error: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Override the layout; by default create forms are tabbed and update
    /// forms are flat.
    pub fn with_layout(mut self, layout: FormLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_mode(mut self, mode: SubmitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.translator = Translator::new(language);
        self
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    /// Current entity data loaded into the form before editing.
    pub fn with_seed(mut self, values: FormValues) -> Self {
        self.seed = Some(values);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_option_source(mut self, source: Arc<dyn OptionSource>) -> Self {
        self.option_source = Some(source);
        self
    }

    pub fn with_rule_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
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

    pub fn layout(&self) -> FormLayout {
        self.layout.unwrap_or(match self.mode {
            SubmitMode::Create { .. } => FormLayout::Tabbed,
            SubmitMode::Update { .. } => FormLayout::Flat,
        })
    }

    /// Synthesize the validator and build the seeded form state.
    pub fn build_state(&self) -> Result<FormState> {
        let env = self.component_env();
        self.build_state_with(&env)
    }

    /// Run the form until it is saved or abandoned. Must be called outside
    /// of an async runtime; store calls block on an internal one.
    pub fn run(self) -> Result<UiOutcome> {
        let env = self.component_env();
        let form_state = self.build_state_with(&env)?;
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| self.definition.display_title());
        let FormUI {
            mode,
            translator,
            store,
            option_source,
            options,
            on_success,
            on_error,
            ..
        } = self;

        let controller = store.map(|store| {
            let mut controller = SubmissionController::new(store, mode, translator.clone());
            if let Some(hook) = on_success {
                controller = controller.with_on_success(hook);
            }
            if let Some(hook) = on_error {
                controller = controller.with_on_error(hook);
            }
            controller
        });
        tracing::info!(
            title = %title,
            language = %translator.language(),
            remote_options = option_source.is_some(),
            "starting form session"
        );

        let mut app = App::new(AppParts {
            title,
            form_state,
            controller,
            option_source,
            translator,
            env,
            options,
        })?;
        app.run()
    }

    fn component_env(&self) -> ComponentEnv {
        ComponentEnv::new(
            Arc::clone(&self.options.component_palette),
            PreviewStore::new(),
        )
    }

    fn build_state_with(&self, env: &ComponentEnv) -> Result<FormState> {
        let validator =
            FormValidator::synthesize(&self.definition.fields, &self.registry, &self.translator)
                .with_context(|| {
                    format!("failed to build validator for '{}'", self.definition.entity)
                })?;
        let mut state = FormState::new(
            &self.definition.fields,
            self.layout(),
            Arc::new(validator),
            env,
        );
        if let Some(seed) = &self.seed {
            state.seed(seed);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldDescriptor, FieldType, Tab};
    use crate::form::FormValue;

    fn definition() -> FormDefinition {
        FormDefinition {
            entity: "blogs".into(),
            title: None,
            fields: vec![
                FieldDescriptor::new("title", "title", FieldType::Text).required(),
                FieldDescriptor::new("title_ar", "title_ar", FieldType::Text).on_tab(Tab::Arabic),
            ],
        }
    }

    #[test]
    fn create_defaults_to_tabbed_layout() {
        let ui = FormUI::new(definition());
        assert_eq!(ui.layout(), FormLayout::Tabbed);
        let state = ui.build_state().unwrap();
        assert_eq!(state.sections.len(), 2);
    }

    #[test]
    fn update_defaults_to_flat_layout_and_seeds_values() {
        let ui = FormUI::new(definition())
            .with_mode(SubmitMode::Update {
                entity_id: "7".into(),
            })
            .with_seed(FormValues::new().with("title", FormValue::text("Hello")));
        assert_eq!(ui.layout(), FormLayout::Flat);
        let state = ui.build_state().unwrap();
        assert_eq!(state.sections.len(), 1);
        assert_eq!(
            state.values().get("title"),
            Some(&FormValue::text("Hello"))
        );
        assert!(!state.is_dirty());
    }

    #[test]
    fn unknown_custom_rule_fails_to_build() {
        let mut definition = definition();
        definition.fields[0].validation = Some(crate::domain::ValidationConstraint {
            custom: Some("isbn".into()),
            ..Default::default()
        });
        let err = FormUI::new(definition).build_state().unwrap_err();
        assert!(format!("{err:#}").contains("isbn"));
    }
}
