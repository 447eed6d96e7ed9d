#![deny(rust_2018_idioms)]

//! Schema-driven bilingual content forms.
//!
//! A [`FormDefinition`] lists the fields of a CMS entity. From it the crate
//! synthesizes a [`FormValidator`], renders an English/Arabic tabbed form in
//! the terminal and submits the result through an [`EntityStore`], usually
//! the bundled REST client.

pub mod app;
pub mod domain;
pub mod form;
pub mod i18n;
pub mod io;
pub mod presentation;
pub mod search;
pub mod submit;
pub mod validation;

pub use app::{FormUI, UiOptions, UiOutcome};
pub use domain::{FieldDescriptor, FieldType, FormDefinition, SelectOption, Tab};
pub use form::{FormLayout, FormState, FormValue, FormValues};
pub use i18n::{Language, Translator};
pub use submit::{EntityStore, RestClient, SubmissionController, SubmitMode, SubmitOutcome};
pub use validation::{FormValidator, RuleRegistry};

pub mod prelude {
    pub use super::{
        EntityStore, FieldDescriptor, FieldType, FormDefinition, FormUI, FormValidator,
        FormValue, FormValues, Language, RestClient, RuleRegistry, SubmissionController,
        SubmitMode, SubmitOutcome, Tab, Translator, UiOptions, UiOutcome,
    };
}

#[cfg(test)]
mod tests;
