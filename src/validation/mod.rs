//! Validation rules synthesized from field descriptors.
//!
//! [`FormValidator::synthesize`] walks the descriptor list once and builds one
//! [`FieldRule`] per field through an explicit `match` on the field type. The
//! resulting validator checks whole forms on submit and single fields while
//! editing. Cross-field constraints are not expressible.

mod custom;
mod rules;
mod synth;

pub use custom::{CustomCheck, RuleRegistry};
pub use rules::FieldRule;
pub use synth::{FormValidator, SynthesisError, ValidationErrors};
