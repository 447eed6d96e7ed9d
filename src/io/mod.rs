mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{
    form_definition_from_str, form_values_from_str, parse_document_any, parse_document_str,
};
pub use output::{OutputDestination, OutputOptions, emit};
