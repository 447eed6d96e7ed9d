use crate::domain::{FieldDescriptor, Tab};

use super::field::{FieldState, components::ComponentEnv};

#[derive(Debug)]
pub struct SectionState {
    pub tab: Option<Tab>,
    pub title: String,
    pub fields: Vec<FieldState>,
    pub scroll_offset: usize,
}

impl SectionState {
    pub fn new<'a>(
        tab: Option<Tab>,
        title: impl Into<String>,
        descriptors: impl IntoIterator<Item = &'a FieldDescriptor>,
        env: &ComponentEnv,
    ) -> Self {
        let fields = descriptors
            .into_iter()
            .cloned()
            .map(|descriptor| FieldState::from_descriptor(descriptor, env))
            .collect();
        Self {
            tab,
            title: title.into(),
            fields,
            scroll_offset: 0,
        }
    }
}
