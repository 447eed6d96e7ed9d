mod base;
mod checkbox;
pub(crate) mod helpers;
mod image;
mod keywords;
mod multi_image;
mod number;
mod palette;
mod record;
mod select;
mod text;

use std::sync::Arc;

use crate::domain::{FieldDescriptor, FieldType};
use crate::form::preview::PreviewStore;

pub use base::{CollectionPanel, ComponentKind, SelectStateRef};
pub(crate) use base::FieldComponent;
pub use checkbox::CheckboxComponent;
pub use image::ImageComponent;
pub use keywords::KeywordsComponent;
pub use multi_image::MultiImageComponent;
pub use number::NumberComponent;
pub use palette::{CheckboxPresentation, CollectionHints, ComponentPalette, NumericTuning};
pub use record::RecordComponent;
pub use select::SelectComponent;
pub use text::TextComponent;

/// Shared resources handed to every widget of a form.
#[derive(Debug, Clone, Default)]
pub struct ComponentEnv {
    pub palette: Arc<ComponentPalette>,
    pub previews: PreviewStore,
}

impl ComponentEnv {
    pub fn new(palette: Arc<ComponentPalette>, previews: PreviewStore) -> Self {
        Self { palette, previews }
    }
}

pub(crate) fn component_for(
    descriptor: &FieldDescriptor,
    env: &ComponentEnv,
) -> Box<dyn FieldComponent> {
    let palette = Arc::clone(&env.palette);
    match descriptor.kind {
        FieldType::Text | FieldType::AltText => Box::new(TextComponent::single_line()),
        FieldType::Textarea => Box::new(TextComponent::multi_line(
            descriptor.rows.unwrap_or(palette.textarea_rows),
        )),
        FieldType::Number => Box::new(NumberComponent::new(palette)),
        FieldType::Checkbox => Box::new(CheckboxComponent::new(palette)),
        FieldType::Select => Box::new(SelectComponent::new(
            descriptor.options.clone().unwrap_or_default(),
            descriptor.source.clone(),
            palette.select_wrap,
        )),
        FieldType::Image | FieldType::SectionImage => {
            Box::new(ImageComponent::new(env.previews.clone()))
        }
        FieldType::MultiImage => {
            Box::new(MultiImageComponent::new(env.previews.clone(), palette))
        }
        FieldType::Keywords => Box::new(KeywordsComponent::new(palette)),
        FieldType::Record => Box::new(RecordComponent::new(palette)),
    }
}
