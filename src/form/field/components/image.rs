use crossterm::event::KeyEvent;

use crate::form::preview::{PreviewGuard, PreviewStore};
use crate::form::value::{FileHandle, FormValue, ImageSource};

use super::helpers::handle_text_edit;
use super::{ComponentKind, FieldComponent};

/// An image source paired with the preview it owns, if it is a local file.
#[derive(Debug)]
pub(crate) struct PreviewedImage {
    pub(crate) source: ImageSource,
    pub(crate) preview: Option<PreviewGuard>,
}

impl PreviewedImage {
    /// Resolve typed input: an existing regular file becomes a local upload,
    /// anything else is kept as a URL.
    pub(crate) fn resolve(raw: &str, previews: &PreviewStore) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match FileHandle::open(trimmed) {
            Some(file) => Self::from_source(ImageSource::File(file), previews),
            None => Self::from_source(ImageSource::Url(trimmed.to_string()), previews),
        })
    }

    pub(crate) fn from_source(source: ImageSource, previews: &PreviewStore) -> Self {
        let preview = match &source {
            ImageSource::File(file) => Some(previews.acquire(&file.path)),
            ImageSource::Url(_) => None,
        };
        Self { source, preview }
    }

    /// Local files show name, size and their live preview handle.
    pub(crate) fn describe(&self) -> String {
        match (&self.source, &self.preview) {
            (ImageSource::File(file), Some(preview)) => format!(
                "{} ({}) {}",
                file.file_name,
                human_size(file.size),
                preview.url()
            ),
            (ImageSource::File(file), None) => {
                format!("{} ({})", file.file_name, human_size(file.size))
            }
            (ImageSource::Url(url), _) => url.clone(),
        }
    }
}

/// `image` and `section_image` fields: one path-or-URL input.
#[derive(Debug)]
pub struct ImageComponent {
    buffer: String,
    current: Option<PreviewedImage>,
    previews: PreviewStore,
}

impl ImageComponent {
    pub fn new(previews: PreviewStore) -> Self {
        Self {
            buffer: String::new(),
            current: None,
            previews,
        }
    }

    fn refresh(&mut self) {
        let trimmed = self.buffer.trim();
        if let Some(PreviewedImage {
            source: ImageSource::File(file),
            ..
        }) = &self.current
            && file.path.as_os_str() == trimmed
        {
            return;
        }
        // Assigning drops the previous guard, which revokes its preview.
        self.current = PreviewedImage::resolve(&self.buffer, &self.previews);
    }

    #[cfg(test)]
    pub(crate) fn preview_url(&self) -> Option<String> {
        self.current
            .as_ref()
            .and_then(|image| image.preview.as_ref())
            .map(PreviewGuard::url)
    }
}

impl FieldComponent for ImageComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Image
    }

    fn display_value(&self) -> String {
        match &self.current {
            Some(image @ PreviewedImage {
                source: ImageSource::File(_),
                ..
            }) => format!("{}  ✓ {}", self.buffer, image.describe()),
            _ => self.buffer.clone(),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if handle_text_edit(&mut self.buffer, key) {
            self.refresh();
            true
        } else {
            false
        }
    }

    fn seed(&mut self, value: &FormValue) {
        self.current = match value {
            FormValue::Image(source) => Some(PreviewedImage::from_source(
                source.clone(),
                &self.previews,
            )),
            FormValue::Text(text) => PreviewedImage::resolve(text, &self.previews),
            _ => None,
        };
        self.buffer = match &self.current {
            Some(PreviewedImage {
                source: ImageSource::File(file),
                ..
            }) => file.path.to_string_lossy().into_owned(),
            Some(PreviewedImage {
                source: ImageSource::Url(url),
                ..
            }) => url.clone(),
            None => String::new(),
        };
    }

    fn value(&self) -> FormValue {
        match &self.current {
            Some(image) => FormValue::Image(image.source.clone()),
            None => FormValue::Empty,
        }
    }
}

pub(crate) fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit + 1 < UNITS.len() {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn type_text(component: &mut ImageComponent, text: &str) {
        for ch in text.chars() {
            component.handle_key(&KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    #[test]
    fn typed_url_has_no_preview() {
        let previews = PreviewStore::new();
        let mut image = ImageComponent::new(previews.clone());
        type_text(&mut image, "https://cdn.example.com/a.png");
        assert_eq!(
            image.value(),
            FormValue::Image(ImageSource::Url("https://cdn.example.com/a.png".into()))
        );
        assert_eq!(previews.live_count(), 0);
    }

    #[test]
    fn local_file_acquires_and_releases_preview() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"png").unwrap();
        let previews = PreviewStore::new();
        let mut image = ImageComponent::new(previews.clone());
        image.seed(&FormValue::text(file.path().to_string_lossy()));
        assert!(image.value().has_file());
        let preview = image.preview_url().expect("preview handle");
        assert!(image.display_value().contains(&preview));
        assert_eq!(previews.resolve(&preview).as_deref(), Some(file.path()));
        assert_eq!(previews.live_count(), 1);

        image.handle_key(&KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE));
        assert_eq!(image.value(), FormValue::Empty);
        assert_eq!(previews.live_count(), 0);
    }

    #[test]
    fn sizes_are_humanized() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
    }
}
