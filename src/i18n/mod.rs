//! Message translation keyed by the literal English string.
//!
//! Every user-facing label, status and validation message is routed through a
//! [`Translator`]. English is the identity catalog; Arabic ships bundled with
//! the crate. Unknown keys fall back to the key itself.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

static ARABIC_CATALOG: LazyLock<HashMap<String, String>> = LazyLock::new(|| {
    serde_json::from_str(include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/locales/ar.json"
    )))
    .unwrap_or_default()
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    /// Parse a language code, tolerating case and region tags (`ar-EG`).
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        let primary = normalized.split(['-', '_']).next().unwrap_or("");
        match primary {
            "en" | "english" => Some(Language::English),
            "ar" | "arabic" => Some(Language::Arabic),
            _ => None,
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Arabic)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Translator {
    language: Language,
    overrides: HashMap<String, String>,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            overrides: HashMap::new(),
        }
    }

    /// Add or replace catalog entries on top of the bundled ones.
    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.overrides
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn t<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        if let Some(hit) = self.overrides.get(key) {
            return Cow::Borrowed(hit.as_str());
        }
        match self.language {
            Language::English => Cow::Borrowed(key),
            Language::Arabic => ARABIC_CATALOG
                .get(key)
                .map(|hit| Cow::Borrowed(hit.as_str()))
                .unwrap_or(Cow::Borrowed(key)),
        }
    }

    /// Translate `key` and substitute `{name}` placeholders in order.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut output = self.t(key).into_owned();
        for (name, value) in args {
            output = output.replace(&format!("{{{name}}}"), value);
        }
        output
    }
}
