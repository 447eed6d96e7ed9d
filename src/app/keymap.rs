use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use super::input::KeyAction;

macro_rules! keymap_source {
    () => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/keymap/default.keymap.json"
        ))
    };
}

/// Where the key was pressed; bindings are scoped to one or more contexts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeymapContext {
    Default,
    Collection,
    Overlay,
}

impl KeymapContext {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "default" => Some(KeymapContext::Default),
            "collection" => Some(KeymapContext::Collection),
            "overlay" => Some(KeymapContext::Overlay),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    id: String,
    description: String,
    contexts: Vec<String>,
    action: RawAction,
    combos: Vec<String>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RawAction {
    Save,
    Quit,
    ResetStatus,
    TogglePopup,
    EditEntry,
    FieldStep { delta: i32 },
    SectionStep { delta: i32 },
    ListAddEntry,
    ListRemoveEntry,
    ListSelect { delta: i32 },
}

impl From<RawAction> for KeyAction {
    fn from(raw: RawAction) -> Self {
        match raw {
            RawAction::Save => KeyAction::Save,
            RawAction::Quit => KeyAction::Quit,
            RawAction::ResetStatus => KeyAction::ResetStatus,
            RawAction::TogglePopup => KeyAction::TogglePopup,
            RawAction::EditEntry => KeyAction::EditEntry,
            RawAction::FieldStep { delta } => KeyAction::FieldStep(delta),
            RawAction::SectionStep { delta } => KeyAction::SectionStep(delta),
            RawAction::ListAddEntry => KeyAction::ListAddEntry,
            RawAction::ListRemoveEntry => KeyAction::ListRemoveEntry,
            RawAction::ListSelect { delta } => KeyAction::ListSelect(delta),
        }
    }
}

struct KeyBinding {
    action: KeyAction,
    contexts: Vec<KeymapContext>,
    combos: Vec<KeyPattern>,
    snippet: String,
}

impl KeyBinding {
    fn from_raw(raw: RawEntry) -> Result<Self> {
        let contexts = raw
            .contexts
            .iter()
            .filter_map(|ctx| KeymapContext::parse(ctx))
            .collect::<Vec<_>>();
        if contexts.is_empty() {
            bail!("keymap entry {} must declare at least one context", raw.id);
        }
        let combos = raw
            .combos
            .iter()
            .map(|combo| {
                KeyPattern::parse(combo)
                    .map_err(|err| anyhow!("failed to parse combo '{combo}' for {}: {err}", raw.id))
            })
            .collect::<Result<Vec<_>>>()?;
        if combos.is_empty() {
            bail!("keymap entry {} must declare combos", raw.id);
        }
        let combos_display = combos
            .iter()
            .map(|pattern| pattern.display.as_str())
            .collect::<Vec<_>>()
            .join("/");
        Ok(Self {
            action: raw.action.into(),
            contexts,
            combos,
            snippet: format!("{combos_display} -> {}", raw.description),
        })
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        self.combos.iter().any(|pattern| pattern.matches(key))
    }
}

struct KeyPattern {
    matcher: CodeMatcher,
    required: KeyModifiers,
    allow_shift: bool,
    display: String,
}

impl KeyPattern {
    fn parse(spec: &str) -> Result<Self, String> {
        let display = spec.trim().to_string();
        let mut tokens = display
            .split('+')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>();
        let Some(key_token) = tokens.pop() else {
            return Err("combo must contain key".into());
        };
        let mut required = KeyModifiers::empty();
        let mut matcher = CodeMatcher::from_token(key_token)?;
        for token in tokens {
            match token.to_lowercase().as_str() {
                "ctrl" | "control" => required |= KeyModifiers::CONTROL,
                "alt" => required |= KeyModifiers::ALT,
                "shift" if matcher == CodeMatcher::Literal(KeyCode::Tab) => {
                    matcher = CodeMatcher::Literal(KeyCode::BackTab);
                }
                "shift" => required |= KeyModifiers::SHIFT,
                other => return Err(format!("unsupported modifier '{other}'")),
            }
        }
        let allow_shift = matcher.allows_extra_shift() && !required.contains(KeyModifiers::SHIFT);
        Ok(Self {
            matcher,
            required,
            allow_shift,
            display,
        })
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        if !self.matcher.matches(&key.code) || !key.modifiers.contains(self.required) {
            return false;
        }
        let extra = key.modifiers - self.required;
        if self.allow_shift {
            (extra - KeyModifiers::SHIFT).is_empty()
        } else {
            extra.is_empty()
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CodeMatcher {
    Literal(KeyCode),
    Alpha(char),
}

impl CodeMatcher {
    fn from_token(token: &str) -> Result<Self, String> {
        let normalized = token.to_lowercase();
        let matcher = match normalized.as_str() {
            "tab" => CodeMatcher::Literal(KeyCode::Tab),
            "backtab" => CodeMatcher::Literal(KeyCode::BackTab),
            "enter" => CodeMatcher::Literal(KeyCode::Enter),
            "esc" | "escape" => CodeMatcher::Literal(KeyCode::Esc),
            "left" => CodeMatcher::Literal(KeyCode::Left),
            "right" => CodeMatcher::Literal(KeyCode::Right),
            "up" => CodeMatcher::Literal(KeyCode::Up),
            "down" => CodeMatcher::Literal(KeyCode::Down),
            "delete" | "del" => CodeMatcher::Literal(KeyCode::Delete),
            "backspace" => CodeMatcher::Literal(KeyCode::Backspace),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => CodeMatcher::Alpha(ch),
                    _ => return Err(format!("unsupported key '{token}'")),
                }
            }
        };
        Ok(matcher)
    }

    fn matches(&self, code: &KeyCode) -> bool {
        match (self, code) {
            (CodeMatcher::Literal(expected), actual) => actual == expected,
            (CodeMatcher::Alpha(expected), KeyCode::Char(actual)) => {
                actual.to_ascii_lowercase() == *expected
            }
            _ => false,
        }
    }

    fn allows_extra_shift(&self) -> bool {
        matches!(
            self,
            CodeMatcher::Alpha(_) | CodeMatcher::Literal(KeyCode::BackTab)
        )
    }
}

/// Parsed key bindings with per-context help text.
pub struct KeymapStore {
    bindings: Vec<KeyBinding>,
}

impl std::fmt::Debug for KeymapStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeymapStore")
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

static DEFAULT_KEYMAP: LazyLock<Arc<KeymapStore>> = LazyLock::new(|| {
    Arc::new(
        KeymapStore::from_json(keymap_source!()).unwrap_or_else(|err| {
            tracing::error!(error = %err, "bundled keymap is invalid");
            KeymapStore {
                bindings: Vec::new(),
            }
        }),
    )
});

impl KeymapStore {
    pub fn from_json(source: &str) -> Result<Self> {
        let raw_entries: Vec<RawEntry> =
            serde_json::from_str(source).context("invalid keymap document")?;
        let bindings = raw_entries
            .into_iter()
            .map(KeyBinding::from_raw)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bindings })
    }

    /// The bindings bundled with the crate.
    pub fn bundled() -> Arc<Self> {
        Arc::clone(&DEFAULT_KEYMAP)
    }

    pub fn classify(&self, key: &KeyEvent, context: KeymapContext) -> Option<KeyAction> {
        self.bindings
            .iter()
            .filter(|binding| binding.contexts.contains(&context))
            .find(|binding| binding.matches(key))
            .map(|binding| binding.action)
    }

    pub fn help_text(&self, context: KeymapContext) -> Option<String> {
        let snippets = self
            .bindings
            .iter()
            .filter(|binding| binding.contexts.contains(&context))
            .map(|binding| binding.snippet.as_str())
            .collect::<Vec<_>>();
        if snippets.is_empty() {
            None
        } else {
            Some(snippets.join(" • "))
        }
    }
}
