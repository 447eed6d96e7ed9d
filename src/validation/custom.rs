use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

pub type CustomCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Named predicates that descriptors can reference via `validation.custom`.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, CustomCheck>,
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, name: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(check));
        self
    }

    pub fn with_rule<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.register(name, check);
        self
    }

    pub fn get(&self, name: &str) -> Option<CustomCheck> {
        self.rules.get(name).cloned()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::empty()
            .with_rule("slug", |value| SLUG.is_match(value))
            .with_rule("email", |value| EMAIL.is_match(value))
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.rules.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("RuleRegistry").field("rules", &names).finish()
    }
}
