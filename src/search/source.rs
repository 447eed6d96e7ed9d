use async_trait::async_trait;

use crate::domain::SelectOption;
use crate::submit::StoreError;

/// Remote provider of select options.
#[async_trait]
pub trait OptionSource: Send + Sync {
    async fn search(&self, endpoint: &str, query: &str) -> Result<Vec<SelectOption>, StoreError>;
}

/// Case-insensitive substring filter on option labels.
pub fn filter_options(options: &[SelectOption], query: &str) -> Vec<SelectOption> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return options.to_vec();
    }
    options
        .iter()
        .filter(|option| option.label.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Serves a fixed option list, ignoring the endpoint.
#[derive(Debug, Clone, Default)]
pub struct StaticOptions {
    options: Vec<SelectOption>,
}

impl StaticOptions {
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self { options }
    }
}

#[async_trait]
impl OptionSource for StaticOptions {
    async fn search(&self, _endpoint: &str, query: &str) -> Result<Vec<SelectOption>, StoreError> {
        Ok(filter_options(&self.options, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::new(1, "News"),
            SelectOption::new(2, "Newsletter"),
            SelectOption::new(3, "Blog"),
        ]
    }

    #[test]
    fn filter_is_case_insensitive() {
        let hits = filter_options(&options(), "NEWS");
        assert_eq!(hits.len(), 2);
        assert_eq!(filter_options(&options(), "  ").len(), 3);
    }

    #[tokio::test]
    async fn static_source_filters_locally() {
        let source = StaticOptions::new(options());
        let hits = source.search("/categories", "blo").await.unwrap();
        assert_eq!(hits, vec![SelectOption::new(3, "Blog")]);
    }
}
