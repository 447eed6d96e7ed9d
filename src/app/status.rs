use crate::i18n::Translator;

const READY_STATUS: &str = "Ready. Press Ctrl+S to validate and save.";

/// Footer status text, localized when it is set.
#[derive(Debug, Clone)]
pub struct StatusLine {
    translator: Translator,
    message: String,
}

impl StatusLine {
    pub fn new(translator: Translator) -> Self {
        let message = translator.t(READY_STATUS).into_owned();
        Self {
            translator,
            message,
        }
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn ready(&mut self) {
        self.message = self.translator.t(READY_STATUS).into_owned();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = self.translator.format("Editing {label}", &[("label", label)]);
    }

    pub fn value_updated(&mut self) {
        self.message = self.translator.t("Value updated").into_owned();
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.message = self
            .translator
            .format("{count} issue(s) remaining", &[("count", &count.to_string())]);
    }

    pub fn submitting(&mut self) {
        self.message = self.translator.t("Submitting...").into_owned();
    }

    pub fn searching(&mut self) {
        self.message = self.translator.t("Searching...").into_owned();
    }

    pub fn unconfirmed(&mut self) {
        self.message = self
            .translator
            .t("The server did not confirm the change")
            .into_owned();
    }

    pub fn pending_exit(&mut self) {
        self.message = self
            .translator
            .t("Unsaved changes. Press Ctrl+Q again to quit without saving.")
            .into_owned();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
