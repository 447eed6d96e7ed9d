/// Ordered, duplicate-free keyword list with a pending entry buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordList {
    items: Vec<String>,
    pending: String,
    selected: usize,
}

impl KeywordList {
    pub fn new(items: impl IntoIterator<Item = String>) -> Self {
        let mut list = Self::default();
        list.replace(items);
        list
    }

    /// Replace every keyword, dropping blanks and repeats.
    pub fn replace(&mut self, items: impl IntoIterator<Item = String>) {
        self.items.clear();
        for item in items {
            self.add(&item);
        }
        self.selected = 0;
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.items.iter().any(|item| item == keyword)
    }

    /// Append a trimmed keyword. Blank or already-present entries are ignored.
    pub fn add(&mut self, raw: &str) -> bool {
        let keyword = raw.trim();
        if keyword.is_empty() || self.contains(keyword) {
            return false;
        }
        self.items.push(keyword.to_string());
        true
    }

    pub fn remove(&mut self, keyword: &str) -> bool {
        let Some(index) = self.items.iter().position(|item| item == keyword) else {
            return false;
        };
        self.remove_at(index)
    }

    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        true
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut String {
        &mut self.pending
    }

    /// Commit the pending buffer. The buffer is cleared when the keyword is
    /// accepted and kept otherwise so the user can fix it.
    pub fn commit_pending(&mut self) -> bool {
        let pending = std::mem::take(&mut self.pending);
        if self.add(&pending) {
            self.selected = self.items.len() - 1;
            true
        } else {
            if !pending.trim().is_empty() {
                self.pending = pending;
            }
            false
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.selected.min(self.items.len() - 1))
        }
    }

    pub fn select(&mut self, delta: i32) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let len = self.items.len() as i32;
        let next = (self.selected as i32 + delta).clamp(0, len - 1) as usize;
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    pub fn remove_selected(&mut self) -> bool {
        match self.selected_index() {
            Some(index) => self.remove_at(index),
            None => false,
        }
    }
}
