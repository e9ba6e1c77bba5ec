//! Navigation history

use tracing::debug;

/// Back-stack of visited paths with a cursor on the current entry.
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Vec<String>,
    index: usize,
}

impl Navigator {
    pub fn new(start: &str) -> Self {
        Self {
            entries: vec![start.to_string()],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Visit `path` as a new entry, dropping any forward entries.
    pub fn push(&mut self, path: &str) {
        if self.current() == path {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_string());
        self.index = self.entries.len() - 1;
        debug!(path, depth = self.entries.len(), "Navigate");
    }

    /// Overwrite the current entry so back-navigation cannot return to it.
    pub fn replace(&mut self, path: &str) {
        debug!(from = %self.entries[self.index], to = path, "Navigate (replace)");
        self.entries[self.index] = path.to_string();
    }

    /// Step back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        debug!(path = %self.entries[self.index], "Navigate back");
        true
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
