//! Command history with a recall cursor.

/// Previously submitted lines and a cursor for recalling them.
///
/// The cursor ranges over `0..=len`; `len` is the fresh line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted line and reset the cursor to the fresh line.
    ///
    /// Empty lines and lines equal to the previous entry are not recorded.
    /// Returns whether the line was recorded.
    pub fn push(&mut self, line: &str) -> bool {
        let recorded = !line.trim().is_empty()
            && self.entries.last().is_none_or(|last| last != line);
        if recorded {
            self.entries.push(line.to_string());
        }
        self.cursor = self.entries.len();
        recorded
    }

    /// Move toward the oldest entry and return it.
    ///
    /// Returns `None` when the history is empty. At the oldest entry the
    /// cursor stays put and that entry is returned again.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Move toward the fresh line and return the entry there.
    ///
    /// Returns `None` once the cursor reaches the fresh line.
    pub fn newer(&mut self) -> Option<&str> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.entries.get(self.cursor).map(String::as_str)
        } else {
            self.cursor = self.entries.len();
            None
        }
    }

    /// Recorded lines, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Current cursor position.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of recorded lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
