//! Model of the code editing surface.
//!
//! The buffer holds the code being edited and the current completion. A
//! suggestion is only ever shown; accepting it is up to the surface.

use std::path::Path;

use crate::completion::{Suggester, Suggestion};
use crate::error::Error;

/// Program the pad starts with.
pub const WELCOME_CODE: &str = r#"# Welcome to the Python Pad!
# Type your Python code here and click "Run".

import numpy as np

a = np.array([1, 2, 3])
print(f"Here is a numpy array: {a}")

# The result of the last expression is also displayed
[x * 2 for x in range(10)]
"#;

/// The widget that renders the code.
pub trait EditorSurface {
    /// Show `ghost` inline after the cursor; empty clears it.
    fn set_suggestion(&mut self, ghost: &str);
}

/// The code buffer and its completion state.
#[derive(Debug, Clone)]
pub struct CodeBuffer {
    code: String,
    suggestion: Option<Suggestion>,
    suggester: Suggester,
}

impl Default for CodeBuffer {
    fn default() -> Self {
        Self::new(WELCOME_CODE)
    }
}

impl CodeBuffer {
    /// Create a buffer holding `code`.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self::with_suggester(code, Suggester::default())
    }

    /// Create a buffer that completes from a specific symbol table.
    #[must_use]
    pub fn with_suggester(code: impl Into<String>, suggester: Suggester) -> Self {
        Self {
            code: code.into(),
            suggestion: None,
            suggester,
        }
    }

    /// Record an edit and push the new ghost text to `surface`.
    pub fn on_buffer_changed(&mut self, text: impl Into<String>, surface: &mut dyn EditorSurface) {
        self.code = text.into();
        self.suggestion = self.suggester.suggest_entry(&self.code);
        surface.set_suggestion(self.ghost());
    }

    /// The code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The current suggestion, if any.
    #[must_use]
    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    /// The unaccepted remainder of the current suggestion.
    #[must_use]
    pub fn ghost(&self) -> &str {
        self.suggestion.as_ref().map_or("", Suggestion::ghost)
    }

    /// Replace the buffer with an imported plain-text payload.
    pub fn import_text(&mut self, payload: impl Into<String>) {
        self.code = payload.into();
        self.suggestion = None;
    }

    /// The buffer as a plain-text payload.
    #[must_use]
    pub fn export_text(&self) -> &str {
        &self.code
    }

    /// Import code from a text file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as UTF-8.
    pub async fn load(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "Imported code");
        self.import_text(text);
        Ok(())
    }

    /// Export the code to a text file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        tokio::fs::write(path, self.code.as_bytes()).await?;
        tracing::debug!(path = %path.display(), bytes = self.code.len(), "Exported code");
        Ok(())
    }
}
