//! Session configuration.
//!
//! All fields have defaults matching the hosted pad, so an empty JSON object
//! is a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default location the interpreter runtime is fetched from.
pub const DEFAULT_RUNTIME_LOCATION: &str = "https://cdn.jsdelivr.net/pyodide/v0.25.1/full/pyodide.js";

/// Placeholder substituted with the render target id in the plot prelude.
pub const TARGET_PLACEHOLDER: &str = "{target}";

const DEFAULT_PLOT_PRELUDE: &str = r#"import matplotlib
matplotlib.use("module://matplotlib_pyodide.html5_canvas_backend")
from js import document
document.pyodideMplTarget = document.getElementById("{target}")
"#;

/// Configuration for a pad session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the interpreter runtime is fetched from.
    pub runtime_location: String,
    /// Timeout for fetching the runtime, in seconds.
    pub fetch_timeout_secs: u64,
    /// Largest runtime artifact accepted, in bytes.
    pub max_runtime_bytes: usize,
    /// Library name whose presence in submitted code triggers plot redirection.
    pub plot_keyword: String,
    /// Code prepended to plotting submissions. `{target}` is replaced with
    /// the render target id.
    pub plot_prelude: String,
    /// Labels applied to plot toolbar controls.
    pub icons: IconSet,
    /// Width descriptions are wrapped to in the `help` table.
    pub help_wrap_width: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            runtime_location: DEFAULT_RUNTIME_LOCATION.to_string(),
            fetch_timeout_secs: 60,
            max_runtime_bytes: 64 * 1024 * 1024, // 64 MB
            plot_keyword: "matplotlib".to_string(),
            plot_prelude: DEFAULT_PLOT_PRELUDE.to_string(),
            icons: IconSet::default(),
            help_wrap_width: 40,
        }
    }
}

impl SessionConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is unusable.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded session configuration");
        Self::from_json_str(&text)
    }

    /// Set the runtime location.
    #[must_use]
    pub fn with_runtime_location(mut self, location: impl Into<String>) -> Self {
        self.runtime_location = location.into();
        self
    }

    /// Set the runtime fetch timeout.
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_secs = timeout.as_secs();
        self
    }

    /// Set the plotting library keyword.
    #[must_use]
    pub fn with_plot_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.plot_keyword = keyword.into();
        self
    }

    /// Set the plot prelude template.
    #[must_use]
    pub fn with_plot_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.plot_prelude = prelude.into();
        self
    }

    /// Set the toolbar icon set.
    #[must_use]
    pub fn with_icons(mut self, icons: IconSet) -> Self {
        self.icons = icons;
        self
    }

    /// Set the help table wrap width.
    #[must_use]
    pub const fn with_help_wrap_width(mut self, width: usize) -> Self {
        self.help_wrap_width = width;
        self
    }

    /// The fetch timeout as a [`Duration`].
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.runtime_location.trim().is_empty() {
            return Err(Error::Config("runtime_location must not be empty".into()));
        }
        if self.plot_keyword.is_empty() {
            return Err(Error::Config("plot_keyword must not be empty".into()));
        }
        if self.help_wrap_width < 8 {
            return Err(Error::Config(format!(
                "help_wrap_width must be at least 8, got {}",
                self.help_wrap_width
            )));
        }
        Ok(())
    }
}

/// Labels for the save actions a plotting library attaches to a render target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSet {
    /// Save as raster image.
    pub image: String,
    /// Save as vector graphic.
    pub vector: String,
    /// Save as document.
    pub document: String,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            image: "\u{1F5BC} PNG".to_string(),
            vector: "\u{270E} SVG".to_string(),
            document: "\u{1F4C4} PDF".to_string(),
        }
    }
}
