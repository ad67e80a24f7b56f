//! Error types.
//!
//! [`Fault`] is what a submission can produce; it always ends up as text in
//! the transcript. [`Error`] is returned by the API surface around the
//! engine (configuration, file import/export, the console queue).

/// Message shown for every submission made while the runtime is not ready.
pub const NOT_LOADED_MESSAGE: &str = "Error: Python runtime is not loaded.";

/// A fault raised while servicing one submission.
///
/// Every variant renders with a distinct prefix so that fault lines can
/// never be mistaken for `<-- value` lines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// The runtime is not ready, so nothing was attempted. Once a load has
    /// failed every submission gets this fault.
    #[error("{}", NOT_LOADED_MESSAGE)]
    NotLoaded,

    /// A library referenced by an import could not be resolved.
    #[error("DependencyError: {0}")]
    Dependency(String),

    /// The submitted code raised while it was evaluated.
    #[error("PythonError: {0}")]
    Evaluation(String),
}

/// Errors returned by the engine's API surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error while importing or exporting code.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The console task behind a [`ConsoleHandle`](crate::ConsoleHandle) has stopped.
    #[error("console is no longer accepting submissions")]
    ConsoleClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_prefixes_are_distinct() {
        let rendered = [
            Fault::NotLoaded.to_string(),
            Fault::Dependency("no module".into()).to_string(),
            Fault::Evaluation("ZeroDivisionError".into()).to_string(),
        ];

        assert_eq!(rendered[0], NOT_LOADED_MESSAGE);
        assert_eq!(rendered[1], "DependencyError: no module");
        assert_eq!(rendered[2], "PythonError: ZeroDivisionError");
        assert!(rendered.iter().all(|line| !line.starts_with("<--")));
    }
}
