//! Command-line style session over the execution pipeline.
//!
//! A submitted line is either a built-in handled locally or code handed to
//! the [`ExecutionPipeline`]. The console owns the [`Transcript`] and the
//! [`History`]; taking `&mut self` per submission guarantees submissions are
//! processed one at a time, in order. [`Console::spawn`] extends that
//! guarantee to many concurrent callers via a queue.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut console = Console::new(&config, pipeline);
//! console.submit("echo hi there").await;
//! console.submit("2+2").await;
//! assert!(console.transcript().text().ends_with("<-- 4"));
//! ```

pub mod handle;
mod help;
pub mod history;

pub use handle::ConsoleHandle;
pub use help::BUILTINS;
pub use history::History;

use crate::bootstrap::BootstrapState;
use crate::config::SessionConfig;
use crate::pipeline::ExecutionPipeline;
use crate::transcript::Transcript;

/// Prefix of the echo line written for every submission.
pub const PROMPT: &str = "> ";

/// Line written before the output of a script run from the editor.
pub const RUNNING_MESSAGE: &str = "> Running code...";

/// Line written once the runtime has loaded.
pub const READY_MESSAGE: &str = "Python environment ready.";

/// How a submitted line is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Show the reference table.
    Help,
    /// Empty the transcript.
    Clear,
    /// Print the text following the command.
    Echo(&'a str),
    /// Run the line as code.
    Code(&'a str),
}

/// Classify a line of input. Blank lines yield `None`.
#[must_use]
pub fn classify(line: &str) -> Option<Command<'_>> {
    let trimmed = line.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let token = parts.next().filter(|token| !token.is_empty())?;

    let command = match token.to_lowercase().as_str() {
        "help" | "man" => Command::Help,
        "clear" | "cls" => Command::Clear,
        "echo" => Command::Echo(parts.next().map_or("", str::trim_start)),
        _ => Command::Code(line),
    };
    Some(command)
}

/// The session console.
#[derive(Debug)]
pub struct Console {
    pipeline: ExecutionPipeline,
    transcript: Transcript,
    history: History,
    input: String,
    help_wrap_width: usize,
}

impl Console {
    /// Create a console with an empty transcript.
    #[must_use]
    pub fn new(config: &SessionConfig, pipeline: ExecutionPipeline) -> Self {
        Self::with_transcript(config, pipeline, Transcript::new())
    }

    /// Create a console writing into `transcript`.
    #[must_use]
    pub fn with_transcript(
        config: &SessionConfig,
        pipeline: ExecutionPipeline,
        transcript: Transcript,
    ) -> Self {
        Self {
            pipeline,
            transcript,
            history: History::new(),
            input: String::new(),
            help_wrap_width: config.help_wrap_width,
        }
    }

    /// Submit a line of input.
    ///
    /// Returns the text appended in response, or `None` if the line was
    /// blank or cleared the transcript.
    pub async fn submit(&mut self, line: &str) -> Option<String> {
        let command = classify(line)?;

        self.history.push(line);
        self.input.clear();
        tracing::debug!(command = ?command, "Console submission");

        match command {
            Command::Clear => {
                let destroyed = self.transcript.clear();
                tracing::debug!(render_targets = destroyed, "Transcript cleared");
                None
            }
            Command::Help => {
                self.transcript.push_echo(format!("{PROMPT}{line}"));
                let table = help::render_table(self.help_wrap_width);
                self.transcript.push_fragment(table.clone());
                Some(table)
            }
            Command::Echo(text) => {
                self.transcript.push_echo(format!("{PROMPT}{line}"));
                self.transcript.push_fragment(text);
                Some(text.to_string())
            }
            Command::Code(code) => {
                self.transcript.push_echo(format!("{PROMPT}{line}"));
                let fragment = self.pipeline.run(code, &mut self.transcript).await.fragment();
                self.transcript.push_fragment(fragment.clone());
                Some(fragment)
            }
        }
    }

    /// Run a whole script, as the editor's run button does.
    ///
    /// The script is not recorded in history and is never treated as a
    /// built-in.
    pub async fn run_script(&mut self, code: &str) -> String {
        self.transcript.push_echo(RUNNING_MESSAGE);
        let fragment = self.pipeline.run(code, &mut self.transcript).await.fragment();
        self.transcript.push_fragment(fragment.clone());
        fragment
    }

    /// Wait for the runtime and report the outcome in the transcript.
    pub async fn announce_readiness(&mut self) -> BootstrapState {
        let state = self.pipeline.bootstrapper().ensure_ready().await;
        match &state {
            BootstrapState::Failed(reason) => {
                self.transcript.push_fragment(format!("Error: {reason}"));
            }
            _ => self.transcript.push_fragment(READY_MESSAGE),
        }
        state
    }

    /// Recall the previous history entry into the input line.
    ///
    /// With an empty history the input is left unchanged.
    pub fn recall_previous(&mut self) -> &str {
        if let Some(entry) = self.history.older() {
            self.input = entry.to_string();
        }
        &self.input
    }

    /// Recall the next history entry, or an empty line past the newest.
    pub fn recall_next(&mut self) -> &str {
        self.input = self.history.newer().unwrap_or_default().to_string();
        &self.input
    }

    /// Replace the input line as the user types.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// The input line.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Submit the current input line.
    pub async fn submit_input(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.input);
        self.submit(&line).await
    }

    /// The transcript.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The transcript, mutably (for views attaching plot controls).
    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// The command history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The execution pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &ExecutionPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_builtins() {
        assert_eq!(classify("help"), Some(Command::Help));
        assert_eq!(classify("  MAN  "), Some(Command::Help));
        assert_eq!(classify("clear"), Some(Command::Clear));
        assert_eq!(classify("Cls"), Some(Command::Clear));
        assert_eq!(classify("echo hi there"), Some(Command::Echo("hi there")));
        assert_eq!(classify("ECHO   spaced  out "), Some(Command::Echo("spaced  out")));
        assert_eq!(classify("echo"), Some(Command::Echo("")));
    }

    #[test]
    fn test_classify_code_and_blank() {
        assert_eq!(classify(""), None);
        assert_eq!(classify(" \t\n"), None);
        assert_eq!(classify("2+2"), Some(Command::Code("2+2")));
        assert_eq!(classify("helper()"), Some(Command::Code("helper()")));
        assert_eq!(
            classify("print('echo')"),
            Some(Command::Code("print('echo')"))
        );
    }
}
