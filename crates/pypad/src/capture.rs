//! Ordered capture of program output for one execution.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Fault;
use crate::runtime::{OutputSink, Runtime, StreamKind};

/// Prefix of the line reporting the trailing expression's value.
pub const VALUE_PREFIX: &str = "<-- ";

/// What an execution produced besides its output: a value (possibly absent)
/// or a fault.
pub type ExecutionOutcome = Result<Option<String>, Fault>;

/// One chunk of output as delivered by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    /// The stream the chunk was written to.
    pub kind: StreamKind,
    /// The text of the chunk.
    pub text: String,
}

/// Buffer shared by the stdout and stderr sinks of a single execution.
#[derive(Debug, Default)]
pub struct CaptureBuffer {
    chunks: Mutex<Vec<OutputChunk>>,
}

impl CaptureBuffer {
    fn take(&self) -> Vec<OutputChunk> {
        std::mem::take(&mut *self.chunks.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl OutputSink for CaptureBuffer {
    fn write(&self, kind: StreamKind, chunk: &str) {
        self.chunks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(OutputChunk {
                kind,
                text: chunk.to_string(),
            });
    }
}

/// The transcript fragment produced by one submission.
///
/// Output chunks come first, in the order the runtime delivered them,
/// followed by either a value line or a fault line, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    output: Vec<OutputChunk>,
    value: Option<String>,
    fault: Option<Fault>,
}

impl ExecutionResult {
    /// Assemble a result from captured output and the execution outcome.
    #[must_use]
    pub fn new(output: Vec<OutputChunk>, outcome: ExecutionOutcome) -> Self {
        let (value, fault) = match outcome {
            Ok(value) => (value, None),
            Err(fault) => (None, Some(fault)),
        };
        Self {
            output,
            value,
            fault,
        }
    }

    /// A result carrying only a fault.
    #[must_use]
    pub fn from_fault(fault: Fault) -> Self {
        Self::new(Vec::new(), Err(fault))
    }

    /// The captured output chunks.
    #[must_use]
    pub fn output(&self) -> &[OutputChunk] {
        &self.output
    }

    /// The value of the trailing expression, if there was one.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The fault raised by the submission, if any.
    #[must_use]
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// Whether the submission faulted.
    #[must_use]
    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }

    /// Render the fragment as transcript text, trailing whitespace trimmed.
    #[must_use]
    pub fn fragment(&self) -> String {
        let mut text = String::new();

        for chunk in &self.output {
            text.push_str(&chunk.text);
            if !chunk.text.ends_with('\n') {
                text.push('\n');
            }
        }

        if let Some(value) = &self.value {
            text.push_str(VALUE_PREFIX);
            text.push_str(value);
        } else if let Some(fault) = &self.fault {
            text.push_str(&fault.to_string());
        }

        text.truncate(text.trim_end().len());
        text
    }
}

/// Installs fresh output sinks around one execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputCapture;

impl OutputCapture {
    /// Run `execute` with stdout and stderr captured into one ordered buffer.
    ///
    /// Both sinks share a buffer created for this call only, so nothing
    /// leaks from one execution into the next.
    pub async fn with_capture<F, Fut>(runtime: &dyn Runtime, execute: F) -> ExecutionResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ExecutionOutcome>,
    {
        let buffer = Arc::new(CaptureBuffer::default());
        runtime.install_output_sink(StreamKind::Stdout, buffer.clone());
        runtime.install_output_sink(StreamKind::Stderr, buffer.clone());

        let outcome = execute().await;

        ExecutionResult::new(buffer.take(), outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(kind: StreamKind, text: &str) -> OutputChunk {
        OutputChunk {
            kind,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_fragment_preserves_interleaving() {
        let result = ExecutionResult::new(
            vec![
                chunk(StreamKind::Stdout, "one"),
                chunk(StreamKind::Stderr, "warning: two"),
                chunk(StreamKind::Stdout, "three\n"),
            ],
            Ok(Some("42".into())),
        );

        assert_eq!(result.fragment(), "one\nwarning: two\nthree\n<-- 42");
    }

    #[test]
    fn test_fragment_without_value_is_trimmed() {
        let result = ExecutionResult::new(vec![chunk(StreamKind::Stdout, "hello  \n\n")], Ok(None));
        assert_eq!(result.fragment(), "hello");
    }

    #[test]
    fn test_fault_excludes_value() {
        let result = ExecutionResult::new(
            vec![chunk(StreamKind::Stdout, "before")],
            Err(Fault::Evaluation("NameError: name 'y' is not defined".into())),
        );

        assert!(result.value().is_none());
        assert!(result.is_fault());
        assert_eq!(
            result.fragment(),
            "before\nPythonError: NameError: name 'y' is not defined"
        );
    }

    #[test]
    fn test_empty_value_still_renders_line() {
        let result = ExecutionResult::new(Vec::new(), Ok(Some(String::new())));
        assert_eq!(result.fragment(), "<--");
    }

    #[test]
    fn test_buffer_take_drains() {
        let buffer = CaptureBuffer::default();
        buffer.write(StreamKind::Stdout, "a");
        buffer.write(StreamKind::Stderr, "b");

        assert_eq!(
            buffer.take(),
            vec![chunk(StreamKind::Stdout, "a"), chunk(StreamKind::Stderr, "b")]
        );
        assert!(buffer.take().is_empty());
    }
}
