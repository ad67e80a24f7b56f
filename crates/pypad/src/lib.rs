//! # pypad
//!
//! Interpreter session engine for a browser Python pad.
//!
//! The engine sits between an editor, a console pane and an embedded Python
//! runtime that it treats as a black box:
//!
//! - **Lazy bootstrap** - the runtime is fetched and initialized once, on
//!   first use, and every caller shares that one load
//! - **Ordered capture** - stdout and stderr land in one buffer in the order
//!   the runtime delivered them
//! - **Plot redirection** - plotting submissions get their own render target
//!   in the transcript
//! - **Console** - built-ins, history recall, and a queue that processes
//!   submissions strictly in order
//! - **Completion** - case-matched prefix completion of the identifier being
//!   typed
//!
//! Nothing a submission does is raised to the caller: faults become
//! transcript text and the console keeps accepting input.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pypad::{Console, ExecutionPipeline, FetchLoader, SessionConfig};
//!
//! let config = SessionConfig::default();
//! let loader = FetchLoader::from_config(MyFactory, &config)?;
//! let pipeline = ExecutionPipeline::new(&config, Arc::new(loader));
//! let mut console = Console::new(&config, pipeline);
//!
//! console.announce_readiness().await;
//! console.submit("2+2").await; // Some("<-- 4")
//! ```

mod bootstrap;
mod capture;
pub mod completion;
mod config;
pub mod console;
mod editor;
mod error;
mod pipeline;
mod plot;
mod runtime;
mod transcript;

pub use bootstrap::{BootstrapState, Bootstrapper, RuntimeHandle};
pub use capture::{
    CaptureBuffer, ExecutionOutcome, ExecutionResult, OutputCapture, OutputChunk, VALUE_PREFIX,
};
pub use completion::{Category, CompletionEntry, Suggester, Suggestion};
pub use config::{DEFAULT_RUNTIME_LOCATION, IconSet, SessionConfig, TARGET_PLACEHOLDER};
pub use console::{Command, Console, ConsoleHandle, History, classify};
pub use editor::{CodeBuffer, EditorSurface, WELCOME_CODE};
pub use error::{Error, Fault, NOT_LOADED_MESSAGE};
pub use pipeline::ExecutionPipeline;
pub use plot::{PlotAdapter, PreparedCode, RenderSlot};
pub use runtime::{FetchLoader, OutputSink, Runtime, RuntimeFactory, RuntimeLoader, StreamKind};
pub use transcript::{
    RenderTarget, RenderTargetId, ToolbarAction, ToolbarControl, Transcript, TranscriptEntry,
    TranscriptView,
};
