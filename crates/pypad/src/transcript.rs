//! The append-only record of everything shown in the console pane.

use std::fmt;

/// Identifier of a render target, unique per plotting submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderTargetId(String);

impl RenderTargetId {
    /// Allocate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("plot-{}", uuid::Uuid::new_v4().simple()))
    }

    /// The identifier as it appears in the rewritten code and the view.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderTargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A save action a plotting library can attach to a render target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Save as raster image.
    SaveImage,
    /// Save as vector graphic.
    SaveVector,
    /// Save as document.
    SaveDocument,
    /// Any other control; left as the library labelled it.
    Other(String),
}

/// A toolbar control attached to a render target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarControl {
    /// What the control does.
    pub action: ToolbarAction,
    /// The label currently shown.
    pub label: String,
}

/// A surface that receives the graphical output of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    id: RenderTargetId,
    controls: Vec<ToolbarControl>,
}

impl RenderTarget {
    /// Create an empty render target.
    #[must_use]
    pub fn new(id: RenderTargetId) -> Self {
        Self {
            id,
            controls: Vec::new(),
        }
    }

    /// The target's identifier.
    #[must_use]
    pub fn id(&self) -> &RenderTargetId {
        &self.id
    }

    /// Controls attached by the plotting library.
    #[must_use]
    pub fn controls(&self) -> &[ToolbarControl] {
        &self.controls
    }

    /// Record a control the plotting library attached.
    pub fn attach_control(&mut self, action: ToolbarAction, label: impl Into<String>) {
        self.controls.push(ToolbarControl {
            action,
            label: label.into(),
        });
    }

    pub(crate) fn controls_mut(&mut self) -> &mut [ToolbarControl] {
        &mut self.controls
    }
}

/// One entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// What the user submitted, as echoed back.
    Echo(String),
    /// Output of a command or an execution.
    Fragment(String),
    /// A surface plots are drawn into.
    Target(RenderTarget),
}

/// Receives transcript changes for display.
pub trait TranscriptView: Send {
    /// Show a new block of text and scroll it into view.
    fn append_fragment(&mut self, text: &str);

    /// Insert a render target into the visual region.
    fn attach_target(&mut self, _target: &RenderTarget) {}

    /// Remove everything, render targets included.
    fn clear(&mut self);
}

/// The ordered record of the console pane.
#[derive(Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    view: Option<Box<dyn TranscriptView>>,
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("entries", &self.entries)
            .field("has_view", &self.view.is_some())
            .finish()
    }
}

impl Transcript {
    /// Create an empty transcript with no view attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty transcript that mirrors its changes into `view`.
    #[must_use]
    pub fn with_view(view: impl TranscriptView + 'static) -> Self {
        Self {
            entries: Vec::new(),
            view: Some(Box::new(view)),
        }
    }

    /// Append the echo of a submitted command.
    pub fn push_echo(&mut self, line: impl Into<String>) {
        let line = line.into();
        if let Some(view) = &mut self.view {
            view.append_fragment(&line);
        }
        self.entries.push(TranscriptEntry::Echo(line));
    }

    /// Append a block of output.
    pub fn push_fragment(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let Some(view) = &mut self.view {
            view.append_fragment(&text);
        }
        self.entries.push(TranscriptEntry::Fragment(text));
    }

    /// Attach a render target.
    pub fn attach_target(&mut self, target: RenderTarget) {
        if let Some(view) = &mut self.view {
            view.attach_target(&target);
        }
        self.entries.push(TranscriptEntry::Target(target));
    }

    /// Find an attached render target.
    pub fn target_mut(&mut self, id: &RenderTargetId) -> Option<&mut RenderTarget> {
        self.entries.iter_mut().find_map(|entry| match entry {
            TranscriptEntry::Target(target) if target.id() == id => Some(target),
            _ => None,
        })
    }

    /// Render targets currently attached, oldest first.
    pub fn targets(&self) -> impl Iterator<Item = &RenderTarget> {
        self.entries.iter().filter_map(|entry| match entry {
            TranscriptEntry::Target(target) => Some(target),
            _ => None,
        })
    }

    /// Remove every entry and every render target. Returns how many render
    /// targets were destroyed.
    pub fn clear(&mut self) -> usize {
        let destroyed = self.targets().count();
        self.entries.clear();
        if let Some(view) = &mut self.view {
            view.clear();
        }
        destroyed
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The textual entries joined by newlines, as the pane shows them.
    #[must_use]
    pub fn text(&self) -> String {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                TranscriptEntry::Echo(text) | TranscriptEntry::Fragment(text) => {
                    Some(text.as_str())
                }
                TranscriptEntry::Target(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
