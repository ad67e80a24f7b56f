//! Redirection of plotting output into per-submission render targets.
//!
//! Detection is a plain substring match on the plotting library's name. It
//! is an approximation, not a parser: a miss only means the plot is drawn
//! on the runtime's default surface.

use std::borrow::Cow;
use std::sync::{Mutex, PoisonError};

use crate::config::{IconSet, SessionConfig, TARGET_PLACEHOLDER};
use crate::transcript::{RenderTarget, RenderTargetId, ToolbarAction, Transcript};

/// The single "current render target" slot.
///
/// At most one target may hold the slot. A claim while it is held is
/// rejected rather than overwriting the holder.
#[derive(Debug, Default)]
pub struct RenderSlot {
    current: Mutex<Option<RenderTargetId>>,
}

impl RenderSlot {
    /// Claim the slot for `id`.
    ///
    /// # Errors
    ///
    /// Returns the current holder if the slot is taken.
    pub fn claim(&self, id: &RenderTargetId) -> Result<(), RenderTargetId> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match &*current {
            Some(holder) => Err(holder.clone()),
            None => {
                *current = Some(id.clone());
                Ok(())
            }
        }
    }

    /// Release the slot if `id` holds it. Returns whether it did.
    pub fn release(&self, id: &RenderTargetId) -> bool {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref() == Some(id) {
            *current = None;
            true
        } else {
            false
        }
    }

    /// The target currently holding the slot.
    #[must_use]
    pub fn current(&self) -> Option<RenderTargetId> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Holds the render slot for one target and releases it when dropped, so a
/// run that is cancelled mid-evaluation does not leave the slot taken.
#[derive(Debug)]
struct SlotClaim<'a> {
    slot: &'a RenderSlot,
    target: RenderTargetId,
}

impl Drop for SlotClaim<'_> {
    fn drop(&mut self) {
        self.slot.release(&self.target);
    }
}

/// Code ready to run, plus the work to do once it has run.
///
/// Dropping it without calling [`finish`](Self::finish) still releases the
/// render slot; only the toolbar relabel is skipped.
#[derive(Debug)]
#[must_use = "call `finish` after the code has run"]
pub struct PreparedCode<'a> {
    code: Cow<'a, str>,
    cleanup: PlotCleanup<'a>,
}

#[derive(Debug)]
enum PlotCleanup<'a> {
    Noop,
    Relabel {
        icons: &'a IconSet,
        claim: SlotClaim<'a>,
    },
}

impl PreparedCode<'_> {
    /// The code to hand to the runtime.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The render target allocated for this submission, if any.
    #[must_use]
    pub fn target(&self) -> Option<&RenderTargetId> {
        match &self.cleanup {
            PlotCleanup::Noop => None,
            PlotCleanup::Relabel { claim, .. } => Some(&claim.target),
        }
    }

    /// Run the post-execution pass: relabel the target's toolbar and
    /// release the render slot.
    pub fn finish(self, transcript: &mut Transcript) {
        if let PlotCleanup::Relabel { icons, claim } = self.cleanup {
            if let Some(render_target) = transcript.target_mut(&claim.target) {
                relabel(render_target, icons);
            }
            drop(claim);
        }
    }
}

/// Detects plotting submissions and points them at a fresh render target.
#[derive(Debug)]
pub struct PlotAdapter {
    keyword: String,
    prelude: String,
    icons: IconSet,
    slot: RenderSlot,
}

impl PlotAdapter {
    /// Create an adapter from a session configuration.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            keyword: config.plot_keyword.clone(),
            prelude: config.plot_prelude.clone(),
            icons: config.icons.clone(),
            slot: RenderSlot::default(),
        }
    }

    /// Whether `code` looks like it plots.
    #[must_use]
    pub fn detects(&self, code: &str) -> bool {
        code.contains(&self.keyword)
    }

    /// The render slot shared with the runtime.
    #[must_use]
    pub fn slot(&self) -> &RenderSlot {
        &self.slot
    }

    /// Prepare `code` for execution.
    ///
    /// Plotting code gets a new render target attached to `transcript` and
    /// the prelude prepended. Anything else is returned unchanged.
    pub fn prepare<'a>(&'a self, code: &'a str, transcript: &mut Transcript) -> PreparedCode<'a> {
        if !self.detects(code) {
            return PreparedCode {
                code: Cow::Borrowed(code),
                cleanup: PlotCleanup::Noop,
            };
        }

        let id = RenderTargetId::generate();
        if let Err(holder) = self.slot.claim(&id) {
            tracing::warn!(
                holder = %holder,
                "Render slot busy; plot will use the default surface"
            );
            return PreparedCode {
                code: Cow::Borrowed(code),
                cleanup: PlotCleanup::Noop,
            };
        }

        tracing::debug!(target_id = %id, "Redirecting plot output");
        transcript.attach_target(RenderTarget::new(id.clone()));

        let mut rewritten = self.prelude.replace(TARGET_PLACEHOLDER, id.as_str());
        if !rewritten.is_empty() && !rewritten.ends_with('\n') {
            rewritten.push('\n');
        }
        rewritten.push_str(code);

        PreparedCode {
            code: Cow::Owned(rewritten),
            cleanup: PlotCleanup::Relabel {
                icons: &self.icons,
                claim: SlotClaim {
                    slot: &self.slot,
                    target: id,
                },
            },
        }
    }
}

fn relabel(target: &mut RenderTarget, icons: &IconSet) {
    for control in target.controls_mut() {
        let label = match &control.action {
            ToolbarAction::SaveImage => &icons.image,
            ToolbarAction::SaveVector => &icons.vector,
            ToolbarAction::SaveDocument => &icons.document,
            ToolbarAction::Other(_) => continue,
        };
        control.label.clone_from(label);
    }
}
