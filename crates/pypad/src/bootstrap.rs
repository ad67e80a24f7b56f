//! One-time bring-up of the interpreter runtime.
//!
//! The bootstrap runs at most once per [`Bootstrapper`]. The load is driven
//! by its own task, so a caller that stops waiting (a timeout, a dropped
//! `select!` branch) does not abandon it. Callers that arrive while it is in
//! flight await the same load; callers that arrive after it finished get the
//! memoized outcome.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::watch;

use crate::runtime::{Runtime, RuntimeLoader};

/// Lifecycle of the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapState {
    /// No load has been attempted yet.
    Uninitialized,
    /// The runtime is being fetched and initialized.
    Loading,
    /// The runtime is available.
    Ready,
    /// The load failed; the reason is human readable. Terminal.
    Failed(String),
}

impl BootstrapState {
    /// Whether the runtime can be used.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Whether the load has finished, successfully or not.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed(_))
    }
}

/// The single initialized runtime. Not `Clone`: it is owned by the
/// bootstrapper and lent out by reference.
pub struct RuntimeHandle {
    runtime: Arc<dyn Runtime>,
}

impl RuntimeHandle {
    /// Borrow the runtime.
    #[must_use]
    pub fn runtime(&self) -> &dyn Runtime {
        self.runtime.as_ref()
    }
}

impl fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeHandle").finish_non_exhaustive()
    }
}

/// State shared between the bootstrapper and its load task.
struct Shared {
    location: String,
    loader: Arc<dyn RuntimeLoader>,
    outcome: OnceLock<Result<RuntimeHandle, String>>,
    state: watch::Sender<BootstrapState>,
}

impl Shared {
    /// Store the outcome, then publish the terminal state.
    fn settle(&self, result: Result<Arc<dyn Runtime>, String>) {
        let state = match &result {
            Ok(_) => {
                tracing::info!(location = %self.location, "Python runtime ready");
                BootstrapState::Ready
            }
            Err(reason) => {
                tracing::error!(
                    location = %self.location,
                    reason = %reason,
                    "Python runtime failed to load"
                );
                BootstrapState::Failed(reason.clone())
            }
        };
        let _ = self
            .outcome
            .set(result.map(|runtime| RuntimeHandle { runtime }));
        self.state.send_replace(state);
    }
}

/// Loads the runtime once and remembers the outcome.
pub struct Bootstrapper {
    shared: Arc<Shared>,
    started: AtomicBool,
}

impl fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("location", &self.shared.location)
            .field("state", &*self.shared.state.borrow())
            .finish_non_exhaustive()
    }
}

impl Bootstrapper {
    /// Create a bootstrapper that will load the runtime at `location`.
    ///
    /// Nothing is fetched until [`ensure_ready`](Self::ensure_ready) is called.
    pub fn new(location: impl Into<String>, loader: Arc<dyn RuntimeLoader>) -> Self {
        let (state, _) = watch::channel(BootstrapState::Uninitialized);
        Self {
            shared: Arc::new(Shared {
                location: location.into(),
                loader,
                outcome: OnceLock::new(),
                state,
            }),
            started: AtomicBool::new(false),
        }
    }

    /// The location the runtime is loaded from.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.shared.location
    }

    /// Bring the runtime up if needed and return the resulting state.
    ///
    /// Only the first call starts the load. The returned state is `Ready`
    /// or `Failed`. Dropping the returned future does not cancel the load;
    /// a later call picks up its outcome.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn ensure_ready(&self) -> BootstrapState {
        let mut rx = self.shared.state.subscribe();

        if !self.started.swap(true, Ordering::AcqRel) {
            self.shared.state.send_replace(BootstrapState::Loading);
            tracing::info!(location = %self.shared.location, "Loading Python runtime");
            tokio::spawn(drive_load(self.shared.clone()));
        }

        let settled = rx
            .wait_for(BootstrapState::is_settled)
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    /// The current state, without triggering a load.
    #[must_use]
    pub fn state(&self) -> BootstrapState {
        self.shared.state.borrow().clone()
    }

    /// Watch state transitions (for spinners and other chrome).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BootstrapState> {
        self.shared.state.subscribe()
    }

    /// The runtime, if it finished loading successfully.
    #[must_use]
    pub fn handle(&self) -> Option<&RuntimeHandle> {
        self.shared
            .outcome
            .get()
            .and_then(|outcome| outcome.as_ref().ok())
    }
}

/// Run the loader in its own task so a panic inside it still settles the
/// state.
async fn drive_load(shared: Arc<Shared>) {
    let loader = shared.loader.clone();
    let location = shared.location.clone();

    let joined = tokio::spawn(async move { loader.load(&location).await }).await;
    let result = joined.unwrap_or_else(|e| Err(format!("runtime loader task failed: {e}")));

    shared.settle(result);
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::runtime::{OutputSink, StreamKind};

    struct Inert;

    #[async_trait]
    impl Runtime for Inert {
        fn install_output_sink(&self, _kind: StreamKind, _sink: Arc<dyn OutputSink>) {}

        async fn resolve_imports(&self, _code: &str) -> Result<(), String> {
            Ok(())
        }

        async fn evaluate(&self, _code: &str) -> Result<Option<String>, String> {
            Ok(None)
        }
    }

    struct CountingLoader {
        calls: AtomicU32,
        fail: bool,
    }

    #[async_trait]
    impl RuntimeLoader for CountingLoader {
        async fn load(&self, location: &str) -> Result<Arc<dyn Runtime>, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            if self.fail {
                Err(format!("could not reach {location}"))
            } else {
                Ok(Arc::new(Inert))
            }
        }
    }

    fn loader(fail: bool) -> Arc<CountingLoader> {
        Arc::new(CountingLoader {
            calls: AtomicU32::new(0),
            fail,
        })
    }

    #[tokio::test]
    async fn test_loads_once() {
        let loader = loader(false);
        let bootstrapper = Bootstrapper::new("https://example.test/rt.js", loader.clone());
        assert_eq!(bootstrapper.state(), BootstrapState::Uninitialized);
        assert!(bootstrapper.handle().is_none());

        assert_eq!(bootstrapper.ensure_ready().await, BootstrapState::Ready);
        assert_eq!(bootstrapper.ensure_ready().await, BootstrapState::Ready);

        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert!(bootstrapper.handle().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_in_flight_load() {
        let loader = loader(false);
        let bootstrapper = Bootstrapper::new("https://example.test/rt.js", loader.clone());

        let (a, b, c) = tokio::join!(
            bootstrapper.ensure_ready(),
            bootstrapper.ensure_ready(),
            bootstrapper.ensure_ready()
        );

        assert!(a.is_ready() && b.is_ready() && c.is_ready());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_terminal() {
        let loader = loader(true);
        let bootstrapper = Bootstrapper::new("https://example.test/rt.js", loader.clone());

        let expected =
            BootstrapState::Failed("could not reach https://example.test/rt.js".to_string());
        assert_eq!(bootstrapper.ensure_ready().await, expected);
        assert_eq!(bootstrapper.ensure_ready().await, expected);
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert!(bootstrapper.handle().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_caller_does_not_restart_load() {
        let loader = loader(false);
        let bootstrapper = Bootstrapper::new("https://example.test/rt.js", loader.clone());

        let cancelled =
            tokio::time::timeout(Duration::from_millis(1), bootstrapper.ensure_ready()).await;
        assert!(cancelled.is_err());
        assert_eq!(bootstrapper.state(), BootstrapState::Loading);

        assert_eq!(bootstrapper.ensure_ready().await, BootstrapState::Ready);
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert!(bootstrapper.handle().is_some());
    }

    #[tokio::test]
    async fn test_cancelled_load_still_settles() {
        let bootstrapper = Bootstrapper::new("https://example.test/rt.js", loader(false));
        let mut rx = bootstrapper.subscribe();

        let _ = tokio::time::timeout(Duration::from_millis(1), bootstrapper.ensure_ready()).await;

        rx.wait_for(BootstrapState::is_ready).await.unwrap();
        assert!(bootstrapper.handle().is_some());
    }

    struct PanickingLoader;

    #[async_trait]
    impl RuntimeLoader for PanickingLoader {
        async fn load(&self, _location: &str) -> Result<Arc<dyn Runtime>, String> {
            panic!("loader exploded");
        }
    }

    #[tokio::test]
    async fn test_panicking_loader_fails_the_bootstrap() {
        let bootstrapper =
            Bootstrapper::new("https://example.test/rt.js", Arc::new(PanickingLoader));

        let BootstrapState::Failed(reason) = bootstrapper.ensure_ready().await else {
            panic!("expected the bootstrap to fail");
        };
        assert!(reason.starts_with("runtime loader task failed"), "{reason}");
        assert!(bootstrapper.handle().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_final_state() {
        let bootstrapper = Bootstrapper::new("https://example.test/rt.js", loader(false));
        let mut rx = bootstrapper.subscribe();

        bootstrapper.ensure_ready().await;

        rx.wait_for(BootstrapState::is_ready).await.unwrap();
    }
}
