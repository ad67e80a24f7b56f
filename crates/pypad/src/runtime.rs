//! The capability seam to the embedded interpreter.
//!
//! The engine never looks inside the interpreter. It needs four things from
//! it: a way to load it, a place to send its output, a way to resolve the
//! libraries a submission imports, and a way to evaluate code. Everything
//! else about the runtime is opaque.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Which stream a chunk of program output was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Standard output.
    Stdout,
    /// Diagnostic output.
    Stderr,
}

/// Receives output from the runtime as it is produced.
pub trait OutputSink: Send + Sync {
    /// Append one chunk of output.
    fn write(&self, kind: StreamKind, chunk: &str);
}

/// An initialized interpreter.
///
/// Implementations use interior mutability; the engine only ever holds a
/// shared reference.
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Route output written to `kind` into `sink`, replacing any previous sink.
    fn install_output_sink(&self, kind: StreamKind, sink: Arc<dyn OutputSink>);

    /// Fetch and load the third-party libraries imported by `code`.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure if a library cannot be resolved.
    async fn resolve_imports(&self, code: &str) -> Result<(), String>;

    /// Evaluate `code`.
    ///
    /// Returns the runtime's own string conversion of the trailing
    /// expression's value, or `None` when there is no value.
    ///
    /// # Errors
    ///
    /// Returns the runtime's description of the exception raised by the code.
    async fn evaluate(&self, code: &str) -> Result<Option<String>, String>;
}

/// Brings up a [`Runtime`] from a location.
#[async_trait]
pub trait RuntimeLoader: Send + Sync {
    /// Load and initialize the runtime found at `location`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason if fetching, evaluating or
    /// initializing the runtime fails.
    async fn load(&self, location: &str) -> Result<Arc<dyn Runtime>, String>;
}

/// Turns a fetched runtime artifact into a live [`Runtime`].
#[async_trait]
pub trait RuntimeFactory: Send + Sync {
    /// Instantiate the runtime from the bytes fetched from `location`.
    ///
    /// # Errors
    ///
    /// Returns a reason if the artifact cannot be evaluated or initialized.
    async fn instantiate(
        &self,
        location: &str,
        artifact: Vec<u8>,
    ) -> Result<Arc<dyn Runtime>, String>;
}

/// A [`RuntimeLoader`] that downloads the runtime artifact over HTTP(S)
/// and hands it to a [`RuntimeFactory`].
pub struct FetchLoader<F> {
    client: reqwest::Client,
    factory: F,
    max_bytes: usize,
}

impl<F> fmt::Debug for FetchLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchLoader")
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

impl<F: RuntimeFactory> FetchLoader<F> {
    /// Create a loader with the given fetch limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(factory: F, timeout: Duration, max_bytes: usize) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("failed to create HTTP client: {e}"))?;

        Ok(Self::with_client(factory, client, max_bytes))
    }

    /// Create a loader around an already configured HTTP client.
    #[must_use]
    pub fn with_client(factory: F, client: reqwest::Client, max_bytes: usize) -> Self {
        Self {
            client,
            factory,
            max_bytes,
        }
    }

    /// Create a loader using the limits from a session configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(factory: F, config: &crate::SessionConfig) -> Result<Self, String> {
        Self::new(factory, config.fetch_timeout(), config.max_runtime_bytes)
    }

    async fn fetch(&self, location: &str) -> Result<Vec<u8>, String> {
        let url =
            reqwest::Url::parse(location).map_err(|e| format!("invalid runtime location: {e}"))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "unsupported runtime location scheme: {}",
                url.scheme()
            ));
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                "timed out fetching the runtime".to_string()
            } else {
                format!("failed to fetch the runtime: {e}")
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("failed to fetch the runtime: HTTP {status}"));
        }

        if let Some(content_length) = response.content_length()
            && content_length > self.max_bytes as u64
        {
            return Err(format!(
                "runtime too large: {} bytes (max: {} bytes)",
                content_length, self.max_bytes
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read the runtime: {e}"))?;

        if body.len() > self.max_bytes {
            return Err(format!(
                "runtime too large: {} bytes (max: {} bytes)",
                body.len(),
                self.max_bytes
            ));
        }

        tracing::info!(
            location = %location,
            size = body.len(),
            "Fetched runtime artifact"
        );

        Ok(body.to_vec())
    }
}

#[async_trait]
impl<F: RuntimeFactory> RuntimeLoader for FetchLoader<F> {
    async fn load(&self, location: &str) -> Result<Arc<dyn Runtime>, String> {
        let artifact = self.fetch(location).await?;
        self.factory.instantiate(location, artifact).await
    }
}
