//! Scripted in-memory runtime shared by the integration tests.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pypad::{
    Console, ExecutionPipeline, OutputSink, Runtime, RuntimeLoader, SessionConfig, StreamKind,
};

/// What the runtime does when it evaluates a given piece of code.
#[derive(Clone, Default)]
pub struct Script {
    pub output: Vec<(StreamKind, String)>,
    pub result: Option<Result<Option<String>, String>>,
    pub delay: Option<Duration>,
}

impl Script {
    pub fn value(value: &str) -> Self {
        Self {
            result: Some(Ok(Some(value.to_string()))),
            ..Self::default()
        }
    }

    pub fn raises(message: &str) -> Self {
        Self {
            result: Some(Err(message.to_string())),
            ..Self::default()
        }
    }

    pub fn print(mut self, kind: StreamKind, text: &str) -> Self {
        self.output.push((kind, text.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A runtime that replays scripted responses.
///
/// Code is matched by suffix, so plotting code still matches after the
/// prelude has been prepended. Unknown code evaluates to no value. Any code
/// containing `import missing_lib` fails import resolution.
#[derive(Default)]
pub struct ScriptedRuntime {
    scripts: Mutex<Vec<(String, Script)>>,
    sinks: Mutex<HashMap<StreamKind, Arc<dyn OutputSink>>>,
    evaluated: Mutex<Vec<String>>,
    resolutions: AtomicU32,
}

impl ScriptedRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, code: &str, script: Script) -> &Self {
        self.scripts.lock().unwrap().push((code.to_string(), script));
        self
    }

    pub fn evaluated(&self) -> Vec<String> {
        self.evaluated.lock().unwrap().clone()
    }

    pub fn resolutions(&self) -> u32 {
        self.resolutions.load(Ordering::SeqCst)
    }

    /// Write to the currently installed sink, as a runtime would between executions.
    pub fn write_stray(&self, kind: StreamKind, text: &str) {
        if let Some(sink) = self.sinks.lock().unwrap().get(&kind).cloned() {
            sink.write(kind, text);
        }
    }

    fn script_for(&self, code: &str) -> Option<Script> {
        self.scripts
            .lock()
            .unwrap()
            .iter()
            .find(|(key, _)| code.ends_with(key.as_str()))
            .map(|(_, script)| script.clone())
    }
}

#[async_trait]
impl Runtime for ScriptedRuntime {
    fn install_output_sink(&self, kind: StreamKind, sink: Arc<dyn OutputSink>) {
        self.sinks.lock().unwrap().insert(kind, sink);
    }

    async fn resolve_imports(&self, code: &str) -> Result<(), String> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        if code.contains("import missing_lib") {
            return Err("No known package with name 'missing_lib'".to_string());
        }
        Ok(())
    }

    async fn evaluate(&self, code: &str) -> Result<Option<String>, String> {
        self.evaluated.lock().unwrap().push(code.to_string());
        let script = self.script_for(code).unwrap_or_default();

        if let Some(delay) = script.delay {
            tokio::time::sleep(delay).await;
        }
        for (kind, text) in &script.output {
            let sink = self.sinks.lock().unwrap().get(kind).cloned();
            if let Some(sink) = sink {
                sink.write(*kind, text);
            }
        }
        script.result.unwrap_or(Ok(None))
    }
}

/// Loader handing out a prepared runtime, or failing.
pub struct TestLoader {
    runtime: Option<Arc<ScriptedRuntime>>,
    delay: Option<Duration>,
    pub loads: AtomicU32,
}

impl TestLoader {
    pub fn ready(runtime: Arc<ScriptedRuntime>) -> Arc<Self> {
        Arc::new(Self {
            runtime: Some(runtime),
            delay: None,
            loads: AtomicU32::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            runtime: None,
            delay: None,
            loads: AtomicU32::new(0),
        })
    }

    /// A loader that takes `delay` before handing out `runtime`.
    pub fn slow(runtime: Arc<ScriptedRuntime>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            runtime: Some(runtime),
            delay: Some(delay),
            loads: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl RuntimeLoader for TestLoader {
    async fn load(&self, location: &str) -> Result<Arc<dyn Runtime>, String> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.runtime {
            Some(runtime) => Ok(runtime.clone()),
            None => Err(format!("Failed to load the Python runtime from {location}")),
        }
    }
}

/// A runtime that knows the arithmetic the tests submit.
pub fn arithmetic_runtime() -> Arc<ScriptedRuntime> {
    let runtime = ScriptedRuntime::new();
    runtime
        .on("1+1", Script::value("2"))
        .on("2+2", Script::value("4"))
        .on(
            "1/0",
            Script::raises("Traceback (most recent call last):\nZeroDivisionError: division by zero"),
        );
    runtime
}

pub fn pipeline(loader: Arc<TestLoader>) -> ExecutionPipeline {
    ExecutionPipeline::new(&SessionConfig::default(), loader)
}

pub fn console(runtime: Arc<ScriptedRuntime>) -> Console {
    let config = SessionConfig::default();
    Console::new(&config, ExecutionPipeline::new(&config, TestLoader::ready(runtime)))
}
