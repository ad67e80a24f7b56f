//! A queue in front of a [`Console`] for callers that cannot hold `&mut`.
//!
//! The console is moved into a task that drains an mpsc channel, so
//! submissions from any number of handles are processed strictly in the
//! order they were sent. Each caller awaits its own reply.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::Console;
use crate::error::Error;

/// Work sent to the console task.
#[derive(Debug)]
enum Request {
    Submit {
        line: String,
        response_tx: oneshot::Sender<Option<String>>,
    },
    RunScript {
        code: String,
        response_tx: oneshot::Sender<String>,
    },
    Transcript {
        response_tx: oneshot::Sender<String>,
    },
}

/// Cloneable handle to a console running in its own task.
#[derive(Debug, Clone)]
pub struct ConsoleHandle {
    tx: mpsc::Sender<Request>,
}

impl Console {
    /// Move the console into a task and return a handle to it.
    ///
    /// The task ends, returning the console, once every handle is dropped.
    #[must_use]
    pub fn spawn(self, queue_depth: usize) -> (ConsoleHandle, JoinHandle<Self>) {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let task = tokio::spawn(run_console(self, rx));
        (ConsoleHandle { tx }, task)
    }
}

async fn run_console(mut console: Console, mut rx: mpsc::Receiver<Request>) -> Console {
    while let Some(request) = rx.recv().await {
        match request {
            Request::Submit { line, response_tx } => {
                let reply = console.submit(&line).await;
                let _ = response_tx.send(reply);
            }
            Request::RunScript { code, response_tx } => {
                let reply = console.run_script(&code).await;
                let _ = response_tx.send(reply);
            }
            Request::Transcript { response_tx } => {
                let _ = response_tx.send(console.transcript().text());
            }
        }
    }
    tracing::debug!("Console queue closed");
    console
}

impl ConsoleHandle {
    /// Queue a line behind any outstanding submissions and await its reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConsoleClosed`] if the console task has stopped.
    pub async fn submit(&self, line: impl Into<String>) -> Result<Option<String>, Error> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(Request::Submit {
            line: line.into(),
            response_tx,
        })
        .await?;
        response_rx.await.map_err(|_| Error::ConsoleClosed)
    }

    /// Queue a script run and await its fragment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConsoleClosed`] if the console task has stopped.
    pub async fn run_script(&self, code: impl Into<String>) -> Result<String, Error> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(Request::RunScript {
            code: code.into(),
            response_tx,
        })
        .await?;
        response_rx.await.map_err(|_| Error::ConsoleClosed)
    }

    /// The transcript text once every earlier request has been processed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConsoleClosed`] if the console task has stopped.
    pub async fn transcript(&self) -> Result<String, Error> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(Request::Transcript { response_tx }).await?;
        response_rx.await.map_err(|_| Error::ConsoleClosed)
    }

    async fn send(&self, request: Request) -> Result<(), Error> {
        self.tx.send(request).await.map_err(|_| Error::ConsoleClosed)
    }
}
