//! Runtime bridge - connects the sync TUI thread with an async Tokio runtime
//!
//! The TUI thread never performs network I/O. It sends commands over a
//! channel and drains events back each loop iteration; the worker thread
//! owns its own Tokio runtime and the ResourceLister.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::infrastructure::cloudrun::{ResourceKind, ResourceLister};
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone, Copy)]
pub enum RuntimeCommand {
    /// Fetch the named collection and replace the current snapshot
    Fetch(ResourceKind),
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A listing completed; names are already shortened for display
    Resources {
        kind: ResourceKind,
        names: Vec<String>,
    },
    /// A listing failed; the tab degrades to an empty (or stale) list
    FetchFailed { kind: ResourceKind, message: String },
}

/// Bridge between the sync TUI thread and the async worker
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime.
    pub fn new(lister: Box<dyn ResourceLister>) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        thread::Builder::new()
            .name("grun-runtime".into())
            .spawn(move || {
                let rt = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(err) => {
                        tracing::error!("failed to create Tokio runtime: {err}");
                        return;
                    }
                };
                rt.block_on(run_async_worker(lister, cmd_rx, evt_tx));
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Wait for a single event with a deadline. Used only for the bounded
    /// startup fetch; the event loop itself never blocks here.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RuntimeEvent> {
        match self.evt_rx.recv_timeout(timeout) {
            Ok(evt) => Some(evt),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
