//! Async worker - runs in the Tokio runtime and performs listing calls

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Duration;

use crate::infrastructure::cloudrun::ResourceLister;
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// Run the worker loop until a shutdown command arrives or the TUI side
/// hangs up.
pub async fn run_async_worker(
    lister: Box<dyn ResourceLister>,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) {
    loop {
        let cmd = match cmd_rx.try_recv() {
            Ok(cmd) => cmd,
            Err(TryRecvError::Empty) => {
                tokio::time::sleep(Duration::from_millis(50)).await;
                continue;
            }
            Err(TryRecvError::Disconnected) => return,
        };

        match cmd {
            RuntimeCommand::Shutdown => return,
            RuntimeCommand::Fetch(kind) => {
                tracing::debug!("fetching {}", kind.collection());
                let event = match lister.list(kind).await {
                    Ok(names) => {
                        tracing::info!("fetched {} {}", names.len(), kind.collection());
                        RuntimeEvent::Resources { kind, names }
                    }
                    Err(err) => {
                        tracing::warn!("listing {} failed: {err:#}", kind.collection());
                        RuntimeEvent::FetchFailed {
                            kind,
                            message: err.to_string(),
                        }
                    }
                };
                if evt_tx.send(event).is_err() {
                    return;
                }
            }
        }
    }
}
