//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI never awaits anything. It sends [`RuntimeCommand`]s and renders the
//! [`Session`] snapshots that come back as [`RuntimeEvent`]s.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tokio::runtime::Runtime;

use crate::core::Session;
use crate::domain::FormValues;
use crate::infrastructure::runtime::worker::{run_async_worker, WorkerSettings};

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Ask the wallet for accounts
    Connect,
    /// Render the fields of an operation; empty name clears the form
    SelectOperation { name: String },
    /// Submit the current form
    Submit { name: String, values: FormValues },
    /// Wallet-side: make the next account primary
    CycleAccount,
    /// Wallet-side: revoke authorization
    Disconnect,
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The session changed
    SessionUpdated(Session),
    /// Error outside any session handler
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime
    pub fn new(settings: WorkerSettings) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        thread::Builder::new()
            .name("panarchy-worker".into())
            .spawn(move || {
                let rt = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(err) => {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Failed to create Tokio runtime: {}", err),
                        });
                        return;
                    }
                };
                rt.block_on(async {
                    if let Err(err) = run_async_worker(settings, cmd_rx, evt_tx.clone()).await {
                        tracing::error!("worker exited: {:#}", err);
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
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
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        // Try to send shutdown command
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
