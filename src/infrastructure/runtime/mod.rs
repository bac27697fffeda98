//! Runtime infrastructure - Tokio worker bridged to the TUI thread

mod bridge;
mod worker;

pub use bridge::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
pub use worker::{run_async_worker, WorkerSettings};
