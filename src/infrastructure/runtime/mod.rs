//! Sync/async bridge between the TUI thread and the listing worker

mod bridge;
mod worker;

pub use bridge::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
