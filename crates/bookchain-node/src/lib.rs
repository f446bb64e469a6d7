//! Storage sinks and the polling controller for a bookchain node.
//!
//! A node delegates block persistence to a [`BlockSink`] (in-memory, SQLite
//! or receipt printer) and runs one [`NodeController::poll`] cycle per
//! scheduler tick: dequeue one message from the router, dispatch by type,
//! respond. Cycles never overlap; the outer scheduler waits for completion.

pub mod config;
mod controller;
pub mod sink;

pub use config::{DatabaseConfig, NodeConfig, PrinterConfig};
pub use controller::{CycleOutcome, NodeController, NodeStats};
pub use sink::{BlockSink, MemorySink, PrinterSink, SqliteSink};
