//! Block storage sinks.
//!
//! A sink owns the node's chain. It exposes exactly two operations: append a
//! freshly accepted block, and list the whole chain in acceptance order. The
//! three implementations are selected at composition time; the controller
//! only ever sees the trait.

mod printer;
mod sqlite;
pub mod wrap;

pub use printer::{PrinterDevice, PrinterSink, RawDevice};
pub use sqlite::SqliteSink;

use async_trait::async_trait;
use bookchain_core::{Block, Result};

/// Storage capability a node delegates its chain to.
#[async_trait(?Send)]
pub trait BlockSink: Send {
    /// Durably record an accepted block at the end of the chain
    async fn append(&mut self, block: &Block) -> Result<()>;

    /// The full chain in acceptance order
    async fn list_all(&self) -> Result<Vec<Block>>;
}

#[async_trait(?Send)]
impl BlockSink for Box<dyn BlockSink> {
    async fn append(&mut self, block: &Block) -> Result<()> {
        (**self).append(block).await
    }

    async fn list_all(&self) -> Result<Vec<Block>> {
        (**self).list_all().await
    }
}

/// In-process sink backed by a per-instance `Vec`.
///
/// Chain lifetime equals process lifetime. Each node instance owns its own
/// vector; sinks are never shared between nodes.
#[derive(Debug, Default)]
pub struct MemorySink {
    blocks: Vec<Block>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Current chain length
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the chain is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[async_trait(?Send)]
impl BlockSink for MemorySink {
    async fn append(&mut self, block: &Block) -> Result<()> {
        self.blocks.push(block.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Block>> {
        Ok(self.blocks.clone())
    }
}
