//! The poll-dispatch-respond cycle.

use bookchain_client::RouterClient;
use bookchain_core::{link_hash, BookchainError, ChainValidator, QueueMessage, Result};
use tracing::{debug, error, info, warn};

use crate::sink::BlockSink;

/// What one poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// An incoming block passed validation and was appended
    Appended,
    /// An incoming block failed the hash-link check and was dropped
    Rejected,
    /// A chain snapshot was sent to a requesting node
    Responded,
    /// A message type this node does not act on arrived and was dropped
    Ignored,
    /// Nothing was pending on the queue
    Empty,
    /// A router call failed; the cycle ended without effect
    TransportError,
}

/// Cycle counters for diagnostics.
///
/// Rejections and transport faults are silent at the protocol level but must
/// stay observable; these counters plus the log lines are that surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeStats {
    /// Blocks accepted and appended
    pub accepted: u64,
    /// Blocks dropped by the hash-link check
    pub rejected: u64,
    /// Cycles that found the queue empty
    pub empty_polls: u64,
    /// Cycles ended by a dequeue/enqueue transport failure
    pub transport_errors: u64,
}

/// Orchestrates one node: registration, then one dequeue per cycle.
///
/// The cycle is driven by an external fixed-interval scheduler and runs to
/// completion before the next tick fires; cycles never overlap.
pub struct NodeController<S: BlockSink> {
    client: RouterClient,
    sink: S,
    validator: ChainValidator,
    stats: NodeStats,
}

impl<S: BlockSink> NodeController<S> {
    /// Assemble a node from its collaborators
    pub fn new(client: RouterClient, sink: S, validator: ChainValidator) -> Self {
        Self {
            client,
            sink,
            validator,
            stats: NodeStats::default(),
        }
    }

    /// One registration attempt.
    ///
    /// Failure leaves the node unregistered and is logged, not raised; the
    /// core schedules no retry of its own. Subsequent cycles will fail with
    /// `NotRegistered` until the caller registers again.
    pub async fn start(&mut self) {
        if let Err(e) = self.client.register().await {
            error!(error = %e, status = ?e.status_code(), "registration failed");
        }
    }

    /// Whether registration has succeeded
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.client.identity().is_some()
    }

    /// Cycle counters so far
    #[must_use]
    pub const fn stats(&self) -> &NodeStats {
        &self.stats
    }

    /// The current chain, as the sink reports it
    pub async fn chain(&self) -> Result<Vec<bookchain_core::Block>> {
        self.sink.list_all().await
    }

    /// Run one poll cycle: exactly one dequeue attempt, dispatch, return.
    ///
    /// Transport failures are logged and end the cycle with
    /// [`CycleOutcome::TransportError`]; the external scheduler retries
    /// naturally on its next tick. Only sink failures propagate as `Err`,
    /// and even those are local to this cycle.
    pub async fn poll(&mut self) -> Result<CycleOutcome> {
        let message = match self.client.dequeue().await {
            Ok(message) => message,
            Err(e) if e.is_transport() => {
                warn!(error = %e, status = ?e.status_code(), "dequeue failed");
                self.stats.transport_errors += 1;
                return Ok(CycleOutcome::TransportError);
            }
            Err(e) => return Err(e),
        };

        match message {
            Some(QueueMessage::AddBlock { block }) => self.handle_add_block(block).await,
            Some(QueueMessage::RequestBlocks { sender_address }) => {
                self.handle_request_blocks(&sender_address).await
            }
            Some(QueueMessage::RespondBlocks { sender_address, .. }) => {
                // This consume-only node never requests chains, so inbound
                // snapshots are dropped.
                debug!(from = %sender_address, "ignoring unsolicited RESPOND_BLOCKS");
                Ok(CycleOutcome::Ignored)
            }
            None => {
                debug!("nothing to dequeue");
                self.stats.empty_polls += 1;
                Ok(CycleOutcome::Empty)
            }
        }
    }

    async fn handle_add_block(&mut self, block: bookchain_core::Block) -> Result<CycleOutcome> {
        let chain = self.sink.list_all().await?;
        let tail = chain.last();

        if self.validator.accepts(tail, &block) {
            self.sink.append(&block).await?;
            self.stats.accepted += 1;
            info!(
                timestamp = %block.timestamp,
                length = chain.len() + 1,
                "block appended"
            );
            Ok(CycleOutcome::Appended)
        } else {
            self.stats.rejected += 1;
            warn!(
                expected = ?tail.map(link_hash),
                declared = ?block.hash,
                "hash mismatch, block ignored"
            );
            Ok(CycleOutcome::Rejected)
        }
    }

    async fn handle_request_blocks(&mut self, sender_address: &str) -> Result<CycleOutcome> {
        let blocks = self.sink.list_all().await?;
        let identity = self
            .client
            .identity()
            .ok_or(BookchainError::NotRegistered)?
            .to_owned();

        // Full resend every time; the protocol trades bandwidth for
        // simplicity and does no incremental diffing.
        let snapshot = QueueMessage::RespondBlocks {
            sender_address: identity,
            blocks,
        };

        match self.client.enqueue(sender_address, &snapshot).await {
            Ok(()) => {
                info!(to = %sender_address, "sent chain snapshot");
                Ok(CycleOutcome::Responded)
            }
            Err(e) if e.is_transport() => {
                warn!(error = %e, status = ?e.status_code(), to = %sender_address, "enqueue failed");
                self.stats.transport_errors += 1;
                Ok(CycleOutcome::TransportError)
            }
            Err(e) => Err(e),
        }
    }
}
