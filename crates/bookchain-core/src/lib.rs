//! Core types and protocol logic for bookchain nodes.
//!
//! This crate provides the pieces of the node that are independent of any
//! transport or storage backend:
//!
//! - **Types**: the [`Block`] record and the [`QueueMessage`] wire protocol
//! - **Token**: deterministic session-token derivation from an identity
//! - **Chain**: the hash-link continuity check for incoming blocks
//! - **Errors**: the crate-wide [`BookchainError`] taxonomy
//!
//! # Example
//!
//! ```rust
//! use bookchain_core::{Block, ChainValidator};
//!
//! let validator = ChainValidator::new(true);
//! let genesis = Block {
//!     hash: None,
//!     timestamp: "1518031177".into(),
//!     text: "first entry".into(),
//! };
//! // An empty chain accepts anything.
//! assert!(validator.accepts(None, &genesis));
//! ```

mod chain;
mod error;
pub mod token;
mod types;

pub use chain::{link_hash, ChainValidator};
pub use error::{BookchainError, Result};
pub use types::{AuthPayload, Block, QueueMessage, RegisterResponse};
