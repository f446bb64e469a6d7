//! Wire types shared between the router protocol and the storage sinks.

use serde::{Deserialize, Serialize};

/// A single entry in the chain.
///
/// `hash` is the backward link: the link hash of the *previous* block in the
/// chain, not a hash of this block. The first block in a chain carries no
/// link (serialized as JSON `null`), for which the validator substitutes the
/// literal sentinel `"null"` when hashing. Blocks are immutable once
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Link hash of the previous block, absent for the genesis position
    #[serde(default)]
    pub hash: Option<String>,

    /// Router-assigned creation timestamp, treated as an opaque string
    pub timestamp: String,

    /// Free-form block body
    pub text: String,
}

impl Block {
    /// The previous-link field as hashed input, with the genesis sentinel
    /// substituted for an absent or empty link.
    #[must_use]
    pub fn link_or_sentinel(&self) -> &str {
        match self.hash.as_deref() {
            Some(h) if !h.is_empty() => h,
            _ => "null",
        }
    }
}

/// A message exchanged through the queue router, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QueueMessage {
    /// A new block for this node to validate and append
    #[serde(rename = "ADD_BLOCK")]
    AddBlock {
        /// The candidate block
        block: Block,
    },

    /// Another node asks for this node's full chain
    #[serde(rename = "REQUEST_BLOCKS")]
    RequestBlocks {
        /// Queue address to send the response to
        sender_address: String,
    },

    /// Full chain snapshot answering a `REQUEST_BLOCKS`
    #[serde(rename = "RESPOND_BLOCKS")]
    RespondBlocks {
        /// Identity of the responding node
        sender_address: String,
        /// The chain in acceptance order
        blocks: Vec<Block>,
    },
}

/// Successful `/register` response body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    /// Router-issued identity, stable for the process lifetime
    pub identity: String,
    /// Issue time used as token-derivation input
    pub epoch: u64,
}

/// Credentials attached to every authenticated router call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthPayload {
    /// Router-issued identity
    pub identity: String,
    /// Derived session token (see [`crate::token::generate`])
    pub token: String,
}
