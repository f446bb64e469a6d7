//! Hash-link continuity checking.
//!
//! Each accepted block carries the link hash of its predecessor. A node does
//! not trust the router's ordering: it re-derives the link hash of its own
//! tail and only accepts an incoming block whose declared backward link
//! matches.

use sha2::{Digest, Sha256};

use crate::types::Block;

/// Compute the link hash of `block`.
///
/// `hex(sha256(prev + text + timestamp))`, where `prev` is the block's own
/// backward-link field or the `"null"` sentinel when that field is absent or
/// empty. This is the value the *next* block in the chain must carry in its
/// `hash` field.
#[must_use]
pub fn link_hash(block: &Block) -> String {
    let mut hasher = Sha256::new();
    hasher.update(block.link_or_sentinel().as_bytes());
    hasher.update(block.text.as_bytes());
    hasher.update(block.timestamp.as_bytes());
    hex::encode(hasher.finalize())
}

/// Decides whether incoming blocks extend the local chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainValidator {
    validate_hashes: bool,
}

impl ChainValidator {
    /// Create a validator.
    ///
    /// `validate_hashes = false` turns the node into a consume-only
    /// participant that accepts every well-formed block. That mode must be
    /// chosen explicitly in configuration.
    #[must_use]
    pub const fn new(validate_hashes: bool) -> Self {
        Self { validate_hashes }
    }

    /// Whether hash validation is enabled
    #[must_use]
    pub const fn validates(&self) -> bool {
        self.validate_hashes
    }

    /// Should `incoming` be appended after `tail`?
    ///
    /// With validation enabled: an empty chain accepts anything; otherwise
    /// the incoming block's backward link must equal the link hash this node
    /// computes for its current tail. With validation disabled: always true.
    #[must_use]
    pub fn accepts(&self, tail: Option<&Block>, incoming: &Block) -> bool {
        if !self.validate_hashes {
            return true;
        }
        match tail {
            None => true,
            Some(tail) => incoming.hash.as_deref() == Some(link_hash(tail).as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(hash: Option<&str>, timestamp: &str, text: &str) -> Block {
        Block {
            hash: hash.map(str::to_owned),
            timestamp: timestamp.into(),
            text: text.into(),
        }
    }

    #[test]
    fn empty_chain_accepts_anything() {
        let validator = ChainValidator::new(true);
        assert!(validator.accepts(None, &block(None, "1", "genesis")));
        assert!(validator.accepts(None, &block(Some("garbage"), "1", "genesis")));
    }

    #[test]
    fn matching_link_is_accepted() {
        let validator = ChainValidator::new(true);
        let tail = block(None, "100", "first");
        let next = block(Some(&link_hash(&tail)), "101", "second");
        assert!(validator.accepts(Some(&tail), &next));
    }

    #[test]
    fn mismatching_link_is_rejected() {
        let validator = ChainValidator::new(true);
        let tail = block(None, "100", "first");
        let next = block(Some("0000"), "101", "second");
        assert!(!validator.accepts(Some(&tail), &next));
    }

    #[test]
    fn missing_link_is_rejected_on_nonempty_chain() {
        let validator = ChainValidator::new(true);
        let tail = block(None, "100", "first");
        assert!(!validator.accepts(Some(&tail), &block(None, "101", "second")));
    }

    #[test]
    fn disabled_validation_accepts_everything() {
        let validator = ChainValidator::new(false);
        let tail = block(None, "100", "first");
        assert!(validator.accepts(Some(&tail), &block(Some("bogus"), "101", "x")));
        assert!(validator.accepts(Some(&tail), &block(None, "101", "x")));
    }

    #[test]
    fn genesis_sentinel_feeds_the_hash() {
        // Absent and empty links must hash identically, via the "null"
        // sentinel.
        let absent = block(None, "5", "t");
        let empty = block(Some(""), "5", "t");
        assert_eq!(link_hash(&absent), link_hash(&empty));

        let mut hasher = Sha256::new();
        hasher.update(b"nullt5");
        assert_eq!(link_hash(&absent), hex::encode(hasher.finalize()));
    }

    #[test]
    fn link_hash_is_order_sensitive() {
        // prev + text + timestamp, not any other concatenation order.
        let a = block(Some("aa"), "12", "xy");
        let b = block(Some("aa"), "xy", "12");
        assert_ne!(link_hash(&a), link_hash(&b));
    }
}
