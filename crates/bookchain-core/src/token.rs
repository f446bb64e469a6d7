//! Session-token derivation.
//!
//! The router hands out an identity and an issue epoch at registration; the
//! session token is a pure function of the two. Note that no server-side
//! secret is involved: anyone who observes a `/register` response can derive
//! the same token. That is a stated trust assumption of the protocol.

use sha2::{Digest, Sha256};

/// Derive the session token for an identity issued at `epoch`.
///
/// `token = hex(sha256("{identity}-{epoch}"))`. Deterministic: the same
/// inputs always produce the same digest.
#[must_use]
pub fn generate(identity: &str, epoch: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    hasher.update(b"-");
    hasher.update(epoch.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = generate("node-1", 1518031177);
        let b = generate("node-1", 1518031177);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn epoch_changes_token() {
        assert_ne!(generate("node-1", 1), generate("node-1", 2));
    }

    #[test]
    fn identity_changes_token() {
        assert_ne!(generate("node-1", 1), generate("node-2", 1));
    }

    #[test]
    fn matches_joined_string_digest() {
        // The incremental update must hash exactly "{identity}-{epoch}".
        let mut hasher = Sha256::new();
        hasher.update(b"abc-42");
        assert_eq!(generate("abc", 42), hex::encode(hasher.finalize()));
    }
}
