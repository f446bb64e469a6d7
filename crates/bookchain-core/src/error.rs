use thiserror::Error;

/// Result type alias for bookchain operations
pub type Result<T> = std::result::Result<T, BookchainError>;

/// Errors that can occur while running a bookchain node
#[derive(Error, Debug)]
pub enum BookchainError {
    /// The `/register` call returned a non-success status
    #[error("registration failed with status {status}")]
    Registration {
        /// HTTP status code returned by the router
        status: u16,
    },

    /// The `/dequeue` call failed (404 "nothing pending" is not an error)
    #[error("dequeue failed with status {status}")]
    Dequeue {
        /// HTTP status code returned by the router
        status: u16,
    },

    /// The `/enqueue` call failed
    #[error("enqueue failed with status {status}")]
    Enqueue {
        /// HTTP status code returned by the router
        status: u16,
    },

    /// An authenticated call was attempted before registration succeeded
    #[error("node is not registered with the router")]
    NotRegistered,

    /// HTTP transport failed before a status was available
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The block sink failed to record or list blocks
    #[error("sink error: {0}")]
    Sink(String),

    /// The printer device rejected a primitive (text/image/cut)
    #[error("printer error: {0}")]
    Printer(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl BookchainError {
    /// Returns true for failures of the router transport itself.
    ///
    /// Transport failures end the current poll cycle without effect; the
    /// externally scheduled next cycle retries naturally.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Dequeue { .. } | Self::Enqueue { .. } | Self::Http(_)
        )
    }

    /// Returns the HTTP status code if this error carries one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Registration { status }
            | Self::Dequeue { status }
            | Self::Enqueue { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        assert!(BookchainError::Dequeue { status: 500 }.is_transport());
        assert!(BookchainError::Http("connection reset".into()).is_transport());
        assert!(!BookchainError::Registration { status: 503 }.is_transport());
        assert!(!BookchainError::Sink("disk full".into()).is_transport());
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            BookchainError::Enqueue { status: 403 }.status_code(),
            Some(403)
        );
        assert_eq!(BookchainError::NotRegistered.status_code(), None);
    }
}
