//! Node configuration.
//!
//! Every value here is passed explicitly into the component that needs it;
//! nothing reads global state at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one bookchain node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Base URL of the queue router (e.g. `http://localhost:8000`).
    pub router_url: String,

    /// Seconds between poll cycles.
    #[serde(default = "default_dequeue_interval")]
    pub dequeue_interval_secs: u64,

    /// Verify the hash link of incoming blocks before appending.
    ///
    /// Disabling this turns the node into a consume-only participant that
    /// appends every well-formed block. Off is an explicit choice.
    #[serde(default = "default_true")]
    pub validate_hashes: bool,

    /// Per-request timeout for router calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Settings for the SQLite sink.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Settings for the receipt-printer sink.
    #[serde(default)]
    pub printer: PrinterConfig,
}

/// Settings for the SQLite-backed sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

/// Settings for the receipt-printer sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Character device the printer is attached to.
    #[serde(default = "default_device_path")]
    pub device_path: PathBuf,

    /// Printable characters per ticket line.
    #[serde(default = "default_chars_per_line")]
    pub chars_per_line: usize,

    /// Minimum body lines per ticket, padded with blanks.
    ///
    /// Keeps every ticket at the same vertical footprint regardless of how
    /// short the block text is.
    #[serde(default = "default_minimum_text_lines")]
    pub minimum_text_lines: usize,

    /// Pre-rendered trailer images appended after each ticket.
    #[serde(default)]
    pub image_paths: Vec<PathBuf>,
}

impl NodeConfig {
    /// A config with defaults for everything but the router URL
    #[must_use]
    pub fn with_router_url(router_url: impl Into<String>) -> Self {
        Self {
            router_url: router_url.into(),
            dequeue_interval_secs: default_dequeue_interval(),
            validate_hashes: default_true(),
            request_timeout_secs: default_request_timeout(),
            database: DatabaseConfig::default(),
            printer: PrinterConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            device_path: default_device_path(),
            chars_per_line: default_chars_per_line(),
            minimum_text_lines: default_minimum_text_lines(),
            image_paths: Vec::new(),
        }
    }
}

const fn default_dequeue_interval() -> u64 {
    5
}

const fn default_true() -> bool {
    true
}

const fn default_request_timeout() -> u64 {
    3
}

fn default_db_path() -> PathBuf {
    PathBuf::from("bookchain.db")
}

fn default_device_path() -> PathBuf {
    PathBuf::from("/dev/usb/lp0")
}

const fn default_chars_per_line() -> usize {
    42
}

const fn default_minimum_text_lines() -> usize {
    27
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: NodeConfig =
            toml::from_str(r#"router_url = "http://localhost:8000""#).unwrap();
        assert_eq!(config.dequeue_interval_secs, 5);
        assert!(config.validate_hashes);
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.printer.chars_per_line, 42);
        assert_eq!(config.printer.minimum_text_lines, 27);
        assert!(config.printer.image_paths.is_empty());
        assert_eq!(config.database.path, PathBuf::from("bookchain.db"));
    }

    #[test]
    fn validation_can_be_disabled_explicitly() {
        let config: NodeConfig = toml::from_str(
            r#"
            router_url = "http://router:80"
            validate_hashes = false
            dequeue_interval_secs = 1

            [printer]
            device_path = "/dev/usb/lp1"
            image_paths = ["trailer.bin"]
            "#,
        )
        .unwrap();
        assert!(!config.validate_hashes);
        assert_eq!(config.dequeue_interval_secs, 1);
        assert_eq!(config.printer.device_path, PathBuf::from("/dev/usb/lp1"));
        assert_eq!(config.printer.image_paths, vec![PathBuf::from("trailer.bin")]);
    }
}
