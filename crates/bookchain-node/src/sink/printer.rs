//! Receipt-printer sink.
//!
//! Renders each accepted block as a fixed-footprint ticket through an
//! ESC/POS-style device, then delegates to an owned in-memory sink so the
//! node keeps an in-process view of its chain. Composition, not inheritance:
//! the printer sink *has* a [`MemorySink`].

use async_trait::async_trait;
use bookchain_core::{Block, BookchainError, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::wrap::word_wrap;
use super::{BlockSink, MemorySink};
use crate::config::PrinterConfig;

/// Output primitives of a ticket printer.
///
/// The three operations mirror the ESC/POS surface the node needs: print
/// text, print a pre-rendered image, cut the paper.
pub trait PrinterDevice: Send {
    /// Print UTF-8 text verbatim
    fn text(&mut self, content: &str) -> Result<()>;

    /// Print a pre-rendered image from a file
    fn image(&mut self, path: &Path) -> Result<()>;

    /// Cut the paper
    fn cut(&mut self) -> Result<()>;
}

/// Sink that prints each block as a ticket before recording it in memory.
pub struct PrinterSink<D: PrinterDevice> {
    device: D,
    chars_per_line: usize,
    minimum_text_lines: usize,
    image_paths: Vec<PathBuf>,
    memory: MemorySink,
}

impl<D: PrinterDevice> PrinterSink<D> {
    /// Create a sink printing through `device` with the given layout
    #[must_use]
    pub fn new(device: D, config: &PrinterConfig) -> Self {
        Self {
            device,
            chars_per_line: config.chars_per_line,
            minimum_text_lines: config.minimum_text_lines,
            image_paths: config.image_paths.clone(),
            memory: MemorySink::new(),
        }
    }

    /// Print one block as a ticket: wrapped body, hash, timestamp, trailer
    /// images, cut.
    fn print_block(&mut self, block: &Block) -> Result<()> {
        let ticket = format!(
            "{text}\n\nHASH:\n{hash}\n\nTIMESTAMP:\n{timestamp}\n\n",
            text = word_wrap(&block.text, self.chars_per_line, self.minimum_text_lines),
            hash = block.link_or_sentinel(),
            timestamp = block.timestamp,
        );
        self.device.text(&ticket)?;

        for path in self.image_paths.clone() {
            self.device.image(&path)?;
        }

        self.device.cut()?;
        debug!(timestamp = %block.timestamp, "printed block ticket");
        Ok(())
    }
}

#[async_trait(?Send)]
impl<D: PrinterDevice> BlockSink for PrinterSink<D> {
    async fn append(&mut self, block: &Block) -> Result<()> {
        self.print_block(block)?;
        self.memory.append(block).await
    }

    async fn list_all(&self) -> Result<Vec<Block>> {
        self.memory.list_all().await
    }
}

/// ESC/POS paper cut: GS V 0 (full cut).
const CUT_SEQUENCE: [u8; 3] = [0x1D, 0x56, 0x00];

/// Printer driven by writing raw ESC/POS bytes to a character device.
///
/// Trailer images are expected as pre-rendered ESC/POS raster blobs and are
/// streamed to the device verbatim.
pub struct RawDevice {
    device: File,
    path: PathBuf,
}

impl RawDevice {
    /// Open the printer character device (e.g. `/dev/usb/lp0`)
    pub fn open(path: &Path) -> Result<Self> {
        let device = File::options()
            .write(true)
            .open(path)
            .map_err(|e| printer_err(path, &e))?;
        Ok(Self {
            device,
            path: path.to_owned(),
        })
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.device
            .write_all(bytes)
            .and_then(|()| self.device.flush())
            .map_err(|e| printer_err(&self.path, &e))
    }
}

impl PrinterDevice for RawDevice {
    fn text(&mut self, content: &str) -> Result<()> {
        self.write_all(content.as_bytes())
    }

    fn image(&mut self, path: &Path) -> Result<()> {
        let blob = std::fs::read(path).map_err(|e| printer_err(path, &e))?;
        self.write_all(&blob)
    }

    fn cut(&mut self) -> Result<()> {
        self.write_all(&CUT_SEQUENCE)
    }
}

fn printer_err(path: &Path, e: &std::io::Error) -> BookchainError {
    BookchainError::Printer(format!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every primitive call instead of touching hardware.
    #[derive(Default)]
    struct RecordingDevice {
        calls: Vec<String>,
        fail_on_text: bool,
    }

    impl PrinterDevice for &mut RecordingDevice {
        fn text(&mut self, content: &str) -> Result<()> {
            if self.fail_on_text {
                return Err(BookchainError::Printer("paper jam".into()));
            }
            self.calls.push(format!("text:{content}"));
            Ok(())
        }

        fn image(&mut self, path: &Path) -> Result<()> {
            self.calls.push(format!("image:{}", path.display()));
            Ok(())
        }

        fn cut(&mut self) -> Result<()> {
            self.calls.push("cut".into());
            Ok(())
        }
    }

    fn config() -> PrinterConfig {
        PrinterConfig {
            chars_per_line: 10,
            minimum_text_lines: 3,
            image_paths: vec![PathBuf::from("trailer.bin")],
            ..PrinterConfig::default()
        }
    }

    fn block(text: &str) -> Block {
        Block {
            hash: Some("cafe".into()),
            timestamp: "1518031177".into(),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn prints_ticket_then_records_in_memory() {
        let mut device = RecordingDevice::default();
        {
            let mut sink = PrinterSink::new(&mut device, &config());
            sink.append(&block("hello world")).await.unwrap();
            assert_eq!(sink.list_all().await.unwrap(), vec![block("hello world")]);
        }

        assert_eq!(device.calls.len(), 3);
        assert!(device.calls[0].starts_with("text:"));
        assert_eq!(device.calls[1], "image:trailer.bin");
        assert_eq!(device.calls[2], "cut");

        // Wrapped body, hash and timestamp sections in ticket order.
        let ticket = &device.calls[0];
        assert!(ticket.contains("hello\nworld"));
        assert!(ticket.contains("\n\nHASH:\ncafe\n\n"));
        assert!(ticket.contains("TIMESTAMP:\n1518031177\n\n"));
    }

    #[tokio::test]
    async fn ticket_body_is_padded_to_minimum_lines() {
        let mut device = RecordingDevice::default();
        {
            let mut sink = PrinterSink::new(&mut device, &config());
            sink.append(&block("hi")).await.unwrap();
        }
        let ticket = device.calls[0].strip_prefix("text:").unwrap();
        let body: Vec<&str> = ticket.split("\n\nHASH:").next().unwrap().lines().collect();
        assert_eq!(body, vec!["hi", "", ""]);
    }

    #[tokio::test]
    async fn device_failure_keeps_block_out_of_memory() {
        let mut device = RecordingDevice {
            fail_on_text: true,
            ..RecordingDevice::default()
        };
        {
            let mut sink = PrinterSink::new(&mut device, &config());
            let err = sink.append(&block("lost")).await.unwrap_err();
            assert!(matches!(err, BookchainError::Printer(_)));
            assert!(sink.list_all().await.unwrap().is_empty());
        }
        assert!(device.calls.is_empty());
    }
}
