//! # mjpeg-reframe
//!
//! Rewrites a raw MJPEG stream (back-to-back JPEG frames delimited by SOI
//! `FF D8` and EOI `FF D9` markers) into length-prefixed records:
//!
//! ```text
//! [5 ASCII digits: frame length][frame bytes, SOI .. EOI]
//! [5 ASCII digits: frame length][frame bytes, SOI .. EOI]
//! ...
//! ```
//!
//! Readers of the output can split frames without scanning for markers.
//! Frames longer than 99999 bytes do not fit the header and are dropped.
//!
//! ## Example
//!
//! ```
//! use mjpeg_reframe::Reframer;
//!
//! let input = [0xFF, 0xD8, 0x01, 0x02, 0xFF, 0xD9];
//! let mut reframer = Reframer::new(&input[..], Vec::new());
//! let stats = reframer.run().unwrap();
//! assert_eq!(stats.frames_emitted, 1);
//!
//! let (_, output) = reframer.into_inner();
//! assert_eq!(&output[..5], b"00006");
//! ```

pub mod error;
pub mod protocol;
pub mod record;
pub mod reframer;
pub mod scanner;

pub use error::{ReframeError, Result};
pub use record::{RecordOutcome, RecordReader, RecordWriter};
pub use reframer::{convert_file, ConversionStats, Reframer};
pub use scanner::{FrameScanner, ScanRemainder, ScanState};
