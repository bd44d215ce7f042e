//! Length-prefixed record stream.
//!
//! Each record is a 5-digit ASCII length followed by that many frame bytes.
//! There is no stream header, count, checksum or trailer.

use std::io::{self, Read, Write};

use log::{debug, warn};

use crate::error::{ReframeError, Result};
use crate::protocol::{encode_length_header, parse_length_header, LENGTH_HEADER_SIZE};

/// Result of handing a frame to [`RecordWriter::write_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Header and body were written
    Written { len: usize },
    /// Frame did not fit a 5-digit header and was skipped
    Dropped { len: usize },
}

/// Writes frames as length-prefixed records
pub struct RecordWriter<W: Write> {
    sink: W,
    records_written: u64,
    records_dropped: u64,
    bytes_written: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            records_written: 0,
            records_dropped: 0,
            bytes_written: 0,
        }
    }

    /// Write one frame as header + body.
    ///
    /// Oversize frames produce no output at all. If the body write fails the
    /// header stays in the sink.
    pub fn write_frame(&mut self, frame: &[u8]) -> Result<RecordOutcome> {
        let len = frame.len();

        let header = match encode_length_header(len) {
            Some(header) => header,
            None => {
                warn!("Dropping oversize frame ({} bytes)", len);
                self.records_dropped += 1;
                return Ok(RecordOutcome::Dropped { len });
            }
        };

        self.sink
            .write_all(&header)
            .map_err(ReframeError::SinkWrite)?;
        self.bytes_written += LENGTH_HEADER_SIZE as u64;

        self.sink.write_all(frame).map_err(ReframeError::SinkWrite)?;
        self.bytes_written += len as u64;
        self.records_written += 1;

        debug!(
            "Record #{}: {} bytes (total written: {})",
            self.records_written, len, self.bytes_written
        );

        Ok(RecordOutcome::Written { len })
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush().map_err(ReframeError::SinkWrite)
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn records_dropped(&self) -> u64 {
        self.records_dropped
    }

    /// Header and body bytes written so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Reads records back from a length-prefixed stream.
///
/// Iteration ends cleanly at end of stream on a record boundary.
pub struct RecordReader<R: Read> {
    source: R,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            done: false,
        }
    }

    /// Read the next record body. `Ok(None)` at end of stream.
    pub fn read_record(&mut self) -> Result<Option<Vec<u8>>> {
        let mut header = [0u8; LENGTH_HEADER_SIZE];
        let got = self.fill(&mut header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < LENGTH_HEADER_SIZE {
            return Err(ReframeError::TruncatedRecord {
                expected: LENGTH_HEADER_SIZE,
                actual: got,
            });
        }

        let len = parse_length_header(&header)?;
        let mut body = vec![0u8; len];
        let got = self.fill(&mut body)?;
        if got < len {
            return Err(ReframeError::TruncatedRecord {
                expected: len,
                actual: got,
            });
        }

        Ok(Some(body))
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Read until `buf` is full or the source ends. Returns bytes read.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut total = 0;
        while total < buf.len() {
            match self.source.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ReframeError::SourceRead(e)),
            }
        }
        Ok(total)
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
