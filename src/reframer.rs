use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{ReframeError, Result};
use crate::record::{RecordOutcome, RecordWriter};
use crate::scanner::FrameScanner;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Counters for one conversion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub frames_emitted: u64,
    /// Frames too large for a 5-digit header
    pub frames_dropped: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    /// Unterminated frame bytes plus a dangling half window at end of input
    pub discarded_tail_bytes: u64,
}

impl ConversionStats {
    /// Log a summary block
    pub fn log_summary(&self) {
        info!("==========================================");
        info!("Conversion Summary:");
        info!("  Frames written: {}", self.frames_emitted);
        info!("  Oversize frames dropped: {}", self.frames_dropped);
        info!("  Bytes read: {}", self.bytes_read);
        info!("  Bytes written: {}", self.bytes_written);
        if self.discarded_tail_bytes > 0 {
            info!("  Discarded tail: {} bytes", self.discarded_tail_bytes);
        }
        info!("==========================================");
    }
}

/// Rewrites a raw MJPEG stream into length-prefixed records
pub struct Reframer<R: Read, W: Write> {
    source: R,
    writer: RecordWriter<W>,
    scanner: FrameScanner,
}

impl<R: Read, W: Write> Reframer<R, W> {
    pub fn new(source: R, sink: W) -> Self {
        Self::with_scanner(source, sink, FrameScanner::new())
    }

    pub fn with_scanner(source: R, sink: W, scanner: FrameScanner) -> Self {
        Self {
            source,
            writer: RecordWriter::new(sink),
            scanner,
        }
    }

    /// Scan the whole source, writing every complete frame to the sink.
    ///
    /// End of input finishes the run normally. A write failure aborts it and
    /// leaves whatever was already written in the sink.
    pub fn run(&mut self) -> Result<ConversionStats> {
        let mut stats = ConversionStats::default();
        let mut buf = vec![0u8; READ_CHUNK_SIZE];

        loop {
            let n = match self.source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ReframeError::SourceRead(e)),
            };
            stats.bytes_read += n as u64;

            let writer = &mut self.writer;
            self.scanner.push(&buf[..n], |frame| {
                match writer.write_frame(&frame)? {
                    RecordOutcome::Written { len } => {
                        stats.frames_emitted += 1;
                        debug!("frame {} len {}", stats.frames_emitted, len);
                    }
                    RecordOutcome::Dropped { .. } => stats.frames_dropped += 1,
                }
                Ok(())
            })?;
        }

        debug!("End of input after {} bytes", stats.bytes_read);

        let remainder = self.scanner.finish();
        stats.discarded_tail_bytes = remainder.discarded_bytes() as u64;

        self.writer.flush()?;
        stats.bytes_written = self.writer.bytes_written();

        Ok(stats)
    }

    pub fn into_inner(self) -> (R, W) {
        (self.source, self.writer.into_inner())
    }
}

/// Convert the MJPEG file at `input` into a record file at `output`.
///
/// The output is created or truncated. Both files are closed on every
/// return path, including when the output cannot be created.
pub fn convert_file(input: &Path, output: &Path) -> Result<ConversionStats> {
    let source = File::open(input).map_err(|source| ReframeError::SourceOpen {
        path: input.to_path_buf(),
        source,
    })?;

    let sink = File::create(output).map_err(|source| ReframeError::SinkOpen {
        path: output.to_path_buf(),
        source,
    })?;

    info!("Converting {:?} -> {:?}", input, output);

    let mut reframer = Reframer::new(source, BufWriter::new(sink));
    reframer.run()
}
