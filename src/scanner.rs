//! Marker-scanning state machine.
//!
//! The scanner looks at the input as consecutive 2-byte windows. A marker is
//! recognised when it fills a window (`FF D8`, `FF D9`), or, for EOI only,
//! when its `FF` was the last byte of the previous window and its `D9` opens
//! the current one. In that straddled case the whole current window is kept
//! in the frame and its second byte is replayed as the first byte of the next
//! window, so the window grid shifts by one.
//!
//! There is no JPEG byte-stuffing awareness: an `FF` anywhere in the payload
//! is a candidate marker lead byte.
//!
//! Input may arrive in chunks of any size. The only state carried between
//! bytes is the scan state, at most one pending byte, and the open frame.

use std::mem;

use log::debug;

use crate::error::Result;
use crate::protocol::{EOI_CODE, FRAME_CAPACITY_HINT, MARKER_PREFIX, SOI_CODE};

/// Where the scanner is relative to frame boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No SOI seen since the last EOI. Bytes are discarded.
    Outside,
    /// Accumulating a frame. `trailing` is the second byte of the last window.
    Inside { trailing: u8 },
}

/// What was left over when the scan ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanRemainder {
    /// Bytes of a frame that never saw its EOI.
    pub unterminated_frame: usize,
    /// A lone byte that never completed a window.
    pub dangling_byte: bool,
}

impl ScanRemainder {
    pub fn discarded_bytes(&self) -> usize {
        self.unterminated_frame + usize::from(self.dangling_byte)
    }
}

/// Streaming SOI/EOI frame detector
pub struct FrameScanner {
    state: ScanState,
    /// First byte of the next window, if already known
    carry: Option<u8>,
    frame: Vec<u8>,
    capacity_hint: usize,
}

impl FrameScanner {
    pub fn new() -> Self {
        Self::with_capacity(FRAME_CAPACITY_HINT)
    }

    /// Create a scanner whose frame buffers start with `capacity_hint` bytes
    pub fn with_capacity(capacity_hint: usize) -> Self {
        Self {
            state: ScanState::Outside,
            carry: None,
            frame: Vec::with_capacity(capacity_hint),
            capacity_hint,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_inside_frame(&self) -> bool {
        matches!(self.state, ScanState::Inside { .. })
    }

    /// Bytes accumulated for the open frame
    pub fn buffered_len(&self) -> usize {
        self.frame.len()
    }

    /// Feed one byte. Returns the frame it completes, if any.
    pub fn push_byte(&mut self, byte: u8) -> Option<Vec<u8>> {
        match self.carry.take() {
            None => {
                self.carry = Some(byte);
                None
            }
            Some(first) => self.scan_window(first, byte),
        }
    }

    /// Feed a chunk, handing every completed frame to `on_frame`.
    ///
    /// Stops at the first error returned by `on_frame`. The scanner is left
    /// in a consistent state, but the rest of the chunk is not consumed.
    pub fn push<F>(&mut self, chunk: &[u8], mut on_frame: F) -> Result<()>
    where
        F: FnMut(Vec<u8>) -> Result<()>,
    {
        for &byte in chunk {
            if let Some(frame) = self.push_byte(byte) {
                on_frame(frame)?;
            }
        }
        Ok(())
    }

    /// End the scan, discarding any unterminated frame and dangling byte.
    pub fn finish(&mut self) -> ScanRemainder {
        let remainder = ScanRemainder {
            unterminated_frame: self.frame.len(),
            dangling_byte: self.carry.take().is_some(),
        };

        if remainder.unterminated_frame > 0 {
            debug!(
                "Discarding unterminated frame ({} bytes)",
                remainder.unterminated_frame
            );
        }

        self.reset();
        remainder
    }

    fn scan_window(&mut self, b0: u8, b1: u8) -> Option<Vec<u8>> {
        if b0 == MARKER_PREFIX {
            if b1 == SOI_CODE {
                // A repeated SOI keeps the open frame
                self.state = ScanState::Inside { trailing: SOI_CODE };
            } else if b1 == EOI_CODE && self.is_inside_frame() {
                self.frame.extend_from_slice(&[b0, b1]);
                return Some(self.take_frame());
            }
        } else if b0 == EOI_CODE
            && self.state == (ScanState::Inside { trailing: MARKER_PREFIX })
        {
            // EOI straddles the window boundary. b1 is past the marker but
            // still belongs to this frame, and also opens the next window.
            self.frame.extend_from_slice(&[b0, b1]);
            let frame = self.take_frame();
            self.carry = Some(b1);
            return Some(frame);
        }

        if self.is_inside_frame() {
            self.frame.extend_from_slice(&[b0, b1]);
            self.state = ScanState::Inside { trailing: b1 };
        }

        None
    }

    fn take_frame(&mut self) -> Vec<u8> {
        self.state = ScanState::Outside;
        mem::replace(&mut self.frame, Vec::with_capacity(self.capacity_hint))
    }

    fn reset(&mut self) {
        self.state = ScanState::Outside;
        self.carry = None;
        self.frame = Vec::with_capacity(self.capacity_hint);
    }
}

impl Default for FrameScanner {
    fn default() -> Self {
        Self::new()
    }
}
