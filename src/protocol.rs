use crate::error::{ReframeError, Result};

/// JPEG marker bytes
pub const MARKER_PREFIX: u8 = 0xFF;
pub const SOI_CODE: u8 = 0xD8; // Start of Image
pub const EOI_CODE: u8 = 0xD9; // End of Image

pub const SOI: [u8; 2] = [MARKER_PREFIX, SOI_CODE];
pub const EOI: [u8; 2] = [MARKER_PREFIX, EOI_CODE];

/// Width of the decimal ASCII length header in front of every record
pub const LENGTH_HEADER_SIZE: usize = 5;

/// Largest frame a 5-digit header can describe.
///
/// Frames above this are dropped instead of widening the header. Whether
/// the cap was a deliberate limit or a leftover of an abandoned binary
/// header is unknown; it is kept as-is so readers can rely on fixed-width
/// records.
pub const MAX_FRAME_SIZE: usize = 99_999;

/// Capacity hint for a fresh frame buffer
pub const FRAME_CAPACITY_HINT: usize = 80_000;

/// Encode a frame length as a zero-padded 5-digit ASCII header.
///
/// Returns `None` when the length needs more than 5 digits.
pub fn encode_length_header(len: usize) -> Option<[u8; LENGTH_HEADER_SIZE]> {
    if len > MAX_FRAME_SIZE {
        return None;
    }

    let digits = format!("{:0width$}", len, width = LENGTH_HEADER_SIZE);
    let mut header = [b'0'; LENGTH_HEADER_SIZE];
    header.copy_from_slice(digits.as_bytes());
    Some(header)
}

/// Parse a 5-digit ASCII length header
pub fn parse_length_header(header: &[u8; LENGTH_HEADER_SIZE]) -> Result<usize> {
    if !header.iter().all(u8::is_ascii_digit) {
        return Err(ReframeError::InvalidHeader(*header));
    }

    Ok(header
        .iter()
        .fold(0usize, |acc, &digit| acc * 10 + (digit - b'0') as usize))
}

/// Check that a frame starts with SOI and ends with EOI
pub fn has_jpeg_markers(frame: &[u8]) -> bool {
    frame.len() >= 4 && frame.starts_with(&SOI) && frame.ends_with(&EOI)
}
