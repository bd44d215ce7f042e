//! End-to-end tests for the MJPEG reframer.

use std::fs;
use std::io::{self, Read};

use mjpeg_reframe::protocol::{EOI, SOI};
use mjpeg_reframe::{convert_file, FrameScanner, RecordReader, Reframer};
use proptest::prelude::*;

fn jpeg_with_len(total: usize) -> Vec<u8> {
    assert!(total >= 4 && total % 2 == 0);
    let mut frame = SOI.to_vec();
    frame.extend((0..total - 4).map(|i| (i % 0xFE) as u8));
    frame.extend_from_slice(&EOI);
    frame
}

fn reframe(input: &[u8]) -> Vec<u8> {
    let mut reframer = Reframer::new(input, Vec::new());
    reframer.run().unwrap();
    reframer.into_inner().1
}

fn parse_records(output: &[u8]) -> Vec<Vec<u8>> {
    RecordReader::new(output)
        .collect::<mjpeg_reframe::Result<_>>()
        .unwrap()
}

/// Reader that ends each read at the next cut offset
struct CutReader {
    data: Vec<u8>,
    pos: usize,
    cuts: Vec<usize>,
}

impl Read for CutReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let end = self
            .cuts
            .iter()
            .copied()
            .find(|&cut| cut > self.pos)
            .unwrap_or(self.data.len())
            .min(self.data.len());
        let n = (end - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[test]
fn test_frame_count_preserved() {
    let frames: Vec<Vec<u8>> = [4, 10, 300, 2048, 77_778]
        .iter()
        .map(|&len| jpeg_with_len(len))
        .collect();
    let input = frames.concat();

    let output = reframe(&input);
    let records = parse_records(&output);

    assert_eq!(records, frames);
    assert_eq!(&output[..5], b"00004");
}

#[test]
fn test_eoi_split_across_reads() {
    let frame = jpeg_with_len(64);
    let mut input = frame.clone();
    input.extend(jpeg_with_len(16));
    let expected = reframe(&input);

    // Cut between FF and D9 of the first frame's EOI
    let reader = CutReader {
        data: input,
        pos: 0,
        cuts: vec![frame.len() - 1],
    };
    let mut reframer = Reframer::new(reader, Vec::new());
    let stats = reframer.run().unwrap();
    let (_, output) = reframer.into_inner();

    assert_eq!(stats.frames_emitted, 2);
    assert_eq!(output, expected);
    assert_eq!(parse_records(&output)[0], frame);
}

#[test]
fn test_eoi_split_across_windows() {
    // FF of the EOI ends a window, D9 starts the next one
    let input = [0xFF, 0xD8, 0x01, 0xFF, 0xD9, 0xFF, 0xD8, 0xFF, 0xD9];
    let records = parse_records(&reframe(&input));

    assert_eq!(records.len(), 2);
    assert_eq!(records[0], vec![0xFF, 0xD8, 0x01, 0xFF, 0xD9, 0xFF]);
    // The replayed FF pairs with the following D8, so the next SOI is seen
    assert_eq!(records[1], vec![0xFF, 0xD8, 0xFF, 0xD9]);
}

#[test]
fn test_oversize_frame_suppressed() {
    let big = jpeg_with_len(100_000);
    let fits = jpeg_with_len(99_998);
    let small = jpeg_with_len(8);

    let mut input = small.clone();
    input.extend_from_slice(&big);
    input.extend_from_slice(&fits);

    let mut reframer = Reframer::new(&input[..], Vec::new());
    let stats = reframer.run().unwrap();
    let (_, output) = reframer.into_inner();

    assert_eq!(stats.frames_emitted, 2);
    assert_eq!(stats.frames_dropped, 1);
    assert_eq!(output.len(), 5 + 8 + 5 + 99_998);
    assert_eq!(&output[13..18], b"99998");
    assert_eq!(parse_records(&output), vec![small, fits]);
}

#[test]
fn test_no_frames_no_output() {
    assert!(reframe(&[]).is_empty());
    assert!(reframe(b"not a jpeg stream at all").is_empty());
    // Unterminated frame
    assert!(reframe(&[0xFF, 0xD8, 0x00, 0x00]).is_empty());
}

#[test]
fn test_convert_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("in.mjpeg");
    let output_path = dir.path().join("out.mjpg");

    let frames = vec![jpeg_with_len(6), jpeg_with_len(1000)];
    let mut input = vec![0x00, 0x00];
    for frame in &frames {
        input.extend_from_slice(frame);
    }
    input.extend_from_slice(&[0x12, 0x34, 0x56]);
    fs::write(&input_path, &input).unwrap();

    // Pre-existing longer content must not survive
    fs::write(&output_path, vec![0xEEu8; 5000]).unwrap();

    let stats = convert_file(&input_path, &output_path).unwrap();
    assert_eq!(stats.frames_emitted, 2);
    assert_eq!(stats.bytes_read, input.len() as u64);

    let output = fs::read(&output_path).unwrap();
    assert_eq!(output.len() as u64, stats.bytes_written);
    assert_eq!(parse_records(&output), frames);
}

#[test]
fn test_convert_file_bad_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("in.mjpeg");
    fs::write(&input_path, jpeg_with_len(6)).unwrap();

    let result = convert_file(&input_path, &dir.path().join("missing").join("out.mjpg"));
    assert!(matches!(
        result,
        Err(mjpeg_reframe::ReframeError::SinkOpen { .. })
    ));
}

fn even_bytes_without_ff(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..0xFF, 0..max).prop_map(|mut v| {
        v.truncate(v.len() & !1);
        v
    })
}

proptest! {
    #[test]
    fn prop_round_trip_clean_frames(
        parts in prop::collection::vec((even_bytes_without_ff(16), even_bytes_without_ff(256)), 0..8)
    ) {
        let mut input = Vec::new();
        let mut frames = Vec::new();
        for (gap, payload) in parts {
            input.extend_from_slice(&gap);
            let mut frame = SOI.to_vec();
            frame.extend_from_slice(&payload);
            frame.extend_from_slice(&EOI);
            input.extend_from_slice(&frame);
            frames.push(frame);
        }

        let records = parse_records(&reframe(&input));
        prop_assert_eq!(records, frames);
    }

    #[test]
    fn prop_records_match_scanner(input in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut scanner = FrameScanner::new();
        let mut frames = Vec::new();
        scanner.push(&input, |frame| {
            frames.push(frame);
            Ok(())
        }).unwrap();

        prop_assert_eq!(parse_records(&reframe(&input)), frames);
    }

    #[test]
    fn prop_read_boundaries_do_not_matter(
        input in prop::collection::vec(prop::sample::select(vec![0x00u8, 0x01, 0xD8, 0xD9, 0xFF]), 0..256),
        mut cuts in prop::collection::vec(0usize..256, 0..16)
    ) {
        cuts.sort_unstable();
        let expected = reframe(&input);

        let reader = CutReader { data: input, pos: 0, cuts };
        let mut reframer = Reframer::new(reader, Vec::new());
        reframer.run().unwrap();
        prop_assert_eq!(reframer.into_inner().1, expected);
    }
}
