//! Split a reframed record file into individual JPEG files.
//!
//! Usage: cargo run --example split_records -- <records file> [output dir]

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use mjpeg_reframe::protocol::has_jpeg_markers;
use mjpeg_reframe::RecordReader;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input_file = args.next().unwrap_or_else(|| "output.mjpg".to_string());
    let output_dir = args.next().unwrap_or_else(|| "frames".to_string());

    println!("Reading {}...", input_file);

    let file = File::open(&input_file).context(format!("Failed to open {}", input_file))?;
    let reader = RecordReader::new(BufReader::new(file));

    fs::create_dir_all(&output_dir)
        .context(format!("Failed to create output directory: {}", output_dir))?;

    let mut frame_count = 0;
    let mut total_bytes = 0;

    for record in reader {
        let jpeg_data = record.context(format!("Bad record after frame {}", frame_count))?;
        frame_count += 1;
        total_bytes += jpeg_data.len();

        if !has_jpeg_markers(&jpeg_data) {
            println!("Frame {}: not bounded by FF D8 .. FF D9", frame_count);
        }

        let filename = Path::new(&output_dir).join(format!("frame_{:06}.jpg", frame_count));
        let mut out_file = File::create(&filename)?;
        out_file.write_all(&jpeg_data)?;

        println!("Saved {:?} ({} bytes)", filename, jpeg_data.len());
    }

    println!("\nExtracted {} frames ({} bytes) to {}/", frame_count, total_bytes, output_dir);
    println!("View with: eog {}/ or feh {}/", output_dir, output_dir);

    Ok(())
}
