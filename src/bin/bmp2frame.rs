// src/bin/bmp2frame.rs

//! Converts a 1bpp BMP into a framed payload ready to send to the display.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use env_logger::{Builder, Env};
use epd_frame_encoder::{BmpImage, FrameParams, HeaderSize, assemble_frame, frame_hash};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input BMP file (1bpp, uncompressed)
    input: PathBuf,

    /// Output file for the framed payload
    output: PathBuf,

    /// Header size in bytes (30 or 32)
    #[arg(long, default_value_t = 32)]
    header_size: usize,

    /// Compression type tag written into the header
    #[arg(long, default_value_t = epd_frame_encoder::DEFAULT_COMPRESSION_TYPE)]
    compression_type: u8,

    /// Mark the frame as two-color content
    #[arg(long)]
    two_color: bool,

    /// Checksum byte source for header offset 22
    #[arg(long, default_value_t = 0)]
    checksum: u16,

    /// Upper bound for the whole frame in bytes
    #[arg(long, default_value_t = epd_frame_encoder::DEFAULT_MAX_FRAME_BYTES)]
    max_frame_bytes: usize,
}

fn main() -> Result<()> {
    Builder::from_env(Env::new().default_filter_or("info")).init();

    let args = Args::parse();
    let header_size = HeaderSize::from_bytes(args.header_size)
        .ok_or_else(|| anyhow!("unsupported header size {}", args.header_size))?;

    let image = BmpImage::open(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let geometry = image.geometry();
    info!(
        "{}: {}x{} pixels, stride {}, {}",
        args.input.display(),
        geometry.width,
        geometry.height,
        geometry.stride,
        if geometry.top_down { "top-down" } else { "bottom-up" }
    );

    let params = FrameParams::default()
        .with_header_size(header_size)
        .with_compression_type(args.compression_type)
        .with_two_color(args.two_color)
        .with_checksum(args.checksum)
        .with_max_frame_bytes(args.max_frame_bytes);
    let frame = assemble_frame(image.pixels(), geometry, &params)?;

    info!("Compressed size: {}", frame.report.bytes_written);
    info!("Total size: {}", frame.bytes.len());
    info!("Frame hash: {}", frame_hash(&frame.bytes));

    std::fs::write(&args.output, &frame.bytes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}
