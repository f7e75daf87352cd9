//! # EPD Frame Encoder
//!
//! Compresses 1-bit-per-pixel rasters with a two-pass context-adaptive
//! binary coder and wraps the result in the header and trailer expected by
//! the display controller.
//!
//! This library is organized into several modules:
//! - `utils`: error type and MSB-first bit access
//! - `image`: raster geometry, the scanline context window and BMP input
//! - `encode`: context model, adaptive bit emitter and the encode entry point
//! - `frame`: device header/trailer and whole-frame assembly
//!
//! ```no_run
//! use epd_frame_encoder::{BmpImage, FrameParams, assemble_frame};
//!
//! let image = BmpImage::open("label.bmp")?;
//! let frame = assemble_frame(image.pixels(), image.geometry(), &FrameParams::default())?;
//! std::fs::write("label.bin", &frame.bytes)?;
//! # Ok::<(), epd_frame_encoder::CodecError>(())
//! ```

// Re-export commonly used types at the crate root
pub use utils::error::{CodecError, Result};

pub mod utils {
    pub mod bit_array;
    pub mod error;
}

pub mod image {
    pub mod bmp;
    pub mod raster;
    pub mod scanline;
}

pub mod encode {
    pub mod context_model;
    pub mod emitter;
    pub mod encoder;
}

pub mod frame {
    pub mod assemble;
    pub mod header;
}

// Public API exports
pub use encode::context_model::{ContextKeyTable, ContextModel, KeyEntry};
pub use encode::emitter::{AdaptiveEmitter, OutputBits};
pub use encode::encoder::{EncodeReport, encode_raw_image, measure_raw_image};
pub use frame::assemble::{
    DEFAULT_COMPRESSION_TYPE, DEFAULT_MAX_FRAME_BYTES, Frame, FrameParams, assemble_frame,
    frame_hash,
};
pub use frame::header::{FrameHeader, HeaderSize};
pub use image::bmp::BmpImage;
pub use image::raster::RasterGeometry;
pub use image::scanline::{ContextKey, ScanlineWindow};
