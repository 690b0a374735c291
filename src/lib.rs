//! # bmp2y4m
//!
//! Converts a directory of uncompressed bitmap (BMP) still images into
//! a single YUV4MPEG2 (Y4M) raw video stream, applying RGB→YCbCr
//! colour conversion and chroma subsampling.
//!
//! ## Supported input
//!
//! BMP files with the 14-byte file header plus 40-byte
//! BITMAPINFOHEADER (pixel array at byte 54), 24 or 32 bits per pixel,
//! uncompressed (BI_RGB), bottom-up row order. All frames of a session
//! must share the first frame's dimensions.
//!
//! ## Subsampling layouts
//!
//! `C444`, `C422`, `C420`, `C411` and `C410`, each with its own
//! cropping rule for unaligned dimensions (see [`ColorSpace::crop`]).
//! 4:1:0 output is spec-conformant but rarely playable; selecting it
//! logs an advisory.
//!
//! ## Non-goals
//!
//! - Compressed or palettized BMP variants
//! - Decoding Y4M back to images
//! - Multi-threaded or incremental encoding
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use bmp2y4m::{encode_to_path, ColorSpace, EncodeConfig};
//!
//! let frames: Vec<PathBuf> = vec![
//!     "frames/frame_000.bmp".into(),
//!     "frames/frame_001.bmp".into(),
//! ];
//! let config = EncodeConfig {
//!     colorspace: ColorSpace::C420,
//!     frame_rate: (30, 1),
//!     ..EncodeConfig::default()
//! };
//! let summary = encode_to_path(&frames, &config, Path::new("out.y4m"))?;
//! println!("{} frames, {} bytes", summary.frames, summary.bytes_written);
//! # Ok::<(), bmp2y4m::EncodeError>(())
//! ```

#![forbid(unsafe_code)]

mod buffer;
mod error;
mod limits;

pub mod bmp;
pub mod color;
pub mod colorspace;
pub mod subsample;
pub mod y4m;

mod pipeline;

// Re-exports
pub use bmp::{read_header, BmpDecoder, BmpHeader};
pub use buffer::{Pixel, PixelBuffer};
pub use colorspace::ColorSpace;
pub use error::EncodeError;
pub use limits::Limits;
pub use pipeline::{encode_to_path, encode_to_writer, EncodeConfig, EncodeSummary};
pub use subsample::Subsampler;
pub use y4m::{Interlacing, StreamHeader};
