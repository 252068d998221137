#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_debug_implementations)]

//! A streaming PNG decoder for small devices.
//!
//! The encoded image is pulled from a [`ByteSource`] a little at a time, and
//! decoded pixels are pushed into a [`PixelSink`] one scanline at a time,
//! as [`ARGB8888`]. The whole image never has to exist in memory, on either
//! side of the decoder.
//!
//! ```
//! use stream_png::*;
//! # fn draw_png(png: &[u8]) -> PngResult<()> {
//! let mut decoder = PngDecoder::new();
//! decoder.prepare(png)?;
//! decoder.decomp(&mut |x: u32, y: u32, x_step: u32, pixels: &[ARGB8888]| {
//!   for (i, p) in pixels.iter().enumerate() {
//!     let _screen_x = x + i as u32 * x_step;
//!     // ...
//!   }
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//! * `std` (default): [`IoSource`] to read from any [`std::io::Read`], and
//!   `std::error::Error` for [`PngError`].

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

pub mod pixel_formats;
pub use pixel_formats::*;

pub mod bit_depth_changes;
pub use bit_depth_changes::*;

mod source;
pub use source::*;

mod sink;
pub use sink::*;

pub mod png;
pub use png::{
  is_png_header_correct, pass_dimensions, DecoderConfig, Pass, PassGeometry, PngColorType,
  PngDecoder, PngHeader,
};

mod image;
pub use image::*;
