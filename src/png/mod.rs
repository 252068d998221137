#![forbid(unsafe_code)]

//! Streaming PNG decoding.
//!
//! * [Portable Network Graphics Specification (Third Edition)][png-w3c]
//!
//! [png-w3c]: https://www.w3.org/TR/png/
//!
//! ## Decoder Design
//!
//! The decoder is built for devices that can't hold a whole decoded image in
//! memory, and often can't hold the whole *encoded* image either.
//!
//! * Bytes are pulled from a [`ByteSource`] exactly as they're needed. There's
//!   no seeking, and nothing is read twice.
//! * Pixels are pushed into a [`PixelSink`] as soon as their scanline is
//!   complete, already converted to [`ARGB8888`].
//! * Memory use is fixed once the header is known: a 32 KiB inflate window,
//!   one scanline, a palette of at most 256 entries, and a small read buffer.
//!
//! Decoding is two calls:
//!
//! 1) [`PngDecoder::prepare`] reads the signature and the `IHDR` chunk, and
//!    allocates the buffers. After this you can look at the
//!    [`header`](PngDecoder::header), for example to clear a screen area.
//! 2) [`PngDecoder::decomp`] reads every remaining chunk up to `IEND` and
//!    draws the pixels.
//!
//! Interlaced images are drawn one Adam7 pass at a time, so the sink sees a
//! sparse image first and then the gaps fill in.
//!
//! ## Parsing Errors
//!
//! Only the critical chunks are looked at: `IHDR`, `PLTE`, `tRNS`, `IDAT`,
//! and `IEND`. Everything else is skipped without being read. Chunk CRCs are
//! never checked.
//!
//! A problem with critical data stops the decode with a [`PngError`], but
//! some harmless oddities are let through (with a `log` warning):
//!
//! * An indexed image that has no palette draws every pixel as
//!   [`ARGB8888::OUT_OF_RANGE`].
//! * An `IEND` before all image data is decoded ends the decode successfully,
//!   with the undecoded pixels never drawn.
//! * Data after the end of the zlib stream is ignored.

use core::fmt::{Debug, Write};

use alloc::{boxed::Box, vec::Vec};

use crate::*;

mod chunk;
pub use chunk::*;

mod ihdr;
pub use ihdr::*;

mod plte;
pub(crate) use plte::*;

mod trns;
pub(crate) use trns::*;

mod adam7;
pub use adam7::*;

mod unfilter;
pub(crate) use unfilter::*;

mod inflate;
pub(crate) use inflate::*;

mod expand;
pub(crate) use expand::*;

mod decoder;
pub use decoder::*;


/// Fills `buf` from the source, or fails with `TruncatedInput`.
#[inline]
pub(crate) fn read_exact<S: ByteSource + ?Sized>(src: &mut S, buf: &mut [u8]) -> PngResult<()> {
  if src.read(buf) == buf.len() {
    Ok(())
  } else {
    Err(PngError::TruncatedInput)
  }
}

/// Skips `len` bytes of the source, or fails with `TruncatedInput`.
#[inline]
pub(crate) fn skip_exact<S: ByteSource + ?Sized>(src: &mut S, len: usize) -> PngResult<()> {
  if src.skip(len) == len {
    Ok(())
  } else {
    Err(PngError::TruncatedInput)
  }
}
