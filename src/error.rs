use core::fmt;

/// An error from the `stream_png` decoder.
///
/// Every error is terminal for the decode in progress. Pixels that were
/// already handed to the [`PixelSink`](crate::PixelSink) stay delivered, so
/// the receiving surface should be treated as partially drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PngError {
  /// The 8-byte PNG magic, or the IHDR record that must follow it, didn't
  /// match.
  InvalidSignature,

  /// The IHDR fields are not something we can decode: a compression or
  /// filter method other than 0, an illegal color type / bit depth pairing,
  /// an unknown interlace method, or a zero width or height.
  InvalidHeader,

  /// The image is larger than the configured limits.
  ///
  /// See [`DecoderConfig`](crate::DecoderConfig).
  DimensionsTooLarge,

  /// A `PLTE` or `tRNS` chunk was used where it's forbidden, was repeated,
  /// or had a malformed size. Also used for a repeated `IHDR`, an empty
  /// `IDAT`, and chunk lengths beyond what PNG allows.
  UnsupportedChunk,

  /// The allocator couldn't give us enough space.
  OutOfMemory,

  /// The inflator reported a corrupt zlib stream.
  DecompressionFailure,

  /// The byte source returned fewer bytes than were asked for.
  TruncatedInput,

  /// A scanline started with a filter type byte of 5 or more.
  InvalidFilterType,

  /// `decomp` was called without a successful `prepare` first, or was
  /// called a second time on the same prepared image.
  InvalidState,
}

/// Shorthand for results with a [`PngError`].
pub type PngResult<T> = Result<T, PngError>;

impl fmt::Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::InvalidSignature => "invalid PNG signature",
      Self::InvalidHeader => "invalid or unsupported IHDR",
      Self::DimensionsTooLarge => "image dimensions exceed the configured limits",
      Self::UnsupportedChunk => "misplaced, repeated, or malformed chunk",
      Self::OutOfMemory => "insufficient memory",
      Self::DecompressionFailure => "failed to decompress the IDAT stream",
      Self::TruncatedInput => "insufficient data",
      Self::InvalidFilterType => "invalid filter type",
      Self::InvalidState => "decoder is not prepared for decompression",
    })
  }
}

#[cfg(feature = "std")]
impl std::error::Error for PngError {}

impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::OutOfMemory
  }
}

#[test]
fn test_error_display_is_not_empty() {
  use alloc::string::ToString;
  for e in [
    PngError::InvalidSignature,
    PngError::InvalidHeader,
    PngError::DimensionsTooLarge,
    PngError::UnsupportedChunk,
    PngError::OutOfMemory,
    PngError::DecompressionFailure,
    PngError::TruncatedInput,
    PngError::InvalidFilterType,
    PngError::InvalidState,
  ] {
    assert!(!e.to_string().is_empty(), "{e:?}");
  }
}
