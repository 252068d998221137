use super::*;

use miniz_oxide::inflate::{
  core::{
    decompress,
    inflate_flags::{TINFL_FLAG_HAS_MORE_INPUT, TINFL_FLAG_PARSE_ZLIB_HEADER},
    DecompressorOxide,
  },
  TINFLStatus,
};

/// The inflator's rolling output window. Must be a power of two, and at least
/// the 32 KiB that DEFLATE back references can reach.
pub(crate) const WINDOW_LEN: usize = 32 * 1024;

/// Incremental zlib decompression of the `IDAT` stream.
///
/// Every `IDAT` payload is part of one zlib stream, so the decompressor and
/// its window live for the whole image. Output is handed on as soon as it's
/// produced, the window only has to hold it until the next call.
pub(crate) struct IdatInflater {
  decomp: Box<DecompressorOxide>,
  window: Vec<u8>,
  /// Where the next output lands in `window`.
  cursor: usize,
  done: bool,
}
impl Debug for IdatInflater {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("IdatInflater").field("cursor", &self.cursor).field("done", &self.done).finish()
  }
}
impl IdatInflater {
  pub(crate) fn new() -> PngResult<Self> {
    let mut window = Vec::new();
    window.try_reserve_exact(WINDOW_LEN)?;
    window.resize(WINDOW_LEN, 0);
    Ok(Self { decomp: Box::default(), window, cursor: 0, done: false })
  }

  /// Gets ready for a new zlib stream, keeping the window allocation.
  pub(crate) fn reset(&mut self) {
    *self.decomp = DecompressorOxide::default();
    self.cursor = 0;
    self.done = false;
  }

  /// If the end of the zlib stream has been seen.
  #[inline]
  pub(crate) fn is_done(&self) -> bool {
    self.done
  }

  /// Decompresses all of `input`, passing each piece of output to
  /// `on_output` in stream order.
  pub(crate) fn feed<F>(&mut self, mut input: &[u8], mut on_output: F) -> PngResult<()>
  where
    F: FnMut(&[u8]) -> PngResult<()>,
  {
    let flags = TINFL_FLAG_HAS_MORE_INPUT | TINFL_FLAG_PARSE_ZLIB_HEADER;
    while !self.done {
      let (status, consumed, produced) =
        decompress(&mut self.decomp, input, &mut self.window, self.cursor, flags);
      log::trace!("png: inflate consumed {consumed}, produced {produced}, {status:?}");
      input = &input[consumed..];
      let end = self.cursor + produced;
      if end <= WINDOW_LEN {
        on_output(&self.window[self.cursor..end])?;
      } else {
        on_output(&self.window[self.cursor..])?;
        on_output(&self.window[..end - WINDOW_LEN])?;
      }
      self.cursor = end % WINDOW_LEN;
      match status {
        TINFLStatus::Done => {
          self.done = true;
          self.cursor = 0;
          if !input.is_empty() {
            log::warn!("png: {} bytes of IDAT data after the end of the zlib stream", input.len());
          }
        }
        TINFLStatus::NeedsMoreInput => {
          if input.is_empty() {
            break;
          }
          if consumed == 0 && produced == 0 {
            return Err(PngError::DecompressionFailure);
          }
        }
        TINFLStatus::HasMoreOutput => (),
        other => {
          log::debug!("png: inflate failed: {other:?}");
          return Err(PngError::DecompressionFailure);
        }
      }
    }
    Ok(())
  }
}
