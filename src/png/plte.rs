use super::*;

/// The decoded palette table.
///
/// Entries start out opaque; a later `tRNS` chunk can lower the alpha of the
/// first few entries in place.
#[derive(Clone, Default, PartialEq, Eq)]
pub(crate) struct Palette {
  entries: Vec<ARGB8888>,
  present: bool,
}
impl Debug for Palette {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // currently prints no more than 4 palette entries
    f.debug_tuple("Palette")
      .field(&&self.entries[..self.entries.len().min(4)])
      .field(&self.entries.len())
      .finish()
  }
}
impl Palette {
  pub(crate) fn clear(&mut self) {
    self.entries.clear();
    self.present = false;
  }

  #[inline]
  pub(crate) fn is_present(&self) -> bool {
    self.present
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }

  /// Looks up an index, giving the all-ones color when it's out of range.
  #[inline]
  #[must_use]
  pub(crate) fn get(&self, index: u32) -> ARGB8888 {
    self.entries.get(index as usize).copied().unwrap_or(ARGB8888::OUT_OF_RANGE)
  }

  /// Reads a `PLTE` payload of `len` bytes straight from the source.
  pub(crate) fn read_from<S: ByteSource>(
    &mut self, src: &mut S, len: u32, header: &PngHeader,
  ) -> PngResult<()> {
    if self.present || !header.color_type.allows_palette() {
      return Err(PngError::UnsupportedChunk);
    }
    let len = len as usize;
    let count = len / 3;
    if len == 0 || len % 3 != 0 || count > header.max_palette_len() {
      return Err(PngError::UnsupportedChunk);
    }
    self.entries.clear();
    self.entries.try_reserve_exact(count)?;
    for _ in 0..count {
      let mut rgb = [0_u8; 3];
      read_exact(src, &mut rgb)?;
      let [r, g, b] = rgb;
      self.entries.push(ARGB8888::opaque(r, g, b));
    }
    self.present = true;
    Ok(())
  }

  /// Overwrites the alpha of the first `alphas.len()` entries.
  pub(crate) fn apply_alphas(&mut self, alphas: &[u8]) -> PngResult<()> {
    if alphas.len() > self.entries.len() {
      return Err(PngError::UnsupportedChunk);
    }
    self.entries.iter_mut().zip(alphas.iter().copied()).for_each(|(e, a)| e.a = a);
    Ok(())
  }
}
