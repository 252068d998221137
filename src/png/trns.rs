use super::*;

/// Transparency info from a `tRNS` chunk.
///
/// See [tRNS](https://www.w3.org/TR/png/#11tRNS)
///
/// Keys are compared against the 8-bit sample the decoder works with, so the
/// 16-bit values in the chunk are cut down to their low byte. For 16-bit
/// images the sample side is the *high* byte, so a gray key of `0x1234`
/// matches every sample `0x34??` and not `0x1234` itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) enum Transparency {
  /// No `tRNS` chunk (yet).
  #[default]
  None,
  /// Gray samples equal to this are fully transparent.
  Y(u8),
  /// RGB samples equal to this (packed `r | g << 8 | b << 16`) are fully
  /// transparent.
  RGB(u32),
  /// The alphas were written into the palette.
  Palette,
}
impl Transparency {
  /// Packs an RGB triple the same way [`Transparency::RGB`] does.
  #[inline]
  #[must_use]
  pub(crate) const fn pack_rgb(r: u32, g: u32, b: u32) -> u32 {
    r | (g << 8) | (b << 16)
  }

  /// Reads a `tRNS` payload of `len` bytes straight from the source.
  ///
  /// Indexed images need the palette to already be present, since the
  /// alphas get written into it.
  pub(crate) fn read_from<S: ByteSource>(
    src: &mut S, len: u32, header: &PngHeader, palette: &mut Palette,
  ) -> PngResult<Self> {
    if len == 0 {
      return Err(PngError::UnsupportedChunk);
    }
    match header.color_type {
      PngColorType::Index => {
        if !palette.is_present() || len as usize > palette.len() {
          return Err(PngError::UnsupportedChunk);
        }
        let mut alphas = [0_u8; 256];
        let alphas = &mut alphas[..len as usize];
        read_exact(src, alphas)?;
        palette.apply_alphas(alphas)?;
        Ok(Self::Palette)
      }
      PngColorType::Y => {
        if len != 2 {
          return Err(PngError::UnsupportedChunk);
        }
        let mut y = [0_u8; 2];
        read_exact(src, &mut y)?;
        Ok(Self::Y(u16::from_be_bytes(y) as u8))
      }
      PngColorType::RGB => {
        if len != 6 {
          return Err(PngError::UnsupportedChunk);
        }
        let mut rgb = [0_u8; 6];
        read_exact(src, &mut rgb)?;
        let [_, r, _, g, _, b] = rgb;
        Ok(Self::RGB(Self::pack_rgb(r as u32, g as u32, b as u32)))
      }
      PngColorType::YA | PngColorType::RGBA => Err(PngError::UnsupportedChunk),
    }
  }
}
