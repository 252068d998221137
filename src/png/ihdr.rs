use super::*;

/// Byte length of the IHDR payload.
pub(crate) const IHDR_LEN: usize = 13;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}

/// Channel count and allowed bit depths, indexed by the raw color type.
///
/// The depth mask has bit `n` set when a depth of `1 << n` is legal. A
/// channel count of 0 marks a color type that doesn't exist.
const COLOR_TYPE_TABLE: [(u8, u8); 7] = [
  (1, 0b11111), // Y: 1, 2, 4, 8, 16
  (0, 0),
  (3, 0b11000), // RGB: 8, 16
  (1, 0b01111), // Index: 1, 2, 4, 8
  (2, 0b11000), // YA: 8, 16
  (0, 0),
  (4, 0b11000), // RGBA: 8, 16
];

impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    COLOR_TYPE_TABLE[self as usize].0 as usize
  }

  /// If a `PLTE` chunk may appear with this color type.
  #[inline]
  #[must_use]
  pub const fn allows_palette(self) -> bool {
    matches!(self, Self::RGB | Self::Index | Self::RGBA)
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(PngError::InvalidHeader),
    })
  }
}

/// Image Header, as read from the IHDR chunk.
///
/// Once a decoder has been prepared this never changes for that image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngHeader {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// always 0, the only compression method PNG defines
  pub compression_method: u8,
  /// always 0, the only filter method PNG defines
  pub filter_method: u8,
  /// if the image data is stored with Adam7 interlacing.
  pub is_interlaced: bool,
}
impl PngHeader {
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// Bytes per complete pixel, rounded up to 1 for bit-packed formats.
  ///
  /// This is the distance that the Sub, Average, and Paeth filters look to
  /// the left.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(&self) -> usize {
    (self.bits_per_pixel() + 7) / 8
  }

  /// Bytes of pixel data in a scanline `width` pixels wide (not counting the
  /// filter type byte).
  #[inline]
  #[must_use]
  pub const fn bytes_per_scanline(&self, width: u32) -> usize {
    // When pixels are less than 8 bits it's possible to end up with partial
    // bytes on the end, so we must round up.
    ((self.bits_per_pixel() * (width as usize)) + 7) / 8
  }

  /// How many palette entries this header allows, `min(256, 2^depth)`.
  #[inline]
  #[must_use]
  pub const fn max_palette_len(&self) -> usize {
    if self.bit_depth >= 8 {
      256
    } else {
      1 << self.bit_depth
    }
  }
}
impl TryFrom<&[u8]> for PngHeader {
  type Error = PngError;
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =>
      {
        if *compression_method != 0 || *filter_method != 0 {
          return Err(PngError::InvalidHeader);
        }
        let color_type = PngColorType::try_from(*color_type)?;
        if !bit_depth.is_power_of_two() || *bit_depth > 16 {
          return Err(PngError::InvalidHeader);
        }
        let depth_mask = COLOR_TYPE_TABLE[color_type as usize].1;
        if depth_mask & (1 << bit_depth.trailing_zeros()) == 0 {
          return Err(PngError::InvalidHeader);
        }
        let is_interlaced = match interlace_method {
          0 => false,
          1 => true,
          _ => return Err(PngError::InvalidHeader),
        };
        let width = u32::from_be_bytes([*w0, *w1, *w2, *w3]);
        let height = u32::from_be_bytes([*h0, *h1, *h2, *h3]);
        if width == 0 || height == 0 {
          return Err(PngError::InvalidHeader);
        }
        Ok(Self {
          width,
          height,
          bit_depth: *bit_depth,
          color_type,
          compression_method: 0,
          filter_method: 0,
          is_interlaced,
        })
      }
      _ => Err(PngError::InvalidHeader),
    }
  }
}
