#![forbid(unsafe_code)]

//! An owned image buffer, for hosts that can afford to keep every pixel.

use alloc::vec::Vec;

use crate::*;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// A `width` by `height` image of [`ARGB8888`] pixels, stored row by row.
///
/// It's a [`PixelSink`], so a decoder can draw straight into it. Draws that
/// fall outside the image are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct ArgbImage {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<ARGB8888>,
}
impl ArgbImage {
  /// An image filled with fully transparent black.
  pub fn try_new(width: u32, height: u32) -> PngResult<Self> {
    let count = (width as usize).checked_mul(height as usize).ok_or(PngError::OutOfMemory)?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(count)?;
    pixels.resize(count, ARGB8888::default());
    Ok(Self { width, height, pixels })
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<ARGB8888> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width)).copied()
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut ARGB8888> {
    if x < self.width && y < self.height {
      let i = xy_width_to_index(x, y, self.width);
      self.pixels.get_mut(i)
    } else {
      None
    }
  }
}
impl PixelSink for ArgbImage {
  fn draw(&mut self, x: u32, y: u32, x_step: u32, pixels: &[ARGB8888]) {
    let mut x = x;
    for p in pixels {
      if let Some(dst) = self.get_mut(x, y) {
        *dst = *p;
      }
      x = x.saturating_add(x_step);
    }
  }
}

/// Decodes a complete in-memory PNG into an [`ArgbImage`].
///
/// Pixels the data never draws (see the [`png`] module docs) are left fully
/// transparent black.
pub fn decode_png_bytes(bytes: &[u8]) -> PngResult<ArgbImage> {
  let mut decoder = PngDecoder::new();
  decoder.prepare(bytes)?;
  let mut image = ArgbImage::try_new(decoder.width(), decoder.height())?;
  decoder.decomp(&mut image)?;
  Ok(image)
}

#[test]
fn test_argb_image_draws_with_steps() {
  let mut image = ArgbImage::try_new(5, 2).unwrap();
  let red = ARGB8888::opaque(0xFF, 0, 0);
  image.draw(1, 1, 2, &[red, red, red]);
  assert_eq!(image.get(1, 1), Some(red));
  assert_eq!(image.get(2, 1), Some(ARGB8888::default()));
  assert_eq!(image.get(3, 1), Some(red));
  // the third pixel would land at x = 5
  assert_eq!(image.pixels.iter().filter(|p| **p == red).count(), 2);
  assert_eq!(image.get(5, 1), None);
}
