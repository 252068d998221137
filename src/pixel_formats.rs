//! The pixel format that the decoder hands out.
//!
//! Whatever the PNG stores (1-bit grayscale, 16-bit RGBA, a 4-bit palette,
//! ...), every decoded pixel is expanded to a single [`ARGB8888`] value:
//! four bytes in the order `[a, r, g, b]`. Read as a little-endian `u32`
//! that puts alpha in the lowest byte.
//!
//! Grayscale images replicate the gray value into all three color channels.

use bytemuck::{Pod, Zeroable};

/// An 8-bits per channel pixel, stored alpha first.
///
/// An alpha of 0 is fully transparent, 0xFF is fully opaque.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct ARGB8888 {
  pub a: u8,
  pub r: u8,
  pub g: u8,
  pub b: u8,
}
impl ARGB8888 {
  /// Used for palette indexes that fall outside the palette.
  pub const OUT_OF_RANGE: Self = Self { a: 0xFF, r: 0xFF, g: 0xFF, b: 0xFF };

  #[inline]
  #[must_use]
  pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
    Self { a: 0xFF, r, g, b }
  }

  /// Packs the pixel, with `a` as the least significant byte.
  #[inline]
  #[must_use]
  pub const fn to_u32(self) -> u32 {
    u32::from_le_bytes([self.a, self.r, self.g, self.b])
  }

  /// Unpacks a value made by [`to_u32`](Self::to_u32).
  #[inline]
  #[must_use]
  pub const fn from_u32(u: u32) -> Self {
    let [a, r, g, b] = u.to_le_bytes();
    Self { a, r, g, b }
  }

  #[inline]
  #[must_use]
  pub const fn to_bytes(self) -> [u8; 4] {
    [self.a, self.r, self.g, self.b]
  }
}

/// Views a run of pixels as its raw `[a, r, g, b, a, r, g, b, ...]` bytes.
#[inline]
#[must_use]
pub fn pixels_as_bytes(pixels: &[ARGB8888]) -> &[u8] {
  bytemuck::cast_slice(pixels)
}

#[test]
fn test_argb_byte_order() {
  let p = ARGB8888::opaque(0x11, 0x22, 0x33);
  assert_eq!(p.to_bytes(), [0xFF, 0x11, 0x22, 0x33]);
  assert_eq!(p.to_u32(), 0x3322_11FF);
  assert_eq!(ARGB8888::from_u32(p.to_u32()), p);
  assert_eq!(pixels_as_bytes(&[p, ARGB8888::default()]), &[0xFF, 0x11, 0x22, 0x33, 0, 0, 0, 0]);
  assert_eq!(ARGB8888::OUT_OF_RANGE.to_u32(), u32::MAX);
}
