//! Adam7 pass geometry.
//!
//! ```text
//! 1 6 4 6 2 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! 3 6 4 6 3 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! ```
//!
//! A non-interlaced image is handled as a single pass covering every pixel,
//! which lets the rest of the decoder stop caring about the difference.

const Y_ORIGIN: [u32; 7] = [0, 0, 4, 0, 2, 0, 1];
const Y_STEP: [u32; 7] = [8, 8, 8, 4, 4, 2, 2];
const X_ORIGIN: [u32; 7] = [0, 4, 0, 2, 0, 1, 0];
const X_STEP: [u32; 7] = [8, 8, 4, 4, 2, 2, 1];

/// Which sub-image of the data stream is being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pass {
  /// The one pass of a non-interlaced image.
  Full,
  /// Adam7 pass 0 through 6.
  Adam7(u8),
}

/// Where a pass's pixels land in the full image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassGeometry {
  pub x_origin: u32,
  pub y_origin: u32,
  pub x_step: u32,
  pub y_step: u32,
  /// Pixels per row of this pass.
  pub width: u32,
  /// Rows in this pass.
  pub height: u32,
}
impl PassGeometry {
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.width == 0 || self.height == 0
  }
}

#[inline]
#[must_use]
const fn samples_along(full: u32, origin: u32, step: u32) -> u32 {
  if full > origin {
    (full - origin + step - 1) / step
  } else {
    0
  }
}

impl Pass {
  /// The first pass of an image, interlaced or not.
  #[inline]
  #[must_use]
  pub const fn first(is_interlaced: bool) -> Self {
    if is_interlaced {
      Self::Adam7(0)
    } else {
      Self::Full
    }
  }

  /// The pass after this one, if any.
  #[inline]
  #[must_use]
  pub const fn next(self) -> Option<Self> {
    match self {
      Self::Adam7(p) if p < 6 => Some(Self::Adam7(p + 1)),
      _ => None,
    }
  }

  /// The geometry of this pass for a `full_width` by `full_height` image.
  #[must_use]
  pub const fn geometry(self, full_width: u32, full_height: u32) -> PassGeometry {
    match self {
      Self::Full => PassGeometry {
        x_origin: 0,
        y_origin: 0,
        x_step: 1,
        y_step: 1,
        width: full_width,
        height: full_height,
      },
      Self::Adam7(p) => {
        let p = p as usize;
        PassGeometry {
          x_origin: X_ORIGIN[p],
          y_origin: Y_ORIGIN[p],
          x_step: X_STEP[p],
          y_step: Y_STEP[p],
          width: samples_along(full_width, X_ORIGIN[p], X_STEP[p]),
          height: samples_along(full_height, Y_ORIGIN[p], Y_STEP[p]),
        }
      }
    }
  }

  /// Starting from `self`, finds the first pass that holds any pixels.
  #[must_use]
  pub fn first_non_empty(self, full_width: u32, full_height: u32) -> Option<Self> {
    let mut pass = self;
    loop {
      if !pass.geometry(full_width, full_height).is_empty() {
        return Some(pass);
      }
      pass = pass.next()?;
    }
  }
}

/// Given the dimensions of the full PNG image, computes the size of each
/// reduced image.
///
/// The output uses index 0 as the base image size, and indexes 1 through 7 for
/// the size of Adam7 passes 0 through 6.
#[must_use]
pub fn pass_dimensions(full_width: u32, full_height: u32) -> [(u32, u32); 8] {
  let mut out = [(full_width, full_height); 8];
  for p in 0..7_u8 {
    let g = Pass::Adam7(p).geometry(full_width, full_height);
    out[p as usize + 1] = (g.width, g.height);
  }
  out
}

#[test]
fn test_pass_dimensions() {
  assert_eq!(pass_dimensions(0, 0), [(0, 0); 8]);
  // one
  for (w, ex) in (1..=8).zip([1, 1, 1, 1, 1, 1, 1, 1]) {
    assert_eq!(pass_dimensions(w, 0)[1].0, ex, "failed w:{w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 1, 1, 1, 1, 1, 1]) {
    assert_eq!(pass_dimensions(0, h)[1].1, ex, "failed h:{h}");
  }
  // two
  for (w, ex) in (1..=8).zip([0, 0, 0, 0, 1, 1, 1, 1]) {
    assert_eq!(pass_dimensions(w, 0)[2].0, ex, "failed w:{w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 1, 1, 1, 1, 1, 1]) {
    assert_eq!(pass_dimensions(0, h)[2].1, ex, "failed h:{h}");
  }
  // three
  for (w, ex) in (1..=8).zip([1, 1, 1, 1, 2, 2, 2, 2]) {
    assert_eq!(pass_dimensions(w, 0)[3].0, ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([0, 0, 0, 0, 1, 1, 1, 1]) {
    assert_eq!(pass_dimensions(0, h)[3].1, ex, "failed h: {h}");
  }
  // four
  for (w, ex) in (1..=8).zip([0, 0, 1, 1, 1, 1, 2, 2]) {
    assert_eq!(pass_dimensions(w, 0)[4].0, ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 1, 1, 2, 2, 2, 2]) {
    assert_eq!(pass_dimensions(0, h)[4].1, ex, "failed h: {h}");
  }
  // five
  for (w, ex) in (1..=8).zip([1, 1, 2, 2, 3, 3, 4, 4]) {
    assert_eq!(pass_dimensions(w, 0)[5].0, ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([0, 0, 1, 1, 1, 1, 2, 2]) {
    assert_eq!(pass_dimensions(0, h)[5].1, ex, "failed h: {h}");
  }
  // six
  for (w, ex) in (1..=8).zip([0, 1, 1, 2, 2, 3, 3, 4]) {
    assert_eq!(pass_dimensions(w, 0)[6].0, ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 2, 2, 3, 3, 4, 4]) {
    assert_eq!(pass_dimensions(0, h)[6].1, ex, "failed h: {h}");
  }
  // seven
  for (w, ex) in (1..=8).zip([1, 2, 3, 4, 5, 6, 7, 8]) {
    assert_eq!(pass_dimensions(w, 0)[7].0, ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([0, 1, 1, 2, 2, 3, 3, 4]) {
    assert_eq!(pass_dimensions(0, h)[7].1, ex, "failed h: {h}");
  }
  //
  assert_eq!(
    pass_dimensions(8, 8),
    [
      (8, 8), // zeroth
      (1, 1), // one
      (1, 1), // two
      (2, 1), // three
      (2, 2), // four
      (4, 2), // five
      (4, 4), // six
      (8, 4), // seven
    ]
  );
}

#[test]
fn test_empty_passes_are_skipped() {
  // a 1x1 image only has pixels in the first pass
  assert_eq!(Pass::Adam7(0).first_non_empty(1, 1), Some(Pass::Adam7(0)));
  assert_eq!(Pass::Adam7(1).first_non_empty(1, 1), None);
  // 2x1: passes 0 and 5 (x origin 1, y origin 0)
  assert_eq!(Pass::Adam7(1).first_non_empty(2, 1), Some(Pass::Adam7(5)));
  assert_eq!(Pass::Full.first_non_empty(3, 3), Some(Pass::Full));
  assert_eq!(Pass::Full.next(), None);
}
