use crate::ARGB8888;

/// Receives decoded pixels.
///
/// Each call gets a run of pixels that all sit on row `y`. The first pixel
/// is at column `x`, and each following pixel is `x_step` columns further
/// right. `x_step` is 1 for non-interlaced images and the current Adam7
/// pass's horizontal spacing otherwise.
///
/// Over a whole decode every pixel of the image is delivered exactly once.
/// Within a row the runs arrive in increasing `x` order, and within a pass
/// the rows arrive in increasing `y` order. How many pixels go into a single
/// call is not something to rely on.
pub trait PixelSink {
  fn draw(&mut self, x: u32, y: u32, x_step: u32, pixels: &[ARGB8888]);
}

impl<F> PixelSink for F
where
  F: FnMut(u32, u32, u32, &[ARGB8888]),
{
  #[inline]
  fn draw(&mut self, x: u32, y: u32, x_step: u32, pixels: &[ARGB8888]) {
    self(x, y, x_step, pixels)
  }
}
