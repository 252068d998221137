use super::*;

/// Pixels gathered before each call to the sink.
const STAGE_LEN: usize = 64;

/// Turns rebuilt scanlines into [`ARGB8888`] runs for a [`PixelSink`].
#[derive(Debug, Clone)]
pub(crate) struct PixelExpander {
  color_type: PngColorType,
  /// Bits per sample in the row data (1, 2, 4, 8, or 16).
  depth: u8,
  channels: usize,
  /// For gray images, see [`magnification`].
  magni: u32,
  pub(crate) palette: Palette,
  pub(crate) transparency: Transparency,
  staged: [ARGB8888; STAGE_LEN],
}
impl Default for PixelExpander {
  fn default() -> Self {
    Self {
      color_type: PngColorType::Y,
      depth: 8,
      channels: 1,
      magni: magnification(8),
      palette: Palette::default(),
      transparency: Transparency::None,
      staged: [ARGB8888::default(); STAGE_LEN],
    }
  }
}
impl PixelExpander {
  pub(crate) fn reset(&mut self, header: &PngHeader) {
    self.color_type = header.color_type;
    self.depth = header.bit_depth;
    self.channels = header.color_type.channel_count();
    // palette indexes are never scaled
    self.magni = match header.color_type {
      PngColorType::Index => magnification(8),
      _ => magnification(header.bit_depth),
    };
    self.palette.clear();
    self.transparency = Transparency::None;
  }

  /// Sample `k` of the row, cut down to at most 8 bits.
  ///
  /// 16-bit samples give their high byte, low depths are unpacked MSB first.
  #[inline]
  fn sample(&self, row: &[u8], k: usize) -> u32 {
    match self.depth {
      8 => row[k] as u32,
      16 => row[k * 2] as u32,
      depth => {
        let depth = depth as usize;
        let bit = k * depth;
        let shift = 8 - depth - (bit % 8);
        ((row[bit / 8] >> shift) & ((1 << depth) - 1) as u8) as u32
      }
    }
  }

  /// Expands a gray (or gray alpha) sample to the 8-bit range.
  #[inline]
  fn scale(&self, v: u32) -> u8 {
    expand_sample(v, self.magni, self.depth.min(8))
  }

  #[inline]
  fn pixel(&self, row: &[u8], k: usize) -> ARGB8888 {
    let base = k * self.channels;
    match self.color_type {
      PngColorType::Y => {
        let v = self.sample(row, base);
        let y = self.scale(v);
        let a = match self.transparency {
          Transparency::Y(key) if key as u32 == v => 0,
          _ => 0xFF,
        };
        ARGB8888 { a, r: y, g: y, b: y }
      }
      PngColorType::YA => {
        let y = self.scale(self.sample(row, base));
        let a = self.scale(self.sample(row, base + 1));
        ARGB8888 { a, r: y, g: y, b: y }
      }
      PngColorType::RGB => {
        let r = self.sample(row, base);
        let g = self.sample(row, base + 1);
        let b = self.sample(row, base + 2);
        let a = match self.transparency {
          Transparency::RGB(key) if key == Transparency::pack_rgb(r, g, b) => 0,
          _ => 0xFF,
        };
        ARGB8888 { a, r: r as u8, g: g as u8, b: b as u8 }
      }
      PngColorType::RGBA => ARGB8888 {
        r: self.sample(row, base) as u8,
        g: self.sample(row, base + 1) as u8,
        b: self.sample(row, base + 2) as u8,
        a: self.sample(row, base + 3) as u8,
      },
      PngColorType::Index => self.palette.get(self.sample(row, base)),
    }
  }

  /// Expands one rebuilt row and hands it to `sink` in staged runs.
  pub(crate) fn expand_row<K>(&mut self, row: &[u8], info: RowInfo, sink: &mut K)
  where
    K: PixelSink + ?Sized,
  {
    let width = info.width as usize;
    let mut start = 0;
    while start < width {
      let n = (width - start).min(STAGE_LEN);
      for i in 0..n {
        self.staged[i] = self.pixel(row, start + i);
      }
      let x = info.x + (start as u32) * info.x_step;
      sink.draw(x, info.y, info.x_step, &self.staged[..n]);
      start += n;
    }
  }
}
