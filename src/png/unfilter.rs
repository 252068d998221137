use super::*;

/// The per-scanline filter type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub(crate) enum FilterType {
  None = 0,
  Sub = 1,
  Up = 2,
  Average = 3,
  Paeth = 4,
}
impl TryFrom<u8> for FilterType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      _ => return Err(PngError::InvalidFilterType),
    })
  }
}

#[inline]
#[must_use]
pub(crate) const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // The PNG standard is extremely specific that you shall not, under any
  // circumstances, alter the order of evaluation of this expression's tests.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Where a finished scanline goes in the full image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RowInfo {
  pub(crate) x: u32,
  pub(crate) y: u32,
  pub(crate) x_step: u32,
  pub(crate) width: u32,
}

/// Rebuilds scanlines from the decompressed stream, a few bytes at a time.
///
/// There's only ever one row of storage. Before a byte of the current row is
/// rebuilt its slot still holds the byte from the row above, which is exactly
/// what Up, Average, and Paeth need. Paeth also needs the byte above and to
/// the left, which has already been overwritten by then, so the last
/// `bytes_per_pixel` "above" bytes are carried in `upper_left`.
///
/// A row may arrive split over any number of [`push`](Self::push) calls.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scanlines {
  line: Vec<u8>,
  upper_left: [u8; 8],
  bpp: usize,
  header: Option<PngHeader>,
  pass: Option<Pass>,
  geometry: Option<PassGeometry>,
  stride: usize,
  filter: Option<FilterType>,
  /// Bytes of the current row rebuilt so far.
  pos: usize,
  /// Row of the current pass being rebuilt.
  row: u32,
}
impl Scanlines {
  /// Sets up for a new image, reallocating the row storage.
  pub(crate) fn reset(&mut self, header: &PngHeader) -> PngResult<()> {
    self.line = Vec::new();
    let full_stride = header.bytes_per_scanline(header.width);
    self.line.try_reserve_exact(full_stride)?;
    self.line.resize(full_stride, 0);
    self.bpp = header.bytes_per_pixel();
    self.header = Some(*header);
    let first = Pass::first(header.is_interlaced).first_non_empty(header.width, header.height);
    self.enter(first);
    Ok(())
  }

  /// If every row of every pass has been rebuilt.
  #[inline]
  pub(crate) fn is_finished(&self) -> bool {
    self.pass.is_none()
  }

  fn enter(&mut self, pass: Option<Pass>) {
    self.pass = pass;
    self.geometry = None;
    let (Some(pass), Some(header)) = (pass, self.header) else {
      return;
    };
    let geometry = pass.geometry(header.width, header.height);
    log::debug!("png: entering {pass:?}, {}x{} pixels", geometry.width, geometry.height);
    self.geometry = Some(geometry);
    self.stride = header.bytes_per_scanline(geometry.width);
    self.filter = None;
    self.pos = 0;
    self.row = 0;
    // the row above the first row of a pass is all zero
    self.line[..self.stride].fill(0);
  }

  /// Feeds decompressed bytes in.
  ///
  /// Each time a row is complete `on_row` gets the row's bytes and where it
  /// belongs. Returns how many bytes were used, which is less than
  /// `data.len()` only once the last row of the image has been produced.
  pub(crate) fn push<F>(&mut self, data: &[u8], mut on_row: F) -> PngResult<usize>
  where
    F: FnMut(&[u8], RowInfo),
  {
    let mut used = 0;
    while used < data.len() {
      let (Some(pass), Some(geometry)) = (self.pass, self.geometry) else {
        break;
      };
      let filter = match self.filter {
        Some(f) => f,
        None => {
          let f = FilterType::try_from(data[used]).map_err(|e| {
            log::debug!("png: invalid filter type {:#04x}", data[used]);
            e
          })?;
          used += 1;
          self.filter = Some(f);
          self.pos = 0;
          f
        }
      };
      let n = (self.stride - self.pos).min(data.len() - used);
      self.rebuild(filter, &data[used..used + n]);
      used += n;
      self.pos += n;
      if self.pos == self.stride {
        on_row(
          &self.line[..self.stride],
          RowInfo {
            x: geometry.x_origin,
            y: geometry.y_origin + self.row * geometry.y_step,
            x_step: geometry.x_step,
            width: geometry.width,
          },
        );
        self.filter = None;
        self.pos = 0;
        self.row += 1;
        if self.row >= geometry.height {
          let (w, h) = self.header.map(|h| (h.width, h.height)).unwrap_or((0, 0));
          let next = pass.next().and_then(|p| p.first_non_empty(w, h));
          if next.is_none() {
            log::debug!("png: all scanlines rebuilt");
          }
          self.enter(next);
        }
      }
    }
    Ok(used)
  }

  /// Undoes `filter` on the next `raw.len()` bytes of the current row.
  fn rebuild(&mut self, filter: FilterType, raw: &[u8]) {
    let bpp = self.bpp;
    let start = self.pos;
    let line = &mut self.line[start..start + raw.len()];
    match filter {
      FilterType::None => line.copy_from_slice(raw),
      FilterType::Up => {
        line.iter_mut().zip(raw.iter().copied()).for_each(|(p, x)| *p = p.wrapping_add(x));
      }
      FilterType::Sub | FilterType::Average | FilterType::Paeth => {
        for (k, x) in raw.iter().copied().enumerate() {
          let i = start + k;
          let slot = i % bpp;
          let up = self.line[i];
          let (left, upper_left) =
            if i >= bpp { (self.line[i - bpp], self.upper_left[slot]) } else { (0, 0) };
          self.line[i] = match filter {
            FilterType::Sub => x.wrapping_add(left),
            FilterType::Average => x.wrapping_add(((left as u16 + up as u16) >> 1) as u8),
            _ => x.wrapping_add(paeth_predict(left, up, upper_left)),
          };
          self.upper_left[slot] = up;
        }
      }
    }
  }
}
