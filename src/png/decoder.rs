use super::*;

/// Runtime limits and buffer sizes for a [`PngDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoderConfig {
  /// Images wider than this fail to prepare.
  pub max_width: u32,
  /// Images taller than this fail to prepare.
  pub max_height: u32,
  /// How many compressed bytes are read (and inflated) at a time.
  ///
  /// Values below 1 count as 1.
  pub read_buffer_len: usize,
}
impl Default for DecoderConfig {
  #[inline]
  fn default() -> Self {
    Self { max_width: 16384, max_height: 16384, read_buffer_len: 1024 }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
  Fresh,
  Prepared,
  Finished,
  Failed,
}

/// A pull based PNG decoder with a fixed memory footprint.
///
/// * [`prepare`](Self::prepare) reads the signature and header, and sets up
///   the buffers.
/// * [`decomp`](Self::decomp) pulls the rest of the data and pushes every
///   pixel into a [`PixelSink`].
///
/// Memory use is the 32 KiB inflate window, one scanline, the palette, and a
/// few small buffers. It doesn't depend on the image height.
///
/// Each `prepare` allows one `decomp`. Calling `prepare` again sets the same
/// instance up for another image.
///
/// ```
/// use stream_png::*;
/// # fn decode(png: &[u8]) -> PngResult<()> {
/// let mut decoder = PngDecoder::new();
/// decoder.prepare(png)?;
/// let (w, h) = (decoder.width(), decoder.height());
/// decoder.decomp(&mut |x: u32, y: u32, x_step: u32, pixels: &[ARGB8888]| {
///   // put `pixels` on the screen at (x, y), (x + x_step, y), ...
/// })?;
/// # Ok(())
/// # }
/// ```
pub struct PngDecoder<S> {
  config: DecoderConfig,
  stage: Stage,
  source: Option<S>,
  header: Option<PngHeader>,
  read_buf: Vec<u8>,
  inflater: Option<IdatInflater>,
  scanlines: Scanlines,
  expander: PixelExpander,
}
impl<S> Debug for PngDecoder<S> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngDecoder")
      .field("config", &self.config)
      .field("stage", &self.stage)
      .field("header", &self.header)
      .finish_non_exhaustive()
  }
}
impl<S> Default for PngDecoder<S> {
  #[inline]
  fn default() -> Self {
    Self::with_config(DecoderConfig::default())
  }
}
impl<S> PngDecoder<S> {
  /// A decoder with the default [`DecoderConfig`].
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Buffers aren't allocated until [`prepare`](Self::prepare).
  #[inline]
  #[must_use]
  pub fn with_config(config: DecoderConfig) -> Self {
    Self {
      config,
      stage: Stage::Fresh,
      source: None,
      header: None,
      read_buf: Vec::new(),
      inflater: None,
      scanlines: Scanlines::default(),
      expander: PixelExpander::default(),
    }
  }

  #[inline]
  #[must_use]
  pub fn config(&self) -> &DecoderConfig {
    &self.config
  }

  /// The header of the prepared image, if any.
  #[inline]
  #[must_use]
  pub fn header(&self) -> Option<&PngHeader> {
    self.header.as_ref()
  }

  /// Image width, or 0 if nothing has been prepared.
  #[inline]
  #[must_use]
  pub fn width(&self) -> u32 {
    self.header.map_or(0, |h| h.width)
  }

  /// Image height, or 0 if nothing has been prepared.
  #[inline]
  #[must_use]
  pub fn height(&self) -> u32 {
    self.header.map_or(0, |h| h.height)
  }
}
impl<S: ByteSource> PngDecoder<S> {
  /// Reads the 29 byte opening of the PNG (signature and `IHDR`) from
  /// `source`, then allocates everything the decode needs.
  ///
  /// Any earlier image's state is dropped first, even if this fails.
  pub fn prepare(&mut self, mut source: S) -> PngResult<()> {
    self.stage = Stage::Fresh;
    self.source = None;
    self.header = None;
    let header = read_header(&mut source)?;
    log::debug!(
      "png: {}x{}, depth {}, {:?}, interlaced: {}",
      header.width,
      header.height,
      header.bit_depth,
      header.color_type,
      header.is_interlaced
    );
    if header.width > self.config.max_width || header.height > self.config.max_height {
      log::debug!(
        "png: {}x{} is over the {}x{} limit",
        header.width,
        header.height,
        self.config.max_width,
        self.config.max_height
      );
      return Err(PngError::DimensionsTooLarge);
    }
    let read_len = self.config.read_buffer_len.max(1);
    if self.read_buf.len() != read_len {
      self.read_buf = Vec::new();
      self.read_buf.try_reserve_exact(read_len)?;
      self.read_buf.resize(read_len, 0);
    }
    match self.inflater.as_mut() {
      Some(inflater) => inflater.reset(),
      None => self.inflater = Some(IdatInflater::new()?),
    }
    self.scanlines.reset(&header)?;
    self.expander.reset(&header);
    self.header = Some(header);
    self.source = Some(source);
    self.stage = Stage::Prepared;
    Ok(())
  }

  /// Decodes the rest of the image, giving every pixel to `sink`.
  ///
  /// On an error the decode stops right away. Pixels drawn before that point
  /// stay drawn.
  ///
  /// ## Failure
  /// * [`InvalidState`](PngError::InvalidState) if there's no successful
  ///   `prepare` since the last `decomp`.
  /// * Any other error describes a problem with the data.
  pub fn decomp<K>(&mut self, sink: &mut K) -> PngResult<()>
  where
    K: PixelSink + ?Sized,
  {
    if self.stage != Stage::Prepared {
      return Err(PngError::InvalidState);
    }
    let Some(mut source) = self.source.take() else {
      return Err(PngError::InvalidState);
    };
    let result = self.run_chunks(&mut source, sink);
    self.stage = match result {
      Ok(()) => Stage::Finished,
      Err(e) => {
        log::debug!("png: decode failed: {e}");
        Stage::Failed
      }
    };
    result
  }

  fn run_chunks<K>(&mut self, src: &mut S, sink: &mut K) -> PngResult<()>
  where
    K: PixelSink + ?Sized,
  {
    let header = self.header.ok_or(PngError::InvalidState)?;
    let mut seen_idat = false;
    loop {
      // the previous chunk's CRC, then this chunk's length and type
      let mut prefix = [0_u8; 12];
      read_exact(src, &mut prefix)?;
      let [_, _, _, _, rest @ ..] = prefix;
      let ChunkPrefix { len, ty } = ChunkPrefix::from_bytes(rest)?;
      log::debug!("png: {ty:?} chunk, {len} bytes");
      match ty {
        ChunkType::IHDR => return Err(PngError::UnsupportedChunk),
        ChunkType::PLTE => {
          // PLTE has to come before both tRNS and IDAT
          if seen_idat || self.expander.transparency != Transparency::None {
            return Err(PngError::UnsupportedChunk);
          }
          self.expander.palette.read_from(src, len, &header)?;
          log::debug!("png: palette of {} entries", self.expander.palette.len());
        }
        ChunkType::tRNS => {
          if seen_idat || self.expander.transparency != Transparency::None {
            return Err(PngError::UnsupportedChunk);
          }
          let trns = Transparency::read_from(src, len, &header, &mut self.expander.palette)?;
          log::debug!("png: transparency {trns:?}");
          self.expander.transparency = trns;
        }
        ChunkType::IDAT => {
          if len == 0 {
            return Err(PngError::UnsupportedChunk);
          }
          if !seen_idat
            && header.color_type == PngColorType::Index
            && !self.expander.palette.is_present()
          {
            log::warn!("png: indexed image without a palette");
          }
          seen_idat = true;
          self.stream_idat(src, len as usize, sink)?;
        }
        ChunkType::IEND => {
          if len != 0 {
            return Err(PngError::UnsupportedChunk);
          }
          if !seen_idat {
            log::warn!("png: IEND before any image data");
          } else if !self.scanlines.is_finished() {
            log::warn!("png: IEND before every scanline was decoded");
          }
          if src.skip(4) < 4 {
            log::warn!("png: data ends inside the IEND CRC");
          }
          return Ok(());
        }
        _ => skip_exact(src, len as usize)?,
      }
    }
  }

  /// Pulls one `IDAT` payload through inflate, unfiltering, and expansion.
  fn stream_idat<K>(&mut self, src: &mut S, len: usize, sink: &mut K) -> PngResult<()>
  where
    K: PixelSink + ?Sized,
  {
    let Self { read_buf, inflater, scanlines, expander, .. } = self;
    let inflater = inflater.as_mut().ok_or(PngError::InvalidState)?;
    let mut remaining = len;
    while remaining > 0 {
      if inflater.is_done() {
        log::trace!("png: skipping {remaining} IDAT bytes after the zlib stream");
        return skip_exact(src, remaining);
      }
      let n = remaining.min(read_buf.len());
      let buf = &mut read_buf[..n];
      read_exact(src, buf)?;
      remaining -= n;
      inflater.feed(buf, |out| {
        scanlines.push(out, |row, info| expander.expand_row(row, info, &mut *sink)).map(|_| ())
      })?;
    }
    Ok(())
  }
}

fn read_header<S: ByteSource>(src: &mut S) -> PngResult<PngHeader> {
  let mut block = [0_u8; MAGIC_BLOCK_LEN];
  read_exact(src, &mut block)?;
  PngHeader::try_from(ihdr_payload(&block)?)
}
