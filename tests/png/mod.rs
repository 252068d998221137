use stream_png::*;
use walkdir::WalkDir;

use builder::*;

/// Every draw call, in order.
type DrawLog = Vec<(u32, u32, u32, Vec<ARGB8888>)>;

fn decode_log(png: &[u8], config: DecoderConfig) -> (PngResult<()>, DrawLog) {
  let mut log = Vec::new();
  let mut decoder = PngDecoder::with_config(config);
  if let Err(e) = decoder.prepare(png) {
    return (Err(e), log);
  }
  let result = decoder.decomp(&mut |x: u32, y: u32, x_step: u32, px: &[ARGB8888]| {
    log.push((x, y, x_step, px.to_vec()))
  });
  (result, log)
}

/// Places every drawn pixel, failing on anything drawn twice or out of bounds.
fn place(width: u32, height: u32, log: &DrawLog) -> Vec<Option<ARGB8888>> {
  let mut image = vec![None; (width * height) as usize];
  for (x, y, x_step, px) in log {
    assert!(*y < height);
    for (i, p) in px.iter().enumerate() {
      let x = x + i as u32 * x_step;
      assert!(x < width);
      let slot = &mut image[(y * width + x) as usize];
      assert!(slot.is_none(), "({x},{y}) drawn twice");
      *slot = Some(*p);
    }
  }
  image
}

/// What a pixel with these samples should decode to.
fn expected(color_type: u8, depth: u8, s: &[u16], palette: &[ARGB8888]) -> ARGB8888 {
  let to8 = |v: u16| -> u8 {
    match depth {
      16 => (v >> 8) as u8,
      8 => v as u8,
      d => bitfrob::u8_replicate_bits(d as u32, v as u8),
    }
  };
  match color_type {
    0 => {
      let y = to8(s[0]);
      ARGB8888::opaque(y, y, y)
    }
    2 => ARGB8888::opaque(to8(s[0]), to8(s[1]), to8(s[2])),
    3 => palette.get(s[0] as usize).copied().unwrap_or(ARGB8888::OUT_OF_RANGE),
    4 => {
      let y = to8(s[0]);
      ARGB8888 { a: to8(s[1]), r: y, g: y, b: y }
    }
    6 => ARGB8888 { a: to8(s[3]), r: to8(s[0]), g: to8(s[1]), b: to8(s[2]) },
    _ => unreachable!(),
  }
}

fn noise_samples(color_type: u8, depth: u8) -> impl Fn(u32, u32) -> Vec<u16> {
  let mask = if depth == 16 { u16::MAX } else { (1_u16 << depth) - 1 };
  move |x, y| {
    (0..channels(color_type) as u32)
      .map(|c| {
        let mut h = x.wrapping_mul(0x9E37_79B9) ^ y.wrapping_mul(0x85EB_CA6B) ^ c.wrapping_mul(0xC2B2_AE35);
        h ^= h >> 15;
        h = h.wrapping_mul(0x2C1B_3C6D);
        h ^= h >> 12;
        (h as u16) & mask
      })
      .collect()
  }
}

fn palette_of(len: usize) -> (Vec<u8>, Vec<ARGB8888>) {
  let mut bytes = Vec::new();
  let mut colors = Vec::new();
  for i in 0..len {
    let (r, g, b) = ((i * 3) as u8, (i * 7 + 1) as u8, (255 - i) as u8);
    bytes.extend_from_slice(&[r, g, b]);
    colors.push(ARGB8888::opaque(r, g, b));
  }
  (bytes, colors)
}

#[test]
fn test_every_format_draws_each_pixel_once() {
  let formats: &[(u8, &[u8])] =
    &[(0, &[1, 2, 4, 8, 16]), (2, &[8, 16]), (3, &[1, 2, 4, 8]), (4, &[8, 16]), (6, &[8, 16])];
  for &(color_type, depths) in formats {
    for &depth in depths {
      for (width, height) in [(1, 1), (5, 3), (9, 10), (17, 2), (3, 33)] {
        for interlaced in [false, true] {
          let samples = noise_samples(color_type, depth);
          let mut png = TestPng::new(width, height, depth, color_type, &samples);
          png.interlaced = interlaced;
          let mut palette = Vec::new();
          if color_type == 3 {
            // one entry short of full, to also hit out of range indexes
            let (bytes, colors) = palette_of((1 << depth) - 1);
            png.before_idat.push((*b"PLTE", bytes));
            palette = colors;
          }
          let (result, log) = decode_log(&png.build(), DecoderConfig::default());
          let what = format!("type {color_type}, depth {depth}, {width}x{height}, interlaced {interlaced}");
          assert_eq!(result, Ok(()), "{what}");
          let image = place(width, height, &log);
          for y in 0..height {
            for x in 0..width {
              let got = image[(y * width + x) as usize];
              let want = expected(color_type, depth, &samples(x, y), &palette);
              assert_eq!(got, Some(want), "{what} at ({x},{y})");
            }
          }
        }
      }
    }
  }
}

#[test]
fn test_single_red_pixel() {
  let samples = |_: u32, _: u32| -> Vec<u16> { vec![255, 0, 0] };
  let png = TestPng::new(1, 1, 8, 2, &samples).build();
  let (result, log) = decode_log(&png, DecoderConfig::default());
  assert_eq!(result, Ok(()));
  assert_eq!(log.len(), 1);
  let (x, y, x_step, px) = &log[0];
  assert_eq!((*x, *y, *x_step), (0, 0, 1));
  assert_eq!(pixels_as_bytes(px), &[0xFF, 0xFF, 0x00, 0x00]);
}

#[test]
fn test_one_bit_checkerboard() {
  let samples = |x: u32, y: u32| -> Vec<u16> { vec![((x + y) % 2) as u16] };
  let png = TestPng::new(11, 6, 1, 0, &samples).build();
  let image = decode_png_bytes(&png).unwrap();
  for y in 0..6 {
    for x in 0..11 {
      let p = image.get(x, y).unwrap();
      let v = if (x + y) % 2 == 1 { 0xFF } else { 0 };
      assert_eq!(p, ARGB8888 { a: 0xFF, r: v, g: v, b: v }, "({x},{y})");
    }
  }
}

#[test]
fn test_indexed_with_short_trns() {
  let samples = |x: u32, _: u32| -> Vec<u16> { vec![(x % 4) as u16] };
  let mut png = TestPng::new(4, 2, 2, 3, &samples);
  let (bytes, _) = palette_of(4);
  png.before_idat.push((*b"PLTE", bytes));
  png.before_idat.push((*b"tRNS", vec![0x80, 0]));
  let image = decode_png_bytes(&png.build()).unwrap();
  let alphas: Vec<u8> = (0..4).map(|x| image.get(x, 1).unwrap().a).collect();
  assert_eq!(alphas, [0x80, 0, 0xFF, 0xFF]);
  assert_eq!(image.get(2, 0).unwrap().r, 6);
}

#[test]
fn test_indexed_without_palette() {
  let samples = |_: u32, _: u32| -> Vec<u16> { vec![1] };
  let png = TestPng::new(3, 3, 8, 3, &samples).build();
  let image = decode_png_bytes(&png).unwrap();
  assert!(image.pixels.iter().all(|p| *p == ARGB8888::OUT_OF_RANGE));
}

#[test]
fn test_gray_and_rgb_keys() {
  let samples = |x: u32, _: u32| -> Vec<u16> { vec![x as u16] };
  let mut png = TestPng::new(4, 1, 2, 0, &samples);
  png.before_idat.push((*b"tRNS", vec![0, 2]));
  let image = decode_png_bytes(&png.build()).unwrap();
  let alphas: Vec<u8> = image.pixels.iter().map(|p| p.a).collect();
  assert_eq!(alphas, [0xFF, 0xFF, 0, 0xFF]);

  let samples = |x: u32, _: u32| -> Vec<u16> { vec![x as u16, 5, 6] };
  let mut png = TestPng::new(3, 1, 8, 2, &samples);
  png.before_idat.push((*b"tRNS", vec![0, 1, 0, 5, 0, 6]));
  let image = decode_png_bytes(&png.build()).unwrap();
  let alphas: Vec<u8> = image.pixels.iter().map(|p| p.a).collect();
  assert_eq!(alphas, [0xFF, 0, 0xFF]);
}

#[test]
fn test_adam7_eight_by_eight() {
  let samples = |x: u32, y: u32| -> Vec<u16> { vec![x as u16 * 30, y as u16 * 30, 7] };
  let mut png = TestPng::new(8, 8, 8, 2, &samples);
  png.interlaced = true;
  let (result, log) = decode_log(&png.build(), DecoderConfig::default());
  assert_eq!(result, Ok(()));
  let image = place(8, 8, &log);
  assert!(image.iter().all(|p| p.is_some()));
  assert_eq!(log.iter().map(|(.., px)| px.len()).sum::<usize>(), 64);
  // the first pass is just the top left pixel
  assert_eq!(log[0].0, 0);
  assert_eq!(log[0].1, 0);
  assert_eq!(log[0].2, 8);
  assert_eq!(log[0].3.len(), 1);
  for (x, y, x_step, px) in &log {
    let pass = pass_of(*x, *y);
    assert_eq!(*x_step, [8, 8, 4, 4, 2, 2, 1][pass]);
    for (i, p) in px.iter().enumerate() {
      let x = x + i as u32 * x_step;
      assert_eq!(*p, ARGB8888::opaque(x as u8 * 30, *y as u8 * 30, 7));
    }
  }
}

/// Which Adam7 pass the pixel at `(x, y)` belongs to.
fn pass_of(x: u32, y: u32) -> usize {
  const GRID: [[u8; 8]; 8] = [
    [1, 6, 4, 6, 2, 6, 4, 6],
    [7, 7, 7, 7, 7, 7, 7, 7],
    [5, 6, 5, 6, 5, 6, 5, 6],
    [7, 7, 7, 7, 7, 7, 7, 7],
    [3, 6, 4, 6, 3, 6, 4, 6],
    [7, 7, 7, 7, 7, 7, 7, 7],
    [5, 6, 5, 6, 5, 6, 5, 6],
    [7, 7, 7, 7, 7, 7, 7, 7],
  ];
  GRID[(y % 8) as usize][(x % 8) as usize] as usize - 1
}

#[test]
fn test_read_granularity_does_not_change_output() {
  let samples = noise_samples(6, 8);
  let mut png = TestPng::new(37, 19, 8, 6, &samples);
  png.interlaced = true;
  let big = png.build();
  png.idat_split = 1;
  let tiny_idats = png.build();

  let (result, reference) = decode_log(&big, DecoderConfig::default());
  assert_eq!(result, Ok(()));
  for (png, read_buffer_len) in [(&big, 1), (&big, 3), (&tiny_idats, 1), (&tiny_idats, 4096)] {
    let config = DecoderConfig { read_buffer_len, ..DecoderConfig::default() };
    let (result, log) = decode_log(png, config);
    assert_eq!(result, Ok(()));
    assert_eq!(log, reference, "read_buffer_len {read_buffer_len}");
  }

  // a callback source that only ever moves one byte per step internally
  let mut pos = 0;
  let source = ReadFn(|target: Option<&mut [u8]>, len: usize| {
    let mut done = 0;
    let mut target = target;
    while done < len && pos < big.len() {
      if let Some(buf) = target.as_deref_mut() {
        buf[done] = big[pos];
      }
      done += 1;
      pos += 1;
    }
    done
  });
  let mut decoder = PngDecoder::new();
  decoder.prepare(source).unwrap();
  let mut log = Vec::new();
  decoder
    .decomp(&mut |x: u32, y: u32, x_step: u32, px: &[ARGB8888]| log.push((x, y, x_step, px.to_vec())))
    .unwrap();
  assert_eq!(log, reference);
}

#[test]
fn test_io_source() {
  let samples = noise_samples(4, 16);
  let png = TestPng::new(6, 5, 16, 4, &samples).build();
  let mut decoder = PngDecoder::new();
  decoder.prepare(IoSource(std::io::Cursor::new(png.clone()))).unwrap();
  let mut image = ArgbImage::try_new(decoder.width(), decoder.height()).unwrap();
  decoder.decomp(&mut image).unwrap();
  assert_eq!(image, decode_png_bytes(&png).unwrap());
}

#[test]
fn test_malformed_input_draws_nothing() {
  let samples = |_: u32, _: u32| -> Vec<u16> { vec![1, 2, 3] };
  let good = TestPng::new(2, 2, 8, 2, &samples);

  let mut bad_signature = good.build();
  bad_signature[0] = 0x88;
  let (result, log) = decode_log(&bad_signature, DecoderConfig::default());
  assert_eq!(result, Err(PngError::InvalidSignature));
  assert!(log.is_empty());

  // IHDR compression and filter methods sit at 16 + 10 and 16 + 11
  for offset in [26, 27] {
    let mut bad_header = good.build();
    bad_header[offset] = 1;
    let (result, log) = decode_log(&bad_header, DecoderConfig::default());
    assert_eq!(result, Err(PngError::InvalidHeader));
    assert!(log.is_empty());
  }

  let mut png = TestPng::new(2, 2, 8, 2, &samples);
  png.before_idat.push((*b"PLTE", vec![0; 4]));
  let (result, log) = decode_log(&png.build(), DecoderConfig::default());
  assert_eq!(result, Err(PngError::UnsupportedChunk));
  assert!(log.is_empty());

  let mut png = TestPng::new(2, 2, 8, 2, &samples);
  png.before_idat.push((*b"tRNS", vec![0; 2]));
  let (result, log) = decode_log(&png.build(), DecoderConfig::default());
  assert_eq!(result, Err(PngError::UnsupportedChunk));
  assert!(log.is_empty());

  let gray = |_: u32, _: u32| -> Vec<u16> { vec![1] };
  let mut png = TestPng::new(2, 2, 8, 0, &gray);
  png.before_idat.push((*b"tRNS", vec![0; 6]));
  let (result, log) = decode_log(&png.build(), DecoderConfig::default());
  assert_eq!(result, Err(PngError::UnsupportedChunk));
  assert!(log.is_empty());
}

#[test]
fn test_bad_image_data() {
  let samples = |_: u32, _: u32| -> Vec<u16> { vec![9] };
  let png = TestPng::new(3, 3, 8, 0, &samples);

  let mut data = png.filtered_data();
  // second row's filter byte
  data[4] = 5;
  let zlib = miniz_oxide::deflate::compress_to_vec_zlib(&data, 6);
  let (result, log) = decode_log(&png.build_with_zlib(&zlib), DecoderConfig::default());
  assert_eq!(result, Err(PngError::InvalidFilterType));
  // the first row was already out
  assert_eq!(log.iter().map(|(.., px)| px.len()).sum::<usize>(), 3);

  let (result, log) = decode_log(&png.build_with_zlib(&[0x78, 0x9C, 0xFF, 0xFF, 0xFF]), DecoderConfig::default());
  assert_eq!(result, Err(PngError::DecompressionFailure));
  assert!(log.is_empty());

  let full = png.build();
  let (result, _) = decode_log(&full[..full.len() - 30], DecoderConfig::default());
  assert_eq!(result, Err(PngError::TruncatedInput));
}

#[test]
fn test_decode_never_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    let _ = decode_png_bytes(&v);
  }
  // even totally random data should never panic the decoder!
  let samples = noise_samples(2, 8);
  let valid = TestPng::new(13, 7, 8, 2, &samples).build();
  for _ in 0..200 {
    let _ = decode_png_bytes(&super::rand_bytes(1024));
    // a valid opening makes the garbage reach the chunk loop
    let mut v = valid[..33].to_vec();
    v.extend(super::rand_bytes(512));
    let _ = decode_png_bytes(&v);
    // and flipping bytes in a valid file reaches the deeper stages
    let mut v = valid.clone();
    for r in super::rand_bytes(4).chunks(2) {
      let i = 33 + (r[0] as usize % (v.len() - 33));
      v[i] ^= r[1];
    }
    let _ = decode_png_bytes(&v);
  }
}
