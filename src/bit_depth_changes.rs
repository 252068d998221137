/// The multiplier that brings a low bit depth sample up to the 8-bit range.
///
/// The expansion is `(sample * magnification(depth)) >> depth`, which gives
/// the same result as copying the sample's bit pattern down through the byte
/// (so a 2-bit `0b10` becomes `0b10101010`). Samples that are already 8 bits
/// get `0x100`, which makes the expansion a no-op.
#[inline]
#[must_use]
pub const fn magnification(depth: u8) -> u32 {
  match depth {
    1 => 0x1FF,
    2 => 0x155,
    4 => 0x111,
    _ => 0x100,
  }
}

/// Expands a sample of `depth` bits (1, 2, 4, or 8) to 8 bits.
///
/// Uses the precomputed `magni` from [`magnification`].
#[inline]
#[must_use]
pub const fn expand_sample(sample: u32, magni: u32, depth: u8) -> u8 {
  ((sample * magni) >> depth) as u8
}

#[test]
fn test_expand_sample_hits_full_range() {
  for depth in [1_u8, 2, 4, 8] {
    let max = (1_u32 << depth) - 1;
    let magni = magnification(depth);
    assert_eq!(expand_sample(0, magni, depth), 0, "depth {depth}");
    assert_eq!(expand_sample(max, magni, depth), 0xFF, "depth {depth}");
  }
  assert_eq!(expand_sample(0b10, magnification(2), 2), 0b1010_1010);
  assert_eq!(expand_sample(0x7, magnification(4), 4), 0x77);
  assert_eq!(expand_sample(0x42, magnification(8), 8), 0x42);
}
