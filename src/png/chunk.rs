use super::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// PNG's own limit on a chunk's declared length.
pub(crate) const MAX_CHUNK_LEN: u32 = (1 << 31) - 1;

/// A chunk's four byte type tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tRNS: Self = Self(*b"tRNS");
}
impl Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}

/// The `length | type` pair at the front of every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChunkPrefix {
  pub(crate) len: u32,
  pub(crate) ty: ChunkType,
}
impl ChunkPrefix {
  pub(crate) fn from_bytes(bytes: [u8; 8]) -> PngResult<Self> {
    let [l0, l1, l2, l3, t0, t1, t2, t3] = bytes;
    let len = u32::from_be_bytes([l0, l1, l2, l3]);
    if len > MAX_CHUNK_LEN {
      return Err(PngError::UnsupportedChunk);
    }
    Ok(Self { len, ty: ChunkType([t0, t1, t2, t3]) })
  }
}

/// Bytes read by `prepare`: signature, IHDR prefix, IHDR payload.
pub(crate) const MAGIC_BLOCK_LEN: usize = 8 + 8 + IHDR_LEN;

/// Splits the opening block of a PNG into the IHDR payload.
///
/// The signature and the IHDR record prefix are fixed, so any mismatch in
/// them counts as a bad signature.
pub(crate) fn ihdr_payload(block: &[u8; MAGIC_BLOCK_LEN]) -> PngResult<&[u8]> {
  let (sig, rest) = block.split_at(8);
  if sig != PNG_SIGNATURE {
    return Err(PngError::InvalidSignature);
  }
  let (prefix, payload) = rest.split_at(8);
  let prefix = ChunkPrefix::from_bytes(prefix.try_into().map_err(|_| PngError::InvalidSignature)?)
    .map_err(|_| PngError::InvalidSignature)?;
  if prefix.ty != ChunkType::IHDR || prefix.len as usize != IHDR_LEN {
    return Err(PngError::InvalidSignature);
  }
  Ok(payload)
}

/// Checks if the PNG's initial 8 bytes are correct.
#[inline]
#[must_use]
pub const fn is_png_header_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}
