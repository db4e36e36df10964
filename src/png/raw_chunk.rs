use core::fmt::Debug;

use super::*;

/// An unvalidated chunk borrowed from PNG bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawPngChunk<'b> {
  pub ty: ChunkType,
  pub data: &'b [u8],
  pub declared_crc: u32,
}
impl RawPngChunk<'_> {
  /// The CRC that the type and data actually have.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    chunk_crc(self.ty.0, self.data)
  }
}
impl Debug for RawPngChunk<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawPngChunk")
      .field("ty", &self.ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// This is the lenient path: nothing is checked, and the iterator just stops
/// at the first chunk that doesn't fit in the remaining bytes. It never panics
/// on any input. Use [`ChunkSequence::decode`] when you want validation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RawPngChunkIter<'b>(&'b [u8]);
impl<'b> RawPngChunkIter<'b> {
  /// Pass the full PNG bytes, the 8 signature bytes are skipped without
  /// being checked.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self(rest),
      _ => Self(&[]),
    }
  }
}
impl<'b> Iterator for RawPngChunkIter<'b> {
  type Item = RawPngChunk<'b>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    let (len_bytes, rest) = split_array::<4>(self.0)?;
    let (ty_bytes, rest) = split_array::<4>(rest)?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    if rest.len() < len {
      self.0 = &[];
      return None;
    }
    let (data, rest) = rest.split_at(len);
    let Some((crc_bytes, rest)) = split_array::<4>(rest) else {
      self.0 = &[];
      return None;
    };
    self.0 = rest;
    Some(RawPngChunk {
      ty: ChunkType(ty_bytes),
      data,
      declared_crc: u32::from_be_bytes(crc_bytes),
    })
  }
}

/// Splits `N` bytes off the front, if there's that many.
#[inline]
pub(crate) fn split_array<const N: usize>(bytes: &[u8]) -> Option<([u8; N], &[u8])> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let a: [u8; N] = head.try_into().ok()?;
    Some((a, tail))
  } else {
    None
  }
}

#[test]
fn test_raw_chunk_iter_stops_on_short_data() {
  let mut bytes = alloc::vec::Vec::from(PNG_SIGNATURE);
  bytes.extend_from_slice(&[0, 0, 0, 0]);
  bytes.extend_from_slice(b"IEND");
  bytes.extend_from_slice(&0xAE42_6082_u32.to_be_bytes());
  let chunks: alloc::vec::Vec<_> = RawPngChunkIter::new(&bytes).collect();
  assert_eq!(chunks.len(), 1);
  assert_eq!(chunks[0].ty, ChunkType::IEND);
  assert_eq!(chunks[0].declared_crc, chunks[0].actual_crc());
  //
  assert_eq!(RawPngChunkIter::new(&bytes[..bytes.len() - 1]).count(), 0);
  assert_eq!(RawPngChunkIter::new(&bytes[..5]).count(), 0);
}
