use core::fmt::{self, Debug, Display};
use core::hash::{Hash, Hasher};

use alloc::vec::Vec;

use super::*;

/// Longest data a chunk is allowed to hold.
pub const MAX_CHUNK_LEN: usize = (1 << 31) - 1;

/// An owned PNG chunk.
///
/// The length is always the length of `data`, so it isn't stored. The CRC
/// that the chunk was read with is kept around so that a stale or corrupt
/// value can be shown to the user, but it's never trusted when writing:
/// encoding always recomputes it.
///
/// Two chunks are equal when their type and data are, the declared CRC is
/// left out of comparisons and hashing.
#[derive(Clone)]
pub struct Chunk {
  ty: ChunkType,
  data: Vec<u8>,
  declared_crc: u32,
}
impl Chunk {
  /// Makes a new chunk with a correct CRC.
  ///
  /// ## Failure
  /// * The type isn't valid.
  /// * The data is longer than [`MAX_CHUNK_LEN`].
  pub fn new(ty: ChunkType, data: Vec<u8>) -> Result<Self, ConstraintError> {
    if !ty.is_valid() {
      return Err(ConstraintError::InvalidChunkType(ty));
    }
    if data.len() > MAX_CHUNK_LEN {
      return Err(ConstraintError::DataTooLong { len: data.len() });
    }
    let declared_crc = chunk_crc(ty.0, &data);
    Ok(Self { ty, data, declared_crc })
  }

  /// Builds a chunk from already checked parts.
  #[inline]
  pub(crate) fn from_checked_parts(ty: ChunkType, data: Vec<u8>, declared_crc: u32) -> Self {
    Self { ty, data, declared_crc }
  }

  #[inline]
  #[must_use]
  pub const fn ty(&self) -> ChunkType {
    self.ty
  }
  #[inline]
  #[must_use]
  pub fn data(&self) -> &[u8] {
    &self.data
  }
  /// The length field that this chunk will be written with.
  #[inline]
  #[must_use]
  pub fn len(&self) -> u32 {
    // data can't be longer than MAX_CHUNK_LEN
    self.data.len() as u32
  }
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }
  /// The CRC this chunk was read or last written with.
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }
  /// The CRC that the type and data actually have.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    chunk_crc(self.ty.0, &self.data)
  }
  /// If the declared CRC doesn't match the contents.
  #[inline]
  #[must_use]
  pub fn has_stale_crc(&self) -> bool {
    self.declared_crc != self.actual_crc()
  }

  /// Swaps in new data and updates the CRC to match.
  pub(crate) fn replace_data(&mut self, data: Vec<u8>) -> Vec<u8> {
    let old = core::mem::replace(&mut self.data, data);
    self.declared_crc = self.actual_crc();
    old
  }

  /// Mutable access to the data.
  ///
  /// This deliberately leaves the declared CRC alone, so after any change
  /// [`has_stale_crc`](Self::has_stale_crc) reports it. Encoding still writes
  /// a correct CRC.
  #[inline]
  pub fn data_mut(&mut self) -> &mut [u8] {
    &mut self.data
  }

  /// Appends the length, type, data, and a freshly computed CRC.
  pub fn write_to(&self, out: &mut Vec<u8>) {
    let crc = self.actual_crc();
    if crc != self.declared_crc {
      log::warn!(
        "{} chunk had stale CRC {:#010X}, writing {:#010X}",
        self.ty,
        self.declared_crc,
        crc
      );
    }
    out.extend_from_slice(&self.len().to_be_bytes());
    out.extend_from_slice(&self.ty.0);
    out.extend_from_slice(&self.data);
    out.extend_from_slice(&crc.to_be_bytes());
  }

  /// Bytes needed by [`write_to`](Self::write_to).
  #[inline]
  #[must_use]
  pub fn encoded_len(&self) -> usize {
    12 + self.data.len()
  }
}
impl Debug for Chunk {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Chunk")
      .field("ty", &self.ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl PartialEq for Chunk {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.ty == other.ty && self.data == other.data
  }
}
impl Eq for Chunk {}
impl Hash for Chunk {
  #[inline]
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.ty.hash(state);
    self.data.hash(state);
  }
}
impl<'b> TryFrom<RawPngChunk<'b>> for Chunk {
  type Error = ConstraintError;
  /// Same checks as [`Chunk::new`], but the declared CRC is kept as read.
  #[inline]
  fn try_from(raw: RawPngChunk<'b>) -> Result<Self, Self::Error> {
    let mut chunk = Self::new(raw.ty, raw.data.to_vec())?;
    chunk.declared_crc = raw.declared_crc;
    Ok(chunk)
  }
}

/// Names a chunk within a [`ChunkSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChunkId {
  /// The chunk at this position (0 is always `IHDR`).
  Index(usize),
  /// The `n`th (0-based) chunk of this type, eg: the second `tEXt`.
  Nth(ChunkType, usize),
}
impl ChunkId {
  /// The first chunk of a type.
  #[inline]
  #[must_use]
  pub const fn first(ty: ChunkType) -> Self {
    Self::Nth(ty, 0)
  }
}
impl From<usize> for ChunkId {
  #[inline]
  fn from(index: usize) -> Self {
    Self::Index(index)
  }
}
impl Display for ChunkId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Index(i) => write!(f, "chunk index {i}"),
      Self::Nth(ty, n) => write!(f, "{ty} #{n}"),
    }
  }
}

#[test]
fn test_chunk_new_and_stale_crc() {
  let mut c = Chunk::new(ChunkType::tEXt, b"Title\0itch".to_vec()).unwrap();
  assert!(!c.has_stale_crc());
  assert_eq!(c.len(), 10);
  c.data_mut()[0] = b't';
  assert!(c.has_stale_crc());
  let mut out = Vec::new();
  c.write_to(&mut out);
  assert_eq!(out.len(), c.encoded_len());
  assert_eq!(&out[out.len() - 4..], &c.actual_crc().to_be_bytes());
  //
  assert_eq!(
    Chunk::new(ChunkType(*b"a1cd"), Vec::new()),
    Err(ConstraintError::InvalidChunkType(ChunkType(*b"a1cd")))
  );
}

#[test]
fn test_chunk_from_raw_is_checked() {
  let raw = RawPngChunk { ty: ChunkType(*b"a1_d"), data: &[1, 2], declared_crc: 0 };
  assert_eq!(Chunk::try_from(raw), Err(ConstraintError::InvalidChunkType(ChunkType(*b"a1_d"))));
  //
  let raw = RawPngChunk { ty: ChunkType::tEXt, data: b"a\0b", declared_crc: 5 };
  let chunk = Chunk::try_from(raw).unwrap();
  assert_eq!(chunk.declared_crc(), 5);
  assert!(chunk.has_stale_crc());
  // equality ignores the declared CRC
  assert_eq!(chunk, Chunk::new(ChunkType::tEXt, b"a\0b".to_vec()).unwrap());
}
