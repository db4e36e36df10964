use core::fmt;

use crate::png::{ChunkId, ChunkType};

/// Shorthand for results with a [`PngError`].
pub type PngResult<T> = Result<T, PngError>;

/// An error from the `itch` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngError {
  /// The bytes (or the chunk data) don't form a valid PNG.
  Format(FormatError),

  /// No chunk matches the given id.
  NotFound(ChunkId),

  /// The edit would break the chunk sequence rules.
  Constraint(ConstraintError),

  /// The allocator couldn't give us enough space.
  Alloc,
}
impl From<FormatError> for PngError {
  #[inline]
  fn from(e: FormatError) -> Self {
    Self::Format(e)
  }
}
impl From<ConstraintError> for PngError {
  #[inline]
  fn from(e: ConstraintError) -> Self {
    Self::Constraint(e)
  }
}
impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
impl fmt::Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Format(e) => write!(f, "format error: {e}"),
      Self::NotFound(id) => write!(f, "no chunk matches {id}"),
      Self::Constraint(e) => write!(f, "edit rejected: {e}"),
      Self::Alloc => f.write_str("allocation failed"),
    }
  }
}
impl core::error::Error for PngError {}

/// Malformed or corrupt PNG data.
///
/// Offsets are byte offsets into the full input, counting the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
  /// Input is shorter than 8 bytes or doesn't start with the PNG signature.
  BadSignature,
  /// The chunk type bytes aren't all ASCII letters.
  InvalidChunkType { offset: usize, chunk_index: usize },
  /// The declared length is bigger than `2^31 - 1`.
  LengthTooLarge { offset: usize, chunk_index: usize, declared: u32 },
  /// The declared length (plus the CRC) runs past the end of the input.
  LengthPastEnd { offset: usize, chunk_index: usize, declared: u32, available: usize },
  /// The stored CRC doesn't match the CRC of the type and data.
  CrcMismatch { offset: usize, chunk_index: usize, ty: ChunkType, stored: u32, computed: u32 },
  /// There were no chunks at all.
  MissingHeader,
  /// The first chunk isn't `IHDR`.
  HeaderNotFirst { found: ChunkType },
  /// A second `IHDR` showed up.
  DuplicateHeader { chunk_index: usize },
  /// The `IHDR` data is invalid.
  MalformedHeader(IhdrError),
  /// Input ended before an `IEND` chunk.
  MissingTerminator,
  /// The `IEND` chunk has data in it.
  MalformedTerminator { chunk_index: usize, len: usize },
  /// Bytes remain after the `IEND` chunk.
  TrailingBytes { offset: usize, count: usize },
  /// There are no `IDAT` chunks to render.
  MissingImageData,
  /// An indexed color image has no `PLTE` chunk.
  MissingPalette,
  /// Zlib decompression failed. The value is the inflate status code.
  Decompression { status: i8 },
  /// Decompression gave fewer bytes than the header requires.
  ImageDataTooShort { expected: usize, actual: usize },
  /// A scanline has a filter type other than 0 through 4.
  InvalidFilterType { pass: usize, row: u32, filter: u8 },
  /// The image is bigger than the render limits allow.
  ImageTooLarge { width: u32, height: u32 },
}
impl fmt::Display for FormatError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Self::BadSignature => f.write_str("missing or incorrect PNG signature"),
      Self::InvalidChunkType { offset, chunk_index } => {
        write!(f, "chunk {chunk_index} at offset {offset} has an invalid type")
      }
      Self::LengthTooLarge { offset, chunk_index, declared } => write!(
        f,
        "chunk {chunk_index} at offset {offset} declares length {declared}, above 2^31-1"
      ),
      Self::LengthPastEnd { offset, chunk_index, declared, available } => write!(
        f,
        "chunk {chunk_index} at offset {offset} declares length {declared} but only {available} bytes remain"
      ),
      Self::CrcMismatch { offset, chunk_index, ty, stored, computed } => write!(
        f,
        "chunk {chunk_index} ({ty}) at offset {offset}: stored CRC {stored:#010X}, computed {computed:#010X}"
      ),
      Self::MissingHeader => f.write_str("no IHDR chunk"),
      Self::HeaderNotFirst { found } => write!(f, "first chunk is {found}, expected IHDR"),
      Self::DuplicateHeader { chunk_index } => write!(f, "extra IHDR at chunk {chunk_index}"),
      Self::MalformedHeader(e) => write!(f, "malformed IHDR: {e}"),
      Self::MissingTerminator => f.write_str("missing IEND chunk"),
      Self::MalformedTerminator { chunk_index, len } => {
        write!(f, "IEND at chunk {chunk_index} has {len} data bytes")
      }
      Self::TrailingBytes { offset, count } => {
        write!(f, "{count} bytes after IEND at offset {offset}")
      }
      Self::MissingImageData => f.write_str("no IDAT chunks"),
      Self::MissingPalette => f.write_str("indexed color image without PLTE"),
      Self::Decompression { status } => write!(f, "zlib decompression failed (status {status})"),
      Self::ImageDataTooShort { expected, actual } => {
        write!(f, "decompressed {actual} bytes of image data, expected {expected}")
      }
      Self::InvalidFilterType { pass, row, filter } => {
        write!(f, "filter type {filter} on row {row} of pass {pass}")
      }
      Self::ImageTooLarge { width, height } => {
        write!(f, "{width}x{height} is beyond the render limits")
      }
    }
  }
}

/// Why some bytes aren't a valid `IHDR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IhdrError {
  /// `IHDR` data is always exactly 13 bytes.
  WrongLength(usize),
  /// Width or height is 0.
  ZeroDimension,
  /// Width or height is above `2^31 - 1`.
  DimensionTooLarge,
  /// Not one of the five PNG color types.
  BadColorType(u8),
  /// The bit depth isn't allowed with this color type.
  BadBitDepth { color_type: u8, bit_depth: u8 },
  /// Only compression method 0 exists.
  BadCompressionMethod(u8),
  /// Only filter method 0 exists.
  BadFilterMethod(u8),
  /// Interlace method must be 0 or 1.
  BadInterlaceMethod(u8),
}
impl fmt::Display for IhdrError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Self::WrongLength(len) => write!(f, "length {len}, expected 13"),
      Self::ZeroDimension => f.write_str("width or height is zero"),
      Self::DimensionTooLarge => f.write_str("width or height is above 2^31-1"),
      Self::BadColorType(c) => write!(f, "unknown color type {c}"),
      Self::BadBitDepth { color_type, bit_depth } => {
        write!(f, "bit depth {bit_depth} is not allowed for color type {color_type}")
      }
      Self::BadCompressionMethod(m) => write!(f, "unknown compression method {m}"),
      Self::BadFilterMethod(m) => write!(f, "unknown filter method {m}"),
      Self::BadInterlaceMethod(m) => write!(f, "unknown interlace method {m}"),
    }
  }
}

/// An edit that would break the rules of a chunk sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintError {
  /// Replacement `IHDR` data isn't a valid header.
  InvalidHeader(IhdrError),
  /// `IEND` must stay empty.
  TerminatorNotEmpty { len: usize },
  /// Chunk data can't be longer than `2^31 - 1` bytes.
  DataTooLong { len: usize },
  /// The chunk type bytes aren't all ASCII letters.
  InvalidChunkType(ChunkType),
  /// `IHDR` and `IEND` can't be inserted or removed.
  FixedChunk(ChunkType),
  /// Chunks can only be inserted between `IHDR` and `IEND`.
  OutsideFixedChunks { index: usize },
}
impl fmt::Display for ConstraintError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Self::InvalidHeader(e) => write!(f, "invalid IHDR data: {e}"),
      Self::TerminatorNotEmpty { len } => write!(f, "IEND must be empty, got {len} bytes"),
      Self::DataTooLong { len } => write!(f, "{len} bytes is above the 2^31-1 chunk limit"),
      Self::InvalidChunkType(ty) => write!(f, "{ty:?} is not a valid chunk type"),
      Self::FixedChunk(ty) => write!(f, "{ty} can't be inserted or removed"),
      Self::OutsideFixedChunks { index } => {
        write!(f, "index {index} is not between IHDR and IEND")
      }
    }
  }
}
