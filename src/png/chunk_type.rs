use core::fmt::{self, Debug, Display, Write};

/// The 4-byte type tag of a PNG chunk.
///
/// Each byte should be an ASCII letter, and the case of each letter is a
/// property bit:
/// * **First byte:** uppercase for critical chunks, lowercase for ancillary
///   chunks.
/// * **Second byte:** uppercase for public chunks, lowercase for private
///   chunks.
/// * **Third byte:** reserved, must be uppercase.
/// * **Fourth byte:** uppercase if editors that don't understand the chunk
///   should drop it after changing critical chunks, lowercase if it's safe to
///   copy regardless.
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
  pub const gAMA: Self = Self(*b"gAMA");
  pub const sRGB: Self = Self(*b"sRGB");
  pub const pHYs: Self = Self(*b"pHYs");
  pub const tEXt: Self = Self(*b"tEXt");
  pub const tIME: Self = Self(*b"tIME");
}
impl ChunkType {
  /// All four bytes are ASCII letters and the reserved bit is clear.
  #[inline]
  #[must_use]
  pub const fn is_valid(self) -> bool {
    let [a, b, c, d] = self.0;
    a.is_ascii_alphabetic()
      && b.is_ascii_alphabetic()
      && c.is_ascii_uppercase()
      && d.is_ascii_alphabetic()
  }

  /// Critical chunks must be understood to display the image.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    self.0[0].is_ascii_uppercase()
  }

  /// Public chunks are defined by the PNG standard or registered extensions.
  #[inline]
  #[must_use]
  pub const fn is_public(self) -> bool {
    self.0[1].is_ascii_uppercase()
  }

  /// Safe-to-copy chunks can be kept even after critical data is edited.
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(self) -> bool {
    self.0[3].is_ascii_lowercase()
  }

  /// `IHDR` and `IEND` have fixed positions in a sequence.
  #[inline]
  #[must_use]
  pub const fn is_fixed(self) -> bool {
    matches!(self.0, [b'I', b'H', b'D', b'R'] | [b'I', b'E', b'N', b'D'])
  }
}
impl From<[u8; 4]> for ChunkType {
  #[inline]
  fn from(bytes: [u8; 4]) -> Self {
    Self(bytes)
  }
}
impl Debug for ChunkType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_char('"')?;
    Display::fmt(self, f)?;
    f.write_char('"')
  }
}
impl Display for ChunkType {
  /// Bytes are `as` cast to `char`, so non-ascii types still print (badly)
  /// without failing.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for ch in self.0.iter().copied().map(|u| u as char) {
      f.write_char(ch)?;
    }
    Ok(())
  }
}

#[test]
fn test_chunk_type_properties() {
  assert!(ChunkType::IHDR.is_valid());
  assert!(ChunkType::IHDR.is_critical());
  assert!(ChunkType::IHDR.is_public());
  assert!(!ChunkType::IHDR.is_safe_to_copy());
  assert!(ChunkType::IHDR.is_fixed());
  //
  assert!(!ChunkType::tEXt.is_critical());
  assert!(ChunkType::tEXt.is_safe_to_copy());
  assert!(!ChunkType::tEXt.is_fixed());
  //
  let private = ChunkType(*b"prVt");
  assert!(private.is_valid());
  assert!(!private.is_public());
  //
  assert!(!ChunkType(*b"ab1d").is_valid());
  assert!(!ChunkType(*b"abcd").is_valid(), "reserved bit set");
}
