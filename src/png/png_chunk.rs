use core::fmt::Debug;

use super::*;

/// A typed, read-only view of a well-known chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub enum PngChunk<'b> {
  /// Image Header
  IHDR(IHDR),
  /// Palette
  PLTE(PLTE<'b>),
  /// Image Data
  IDAT(&'b [u8]),
  /// Image End
  IEND,
  /// Transparency
  tRNS(tRNS<'b>),
  /// Gamma value times 100,000.
  gAMA(u32),
  /// sRGB rendering intent
  sRGB(sRGBIntent),
  /// Physical pixel dimensions
  pHYs(pHYs),
  /// Latin-1 text
  tEXt(tEXt<'b>),
  /// Last modification time
  tIME(tIME),
}
impl<'b> TryFrom<&'b Chunk> for PngChunk<'b> {
  type Error = &'b Chunk;
  fn try_from(chunk: &'b Chunk) -> Result<Self, Self::Error> {
    let data = chunk.data();
    Ok(match chunk.ty() {
      ChunkType::IHDR => {
        // this can fail, so use `return` to avoid the outer Ok()
        return IHDR::try_from(data).map(PngChunk::IHDR).map_err(|_| chunk);
      }
      ChunkType::PLTE => match bytemuck::try_cast_slice::<u8, [u8; 3]>(data) {
        Ok(entries) if !entries.is_empty() && entries.len() <= 256 => {
          PngChunk::PLTE(PLTE(entries))
        }
        _ => return Err(chunk),
      },
      ChunkType::IDAT => PngChunk::IDAT(data),
      ChunkType::IEND => PngChunk::IEND,
      ChunkType::tRNS => PngChunk::tRNS(tRNS(data)),
      ChunkType::gAMA => match *data {
        [a, b, c, d] => PngChunk::gAMA(u32::from_be_bytes([a, b, c, d])),
        _ => return Err(chunk),
      },
      ChunkType::sRGB => PngChunk::sRGB(match data {
        [0] => sRGBIntent::Perceptual,
        [1] => sRGBIntent::RelativeColorimetric,
        [2] => sRGBIntent::Saturation,
        [3] => sRGBIntent::AbsoluteColorimetric,
        _ => return Err(chunk),
      }),
      ChunkType::pHYs => match *data {
        [x0, x1, x2, x3, y0, y1, y2, y3, unit @ (0 | 1)] => PngChunk::pHYs(pHYs {
          x: u32::from_be_bytes([x0, x1, x2, x3]),
          y: u32::from_be_bytes([y0, y1, y2, y3]),
          is_meters: unit == 1,
        }),
        _ => return Err(chunk),
      },
      ChunkType::tEXt => {
        let mut it = data.splitn(2, |u| *u == 0);
        match (it.next(), it.next()) {
          (Some(keyword), Some(text)) if (1..=79).contains(&keyword.len()) => {
            PngChunk::tEXt(tEXt { keyword, text })
          }
          _ => return Err(chunk),
        }
      }
      ChunkType::tIME => match *data {
        [y0, y1, month @ 1..=12, day @ 1..=31, hour @ 0..=23, minute @ 0..=59, second @ 0..=60] => {
          PngChunk::tIME(tIME { year: u16::from_be_bytes([y0, y1]), month, day, hour, minute, second })
        }
        _ => return Err(chunk),
      },
      _ => return Err(chunk),
    })
  }
}

/// Palette data
///
/// Palette entries are always `[r, g, b]`. A paletted image with transparency
/// puts the alpha values in a separate [`tRNS`] chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PLTE<'b>(&'b [[u8; 3]]);
impl<'b> PLTE<'b> {
  /// Gets the entries as a slice.
  #[inline]
  #[must_use]
  pub const fn entries(&self) -> &'b [[u8; 3]] {
    self.0
  }
}
impl Debug for PLTE<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // currently prints no more than 4 palette entries
    f.debug_tuple("PLTE").field(&&self.0[..self.0.len().min(4)]).field(&self.0.len()).finish()
  }
}

/// Transparency data
///
/// What the bytes mean depends on the image's color type, so this keeps the
/// bytes and offers a getter for each interpretation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct tRNS<'b>(&'b [u8]);
impl<'b> tRNS<'b> {
  /// Gets the grayscale value that is transparent.
  ///
  /// Fails when the chunk has the wrong length for grayscale.
  #[inline]
  #[must_use]
  pub const fn try_to_grayscale(&self) -> Option<u16> {
    match self.0 {
      [y0, y1] => Some(u16::from_be_bytes([*y0, *y1])),
      _ => None,
    }
  }
  /// Gets the RGB value that is transparent.
  ///
  /// Fails when the chunk has the wrong length for rgb.
  #[inline]
  #[must_use]
  pub const fn try_to_rgb(&self) -> Option<[u16; 3]> {
    match self.0 {
      [r0, r1, g0, g1, b0, b1] => Some([
        u16::from_be_bytes([*r0, *r1]),
        u16::from_be_bytes([*g0, *g1]),
        u16::from_be_bytes([*b0, *b1]),
      ]),
      _ => None,
    }
  }
  /// Gets the alpha values for each palette index.
  #[inline]
  #[must_use]
  pub const fn to_alphas(&self) -> &'b [u8] {
    self.0
  }
}
impl Debug for tRNS<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_tuple("tRNS").field(&&self.0[..self.0.len().min(12)]).field(&self.0.len()).finish()
  }
}

/// How an sRGB image should be mapped to a display's gamut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub enum sRGBIntent {
  Perceptual,
  RelativeColorimetric,
  Saturation,
  AbsoluteColorimetric,
}

/// Pixels per unit on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct pHYs {
  pub x: u32,
  pub y: u32,
  /// If false the unit is unknown and only the aspect ratio is meaningful.
  pub is_meters: bool,
}

/// A keyword and its Latin-1 text.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct tEXt<'b> {
  pub keyword: &'b [u8],
  pub text: &'b [u8],
}
impl Debug for tEXt<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // Latin-1 maps byte-for-byte onto the first 256 chars
    struct Latin1<'a>(&'a [u8]);
    impl Debug for Latin1<'_> {
      fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use core::fmt::Write;
        f.write_char('"')?;
        for ch in self.0.iter().copied().map(char::from) {
          f.write_char(ch)?;
        }
        f.write_char('"')
      }
    }
    f.debug_struct("tEXt")
      .field("keyword", &Latin1(self.keyword))
      .field("text", &Latin1(self.text))
      .finish()
  }
}

/// UTC time of the last image modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct tIME {
  pub year: u16,
  pub month: u8,
  pub day: u8,
  pub hour: u8,
  pub minute: u8,
  pub second: u8,
}
