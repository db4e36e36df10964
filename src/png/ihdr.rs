use super::*;

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }

  /// If this color type can be stored at the given bit depth.
  #[inline]
  #[must_use]
  pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
    match self {
      Self::Y => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
      Self::Index => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::RGB | Self::YA | Self::RGBA => matches!(bit_depth, 8 | 16),
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = IhdrError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      other => return Err(IhdrError::BadColorType(other)),
    })
  }
}

/// Image Header
///
/// Only compression method 0 and filter method 0 exist, so they aren't
/// stored: parsing rejects anything else and [`IHDR::to_bytes`] writes zeroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// if the image data is stored with Adam7 interlacing.
  pub is_interlaced: bool,
}
impl IHDR {
  /// Largest width or height allowed.
  pub const MAX_DIMENSION: u32 = (1 << 31) - 1;

  /// Checks the fields against each other.
  pub fn validate(&self) -> Result<(), IhdrError> {
    if self.width == 0 || self.height == 0 {
      return Err(IhdrError::ZeroDimension);
    }
    if self.width > Self::MAX_DIMENSION || self.height > Self::MAX_DIMENSION {
      return Err(IhdrError::DimensionTooLarge);
    }
    if !self.color_type.allows_bit_depth(self.bit_depth) {
      return Err(IhdrError::BadBitDepth {
        color_type: self.color_type as u8,
        bit_depth: self.bit_depth,
      });
    }
    Ok(())
  }

  /// The 13 data bytes of an `IHDR` chunk.
  #[inline]
  #[must_use]
  pub fn to_bytes(&self) -> [u8; 13] {
    let [w0, w1, w2, w3] = self.width.to_be_bytes();
    let [h0, h1, h2, h3] = self.height.to_be_bytes();
    [
      w0,
      w1,
      w2,
      w3,
      h0,
      h1,
      h2,
      h3,
      self.bit_depth,
      self.color_type as u8,
      0,
      0,
      self.is_interlaced as u8,
    ]
  }

  /// Bits used by a single pixel.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// The distance, in bytes, that the filters look back for the "left" value.
  ///
  /// This is the bytes per pixel, rounded up to at least 1.
  #[inline]
  #[must_use]
  pub const fn filter_unit(&self) -> usize {
    let bytes = self.bits_per_pixel() / 8;
    if bytes == 0 {
      1
    } else {
      bytes
    }
  }

  /// Bytes of one filtered line of `width` pixels: one filter type byte plus
  /// the pixel bytes, rounded up.
  #[inline]
  #[must_use]
  pub fn bytes_per_filterline(&self, width: u32) -> usize {
    if width == 0 {
      return 0;
    }
    let bits_per_line = self.bits_per_pixel().saturating_mul(width as usize);
    bits_per_line.div_ceil(8).saturating_add(1)
  }

  /// Gets the buffer size required to hold the inflated image data.
  ///
  /// Interlaced images store each non-empty reduced image one after the
  /// other, so their requirement is the sum over all 7 passes.
  #[must_use]
  pub fn get_zlib_decompression_requirement(&self) -> usize {
    let bytes_for = |w: u32, h: u32| -> usize {
      if h == 0 {
        0
      } else {
        self.bytes_per_filterline(w).saturating_mul(h as usize)
      }
    };
    if self.is_interlaced {
      reduced_image_dimensions(self.width, self.height)[1..]
        .iter()
        .fold(0_usize, |total, &(w, h)| total.saturating_add(bytes_for(w, h)))
    } else {
      bytes_for(self.width, self.height)
    }
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = IhdrError;
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match *value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =>
      {
        if compression_method != 0 {
          return Err(IhdrError::BadCompressionMethod(compression_method));
        }
        if filter_method != 0 {
          return Err(IhdrError::BadFilterMethod(filter_method));
        }
        let ihdr = Self {
          width: u32::from_be_bytes([w0, w1, w2, w3]),
          height: u32::from_be_bytes([h0, h1, h2, h3]),
          bit_depth,
          color_type: PngColorType::try_from(color_type)?,
          is_interlaced: match interlace_method {
            0 => false,
            1 => true,
            other => return Err(IhdrError::BadInterlaceMethod(other)),
          },
        };
        ihdr.validate()?;
        Ok(ihdr)
      }
      _ => Err(IhdrError::WrongLength(value.len())),
    }
  }
}
