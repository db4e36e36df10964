#![forbid(unsafe_code)]

//! Provides the heap-allocated image type that rendering produces.

use alloc::vec::Vec;

use pixel_formats::r8g8b8a8_Srgb;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// An owned direct-color image.
///
/// Pixels are row-major with the top row first. The fields are public, but if
/// `pixels.len()` isn't `width * height` the methods of this type will just
/// act like the missing pixels are out of bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct Bitmap<P = r8g8b8a8_Srgb> {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<P>,
}
impl<P: Clone> Bitmap<P> {
  /// Makes a bitmap with every pixel set to `fill`.
  ///
  /// Uses `try_reserve`, so an oversized request is an error instead of an
  /// abort.
  pub fn try_new(
    width: u32, height: u32, fill: P,
  ) -> Result<Self, alloc::collections::TryReserveError> {
    let count = xy_width_to_index(0, height, width);
    let mut pixels: Vec<P> = Vec::new();
    pixels.try_reserve_exact(count)?;
    pixels.resize(count, fill);
    Ok(Self { width, height, pixels })
  }
}
impl<P> Bitmap<P> {
  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<&P> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut P> {
    if x < self.width && y < self.height {
      self.pixels.get_mut(xy_width_to_index(x, y, self.width))
    } else {
      None
    }
  }
}

#[test]
fn test_bitmap_get() {
  let mut b = Bitmap::try_new(2, 3, 0_u8).unwrap();
  assert_eq!(b.pixels.len(), 6);
  *b.get_mut(1, 2).unwrap() = 9;
  assert_eq!(b.pixels[5], 9);
  assert_eq!(b.get(1, 2), Some(&9));
  assert_eq!(b.get(2, 0), None);
  assert_eq!(b.get(0, 3), None);
}
