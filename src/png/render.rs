use alloc::vec::Vec;

use bitfrob::u8_replicate_bits;
use miniz_oxide::inflate::{decompress_slice_iter_to_slice, TINFLStatus};
use pixel_formats::r8g8b8a8_Srgb;

use super::*;
use crate::bitmap::Bitmap;

/// Size limits checked before rendering allocates anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderLimits {
  pub max_width: u32,
  pub max_height: u32,
}
impl Default for RenderLimits {
  /// 17,000 pixels on each side.
  #[inline]
  fn default() -> Self {
    Self { max_width: 17_000, max_height: 17_000 }
  }
}

/// Renders the image of a chunk sequence into RGBA8 pixels, using the
/// default [`RenderLimits`].
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
pub fn render_image(seq: &ChunkSequence) -> PngResult<Bitmap> {
  render_image_with_limits(seq, &RenderLimits::default())
}

/// Renders the image of a chunk sequence into RGBA8 pixels.
///
/// All `IDAT` data is inflated as one zlib stream (Adler-32 included), then
/// unfiltered, de-interlaced, and converted:
/// * Grayscale below 8 bits is scaled up by bit replication.
/// * 16-bit channels keep their high byte.
/// * A `tRNS` chunk gives palette alphas, or a single transparent gray or RGB
///   value.
/// * Palette indexes past the end of the palette are opaque black.
///
/// ## Failure
/// * [`FormatError::ImageTooLarge`] if the header exceeds the `limits`.
/// * [`FormatError::MissingImageData`] with no `IDAT` chunks.
/// * [`FormatError::MissingPalette`] for an indexed image with no valid
///   `PLTE`.
/// * [`FormatError::Decompression`] or [`FormatError::ImageDataTooShort`] if
///   the image data doesn't inflate to what the header describes.
/// * [`FormatError::InvalidFilterType`] for a bad line filter.
/// * [`PngError::Alloc`] if the buffers can't be allocated.
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
pub fn render_image_with_limits(seq: &ChunkSequence, limits: &RenderLimits) -> PngResult<Bitmap> {
  let ihdr = seq.header();
  if ihdr.width > limits.max_width || ihdr.height > limits.max_height {
    return Err(FormatError::ImageTooLarge { width: ihdr.width, height: ihdr.height }.into());
  }
  if seq.image_data().next().is_none() {
    return Err(FormatError::MissingImageData.into());
  }
  let palette: &[[u8; 3]] = if ihdr.color_type == PngColorType::Index {
    seq
      .chunks_of_type(ChunkType::PLTE)
      .find_map(|c| match PngChunk::try_from(c) {
        Ok(PngChunk::PLTE(plte)) => Some(plte.entries()),
        _ => None,
      })
      .ok_or(FormatError::MissingPalette)?
  } else {
    &[]
  };
  let trns = seq.chunks_of_type(ChunkType::tRNS).find_map(|c| match PngChunk::try_from(c) {
    Ok(PngChunk::tRNS(trns)) => Some(trns),
    _ => None,
  });
  let transparency = Transparency {
    y: trns.and_then(|t| t.try_to_grayscale()),
    rgb: trns.and_then(|t| t.try_to_rgb()),
    alphas: trns.map(|t| t.to_alphas()).unwrap_or(&[]),
  };

  let zlib_len = ihdr.get_zlib_decompression_requirement();
  let mut zlib_buffer: Vec<u8> = Vec::new();
  zlib_buffer.try_reserve_exact(zlib_len)?;
  zlib_buffer.resize(zlib_len, 0);
  let inflated = match decompress_slice_iter_to_slice(&mut zlib_buffer, seq.image_data(), true, false)
  {
    Ok(count) => count,
    Err(TINFLStatus::HasMoreOutput) => {
      log::warn!("image data inflates past the {zlib_len} bytes the header needs, ignoring the rest");
      zlib_len
    }
    Err(status) => return Err(FormatError::Decompression { status: status as i8 }.into()),
  };
  if inflated < zlib_len {
    return Err(FormatError::ImageDataTooShort { expected: zlib_len, actual: inflated }.into());
  }
  log::debug!(
    "rendering {}x{} {:?} at {} bits, {} bytes inflated",
    ihdr.width,
    ihdr.height,
    ihdr.color_type,
    ihdr.bit_depth,
    inflated
  );

  let clear = r8g8b8a8_Srgb { r: 0, g: 0, b: 0, a: 0 };
  let mut image = Bitmap::try_new(ihdr.width, ihdr.height, clear)?;
  unfilter_decompressed_data(&ihdr, &mut zlib_buffer, |x, y, data| {
    if let Some(p) = image.get_mut(x, y) {
      *p = to_rgba8(&ihdr, palette, &transparency, data);
    }
  })?;
  Ok(image)
}

struct Transparency<'b> {
  y: Option<u16>,
  rgb: Option<[u16; 3]>,
  alphas: &'b [u8],
}

/// Converts one pixel, as handed out by unfiltering, into RGBA8.
fn to_rgba8(ihdr: &IHDR, palette: &[[u8; 3]], trns: &Transparency<'_>, data: &[u8]) -> r8g8b8a8_Srgb {
  let opaque_unless = |transparent: bool| if transparent { 0 } else { 255 };
  match (ihdr.color_type, data) {
    (PngColorType::Y, &[y0, y1]) => {
      let a = opaque_unless(trns.y == Some(u16::from_be_bytes([y0, y1])));
      r8g8b8a8_Srgb { r: y0, g: y0, b: y0, a }
    }
    (PngColorType::Y, &[v]) => {
      let y = if ihdr.bit_depth < 8 { u8_replicate_bits(u32::from(ihdr.bit_depth), v) } else { v };
      let a = opaque_unless(trns.y == Some(u16::from(v)));
      r8g8b8a8_Srgb { r: y, g: y, b: y, a }
    }
    (PngColorType::RGB, &[r, g, b]) => {
      let a = opaque_unless(trns.rgb == Some([r, g, b].map(u16::from)));
      r8g8b8a8_Srgb { r, g, b, a }
    }
    (PngColorType::RGB, &[r0, r1, g0, g1, b0, b1]) => {
      let full =
        [u16::from_be_bytes([r0, r1]), u16::from_be_bytes([g0, g1]), u16::from_be_bytes([b0, b1])];
      let a = opaque_unless(trns.rgb == Some(full));
      r8g8b8a8_Srgb { r: r0, g: g0, b: b0, a }
    }
    (PngColorType::Index, &[i]) => {
      let [r, g, b] = palette.get(usize::from(i)).copied().unwrap_or([0, 0, 0]);
      let a = trns.alphas.get(usize::from(i)).copied().unwrap_or(255);
      r8g8b8a8_Srgb { r, g, b, a }
    }
    (PngColorType::YA, &[y, a]) | (PngColorType::YA, &[y, _, a, _]) => {
      r8g8b8a8_Srgb { r: y, g: y, b: y, a }
    }
    (PngColorType::RGBA, &[r, g, b, a]) | (PngColorType::RGBA, &[r, _, g, _, b, _, a, _]) => {
      r8g8b8a8_Srgb { r, g, b, a }
    }
    _ => r8g8b8a8_Srgb { r: 0, g: 0, b: 0, a: 0 },
  }
}
