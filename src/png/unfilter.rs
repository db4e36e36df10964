use super::*;

#[inline]
#[must_use]
const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // the order of these tests is fixed by the PNG standard, ties must resolve
  // exactly like this.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reverses the filter on one line, in place.
///
/// `unit` is the filter's look-back distance. When `prev` is `None` this is
/// the first line of an image and the previous line is all zeroes.
///
/// Gives back the filter type as the error if it's not 0 through 4.
fn unfilter_line(filter: u8, unit: usize, prev: Option<&[u8]>, line: &mut [u8]) -> Result<(), u8> {
  let len = line.len();
  match (filter, prev) {
    // None, or Up against a zero line
    (0, _) | (2, None) => (),
    // Sub, or Paeth against a zero line (the predictor is always `a` then)
    (1, _) | (4, None) => {
      for i in unit..len {
        line[i] = line[i].wrapping_add(line[i - unit]);
      }
    }
    (2, Some(up)) => {
      line.iter_mut().zip(up.iter().copied()).for_each(|(p, b)| *p = p.wrapping_add(b));
    }
    (3, None) => {
      for i in unit..len {
        line[i] = line[i].wrapping_add(line[i - unit] / 2);
      }
    }
    (3, Some(up)) => {
      for i in 0..len {
        let a = if i >= unit { line[i - unit] } else { 0 };
        let b = up.get(i).copied().unwrap_or(0);
        line[i] = line[i].wrapping_add(((u16::from(a) + u16::from(b)) / 2) as u8);
      }
    }
    (4, Some(up)) => {
      for i in 0..len {
        let (a, c) = if i >= unit {
          (line[i - unit], up.get(i - unit).copied().unwrap_or(0))
        } else {
          (0, 0)
        };
        let b = up.get(i).copied().unwrap_or(0);
        line[i] = line[i].wrapping_add(paeth_predict(a, b, c));
      }
    }
    (other, _) => return Err(other),
  }
  Ok(())
}

/// Passes each pixel of an unfiltered line to the `op`.
///
/// Bit depths 1, 2, and 4 get the value in the low bits of a 1-byte slice.
/// Bit depth 8 gets one byte per channel, and bit depth 16 gets two
/// big-endian bytes per channel.
fn send_out_line<F: FnMut(u32, u32, &[u8])>(
  header: &IHDR, image_level: usize, reduced_width: u32, reduced_y: u32, pixels: &[u8], op: &mut F,
) {
  let bits = header.bits_per_pixel();
  if bits >= 8 {
    let bytes = bits / 8;
    for (reduced_x, data) in (0..reduced_width).zip(pixels.chunks_exact(bytes)) {
      let (x, y) = interlaced_pos_to_full_pos(image_level, reduced_x, reduced_y);
      op(x, y, data);
    }
  } else {
    let mask = (1_u8 << bits) - 1;
    for reduced_x in 0..reduced_width {
      let bit = reduced_x as usize * bits;
      let Some(&byte) = pixels.get(bit / 8) else { return };
      // the high bits are the leftmost packed pixel
      let shift = 8 - bits - (bit % 8);
      let (x, y) = interlaced_pos_to_full_pos(image_level, reduced_x, reduced_y);
      op(x, y, &[(byte >> shift) & mask]);
    }
  }
}

/// Unfilters the zlib decompression buffer in place, passing out each pixel
/// as the unfiltering occurs.
///
/// Each call to the `op` gets `|x, y, data|`, with `x` and `y` already
/// converted to full image positions if the image is interlaced. See
/// `send_out_line` for the layout of `data`.
///
/// ## Failure
/// * The buffer is shorter than
///   [`get_zlib_decompression_requirement`](IHDR::get_zlib_decompression_requirement).
/// * Any line has a filter type above 4.
pub fn unfilter_decompressed_data<F>(
  header: &IHDR, mut decompressed: &mut [u8], mut op: F,
) -> Result<(), FormatError>
where
  F: FnMut(u32, u32, &[u8]),
{
  let expected = header.get_zlib_decompression_requirement();
  if decompressed.len() < expected {
    return Err(FormatError::ImageDataTooShort { expected, actual: decompressed.len() });
  }
  let unit = header.filter_unit();
  let dimensions = reduced_image_dimensions(header.width, header.height);
  let levels = if header.is_interlaced { 1..8 } else { 0..1 };

  for image_level in levels {
    let (reduced_width, reduced_height) = dimensions[image_level];
    if reduced_width == 0 || reduced_height == 0 {
      // a reduced image can be empty even when the full image isn't
      continue;
    }
    let bytes_per_filterline = header.bytes_per_filterline(reduced_width);
    let used = bytes_per_filterline * reduced_height as usize;
    let (these_bytes, more_bytes) = core::mem::take(&mut decompressed).split_at_mut(used);
    decompressed = more_bytes;

    let mut prev: Option<&[u8]> = None;
    let lines = these_bytes.chunks_exact_mut(bytes_per_filterline);
    for (reduced_y, line) in (0..reduced_height).zip(lines) {
      let Some((filter, pixels)) = line.split_first_mut() else { continue };
      unfilter_line(*filter, unit, prev, pixels).map_err(|filter| FormatError::InvalidFilterType {
        pass: image_level,
        row: reduced_y,
        filter,
      })?;
      let pixels: &[u8] = pixels;
      send_out_line(header, image_level, reduced_width, reduced_y, pixels, &mut op);
      prev = Some(pixels);
    }
  }
  Ok(())
}
