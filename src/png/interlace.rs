//! Adam7 interlacing geometry.
//!
//! ```text
//! 1 6 4 6 2 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! 3 6 4 6 3 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! ```

/// `(x_start, y_start, x_step, y_step)` for passes 1 through 7.
const ADAM7: [(u32, u32, u32, u32); 7] = [
  (0, 0, 8, 8),
  (4, 0, 8, 8),
  (0, 4, 4, 8),
  (2, 0, 4, 4),
  (0, 2, 2, 4),
  (1, 0, 2, 2),
  (0, 1, 1, 2),
];

/// Given the dimensions of the full image, computes the size of each reduced
/// image.
///
/// Index 0 is the full image itself, and indexes 1 through 7 are the reduced
/// images of passes 1 through 7. A reduced image can have a 0 width or height
/// even when the full image doesn't.
#[must_use]
pub const fn reduced_image_dimensions(full_width: u32, full_height: u32) -> [(u32, u32); 8] {
  let mut out = [(full_width, full_height); 8];
  let mut i = 0;
  while i < 7 {
    let (x0, y0, dx, dy) = ADAM7[i];
    out[i + 1] = (pass_extent(full_width, x0, dx), pass_extent(full_height, y0, dy));
    i += 1;
  }
  out
}

#[inline]
const fn pass_extent(full: u32, start: u32, step: u32) -> u32 {
  if full <= start {
    0
  } else {
    (full - start).div_ceil(step)
  }
}

/// Converts a position within a reduced image into the full image position.
///
/// Image level 0 is the full image, so the position passes through unchanged.
/// Levels above 7 are treated as level 0.
#[inline]
#[must_use]
pub const fn interlaced_pos_to_full_pos(image_level: usize, reduced_x: u32, reduced_y: u32) -> (u32, u32) {
  if image_level == 0 || image_level > 7 {
    return (reduced_x, reduced_y);
  }
  let (x0, y0, dx, dy) = ADAM7[image_level - 1];
  (reduced_x * dx + x0, reduced_y * dy + y0)
}

#[test]
fn test_reduced_image_dimensions() {
  assert_eq!(reduced_image_dimensions(0, 0), [(0, 0); 8]);
  let widths: [[u32; 8]; 7] = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 1, 1, 1, 1],
    [1, 1, 1, 1, 2, 2, 2, 2],
    [0, 0, 1, 1, 1, 1, 2, 2],
    [1, 1, 2, 2, 3, 3, 4, 4],
    [0, 1, 1, 2, 2, 3, 3, 4],
    [1, 2, 3, 4, 5, 6, 7, 8],
  ];
  let heights: [[u32; 8]; 7] = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 1, 1, 1, 1],
    [1, 1, 1, 1, 2, 2, 2, 2],
    [0, 0, 1, 1, 1, 1, 2, 2],
    [1, 1, 2, 2, 3, 3, 4, 4],
    [0, 1, 1, 2, 2, 3, 3, 4],
  ];
  for level in 1..=7 {
    for (w, ex) in (1..=8).zip(widths[level - 1]) {
      assert_eq!(reduced_image_dimensions(w, 0)[level].0, ex, "level {level} w:{w}");
    }
    for (h, ex) in (1..=8).zip(heights[level - 1]) {
      assert_eq!(reduced_image_dimensions(0, h)[level].1, ex, "level {level} h:{h}");
    }
  }
  assert_eq!(
    reduced_image_dimensions(8, 8),
    [(8, 8), (1, 1), (1, 1), (2, 1), (2, 2), (4, 2), (4, 4), (8, 4)]
  );
}

#[test]
fn test_interlaced_positions_cover_every_pixel_once() {
  let (w, h) = (11_u32, 6_u32);
  let mut seen = [[0_u8; 11]; 6];
  let dims = reduced_image_dimensions(w, h);
  for level in 1..=7 {
    let (rw, rh) = dims[level];
    for ry in 0..rh {
      for rx in 0..rw {
        let (x, y) = interlaced_pos_to_full_pos(level, rx, ry);
        seen[y as usize][x as usize] += 1;
      }
    }
  }
  assert!(seen.iter().flatten().all(|&n| n == 1));
}
