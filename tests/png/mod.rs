use itch::png::*;
use walkdir::WalkDir;

fn gray8(width: u32, height: u32) -> IHDR {
  IHDR { width, height, bit_depth: 8, color_type: PngColorType::Y, is_interlaced: false }
}

/// `IHDR`, a `tEXt`, one `IDAT` with the given bytes, and `IEND`.
fn sequence_with_idat(ihdr: IHDR, idat: Vec<u8>) -> ChunkSequence {
  let mut seq = ChunkSequence::from_header(ihdr).unwrap();
  seq.insert_chunk(1, Chunk::new(ChunkType::tEXt, b"Comment\0test".to_vec()).unwrap()).unwrap();
  seq.insert_chunk(2, Chunk::new(ChunkType::IDAT, idat).unwrap()).unwrap();
  seq
}

#[test]
fn test_RawPngChunkIter_no_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(_) => continue,
    };
    for _ in RawPngChunkIter::new(&v) {
      //
    }
    assert!(ChunkSequence::decode(&v).is_err(), "{} is not a png", entry.path().display());
  }
  // even totally random data should never panic the iterator or the decoder!
  for _ in 0..10 {
    let mut v = super::rand_bytes(1024);
    for _ in RawPngChunkIter::new(&v) {
      //
    }
    v[..8].copy_from_slice(&PNG_SIGNATURE);
    let _ = ChunkSequence::decode(&v);
  }
}

#[test]
fn test_minimal_image_decodes() {
  let bytes = sequence_with_idat(gray8(1, 1), vec![0x78, 0x01, 0x63, 0x60, 0x00, 0x00]).encode();
  let mut seq = ChunkSequence::decode(&bytes).unwrap();
  seq.remove_chunk(ChunkId::first(ChunkType::tEXt)).unwrap();
  let seq = ChunkSequence::decode(&seq.encode()).unwrap();
  assert_eq!(seq.len(), 3);
  assert_eq!(seq.header().width, 1);
  assert_eq!(seq.header().height, 1);
  assert_eq!(seq.chunks()[0].ty(), ChunkType::IHDR);
  assert_eq!(seq.chunks()[1].ty(), ChunkType::IDAT);
  assert_eq!(seq.chunks()[2].ty(), ChunkType::IEND);
}

#[test]
fn test_round_trip_and_idempotence() {
  let seq = sequence_with_idat(gray8(4, 4), (0..40).collect());
  let once = seq.encode();
  let decoded = ChunkSequence::decode(&once).unwrap();
  assert_eq!(decoded, seq);
  assert_eq!(decoded.encode(), once);
  for chunk in &decoded {
    assert!(!chunk.has_stale_crc());
  }
  // the raw iterator sees the same chunks
  let raw: Vec<Chunk> =
    RawPngChunkIter::new(&once).map(|raw| Chunk::try_from(raw).unwrap()).collect();
  assert_eq!(raw.as_slice(), decoded.chunks());
}

#[test]
fn test_any_flipped_data_byte_fails_crc() {
  let bytes = sequence_with_idat(gray8(2, 2), vec![1, 2, 3, 4, 5]).encode();
  let seq = ChunkSequence::decode(&bytes).unwrap();
  let mut offset = PNG_SIGNATURE.len();
  for (chunk_index, chunk) in seq.iter().enumerate() {
    for i in 0..chunk.data().len() {
      let mut bad = bytes.clone();
      bad[offset + 8 + i] ^= 0x01;
      match ChunkSequence::decode(&bad) {
        Err(FormatError::CrcMismatch { offset: o, chunk_index: ci, ty, stored, computed }) => {
          assert_eq!(o, offset);
          assert_eq!(ci, chunk_index);
          assert_eq!(ty, chunk.ty());
          assert_eq!(stored, chunk.declared_crc());
          assert_ne!(stored, computed);
        }
        other => panic!("chunk {chunk_index} byte {i}: {other:?}"),
      }
    }
    offset += chunk.encoded_len();
  }
}

#[test]
fn test_truncated_terminator() {
  let bytes = sequence_with_idat(gray8(1, 1), vec![0]).encode();
  assert_eq!(
    ChunkSequence::decode(&bytes[..bytes.len() - 8]),
    Err(FormatError::MissingTerminator)
  );
  assert_eq!(
    ChunkSequence::decode(&bytes[..bytes.len() - 12]),
    Err(FormatError::MissingTerminator)
  );
  // the length and type are there, but not the CRC
  match ChunkSequence::decode(&bytes[..bytes.len() - 2]) {
    Err(FormatError::LengthPastEnd { declared: 0, available: 2, .. }) => (),
    other => panic!("{other:?}"),
  }
}

#[test]
fn test_bad_signature_and_lengths() {
  let mut bytes = sequence_with_idat(gray8(1, 1), vec![0]).encode();
  assert_eq!(ChunkSequence::decode(&bytes[..7]), Err(FormatError::BadSignature));
  let mut bad_sig = bytes.clone();
  bad_sig[1] = b'p';
  assert_eq!(ChunkSequence::decode(&bad_sig), Err(FormatError::BadSignature));
  //
  let mut too_big = bytes.clone();
  too_big[8..12].copy_from_slice(&0x8000_0000_u32.to_be_bytes());
  assert_eq!(
    ChunkSequence::decode(&too_big),
    Err(FormatError::LengthTooLarge { offset: 8, chunk_index: 0, declared: 0x8000_0000 })
  );
  //
  bytes[8..12].copy_from_slice(&1000_u32.to_be_bytes());
  match ChunkSequence::decode(&bytes) {
    Err(FormatError::LengthPastEnd { offset: 8, chunk_index: 0, declared: 1000, .. }) => (),
    other => panic!("{other:?}"),
  }
}

#[test]
fn test_terminator_with_data() {
  let mut bytes = PNG_SIGNATURE.to_vec();
  Chunk::new(ChunkType::IHDR, gray8(1, 1).to_bytes().to_vec()).unwrap().write_to(&mut bytes);
  // Chunk::new doesn't police IEND contents, only sequences do
  Chunk::new(ChunkType::IEND, vec![0]).unwrap().write_to(&mut bytes);
  assert_eq!(
    ChunkSequence::decode(&bytes),
    Err(FormatError::MalformedTerminator { chunk_index: 1, len: 1 })
  );
}

#[test]
fn test_update_missing_chunk_leaves_sequence() {
  let mut seq = sequence_with_idat(gray8(1, 1), vec![0]);
  let before = seq.clone();
  let id = ChunkId::Nth(ChunkType::tEXt, 1);
  assert_eq!(seq.update_chunk(id, b"x\0y".to_vec()), Err(PngError::NotFound(id)));
  assert_eq!(seq.update_chunk(ChunkId::Index(99), vec![]), Err(PngError::NotFound(ChunkId::Index(99))));
  assert_eq!(seq, before);
}

#[test]
fn test_edit_then_save() {
  let mut seq = sequence_with_idat(gray8(1, 1), vec![0]);
  seq.update_chunk(ChunkId::first(ChunkType::tEXt), b"Comment\0edited".to_vec()).unwrap();
  let seq = ChunkSequence::decode(&seq.encode()).unwrap();
  let texts: Vec<_> = seq
    .typed()
    .filter_map(|c| match c {
      Ok(PngChunk::tEXt(t)) => Some(t.text.to_vec()),
      _ => None,
    })
    .collect();
  assert_eq!(texts, vec![b"edited".to_vec()]);
}

#[cfg(feature = "miniz_oxide")]
mod render {
  use super::*;
  use itch::bitmap::Bitmap;
  use miniz_oxide::deflate::compress_to_vec_zlib;

  fn rgba(image: &Bitmap, x: u32, y: u32) -> [u8; 4] {
    let p = image.get(x, y).unwrap();
    [p.r, p.g, p.b, p.a]
  }

  /// Compresses the filtered lines, splitting the result over `idat_count`
  /// chunks, and puts the `extra` chunks before the image data.
  fn build(ihdr: IHDR, filtered: &[u8], extra: Vec<Chunk>, idat_count: usize) -> ChunkSequence {
    let mut seq = ChunkSequence::from_header(ihdr).unwrap();
    for chunk in extra {
      seq.insert_chunk(seq.len() - 1, chunk).unwrap();
    }
    let zlib = compress_to_vec_zlib(filtered, 6);
    let per = zlib.len().div_ceil(idat_count);
    for part in zlib.chunks(per) {
      seq.insert_chunk(seq.len() - 1, Chunk::new(ChunkType::IDAT, part.to_vec()).unwrap()).unwrap();
    }
    seq
  }

  #[test]
  fn test_render_rgba8_with_filters_over_many_idat() {
    let ihdr =
      IHDR { width: 2, height: 2, bit_depth: 8, color_type: PngColorType::RGBA, is_interlaced: false };
    let a = [10_u8, 20, 30, 255];
    let b = [20_u8, 40, 60, 255];
    let c = [1_u8, 2, 3, 4];
    let d = [5_u8, 6, 7, 8];
    let mut filtered = vec![1];
    filtered.extend_from_slice(&a);
    filtered.extend(b.iter().zip(a).map(|(b, a)| b.wrapping_sub(a)));
    filtered.push(2);
    filtered.extend(c.iter().zip(a).map(|(c, a)| c.wrapping_sub(a)));
    filtered.extend(d.iter().zip(b).map(|(d, b)| d.wrapping_sub(b)));
    let seq = build(ihdr, &filtered, vec![], 3);
    assert!(seq.image_data().count() > 1);
    let image = render_image(&seq).unwrap();
    assert_eq!((image.width, image.height), (2, 2));
    assert_eq!(rgba(&image, 0, 0), a);
    assert_eq!(rgba(&image, 1, 0), b);
    assert_eq!(rgba(&image, 0, 1), c);
    assert_eq!(rgba(&image, 1, 1), d);
  }

  #[test]
  fn test_render_palette_with_transparency() {
    let ihdr =
      IHDR { width: 3, height: 1, bit_depth: 4, color_type: PngColorType::Index, is_interlaced: false };
    let plte = Chunk::new(ChunkType::PLTE, vec![255, 0, 0, 0, 0, 255]).unwrap();
    let trns = Chunk::new(ChunkType::tRNS, vec![0, 128]).unwrap();
    let seq = build(ihdr, &[0, 0x01, 0x20], vec![plte, trns], 1);
    let image = render_image(&seq).unwrap();
    assert_eq!(rgba(&image, 0, 0), [255, 0, 0, 0]);
    assert_eq!(rgba(&image, 1, 0), [0, 0, 255, 128]);
    // past the end of the palette
    assert_eq!(rgba(&image, 2, 0), [0, 0, 0, 255]);
    //
    let no_palette = build(ihdr, &[0, 0x01, 0x20], vec![], 1);
    assert_eq!(render_image(&no_palette), Err(PngError::Format(FormatError::MissingPalette)));
  }

  #[test]
  fn test_render_gray_1bit() {
    let ihdr =
      IHDR { width: 3, height: 1, bit_depth: 1, color_type: PngColorType::Y, is_interlaced: false };
    let seq = build(ihdr, &[0, 0b1010_0000], vec![], 1);
    let image = render_image(&seq).unwrap();
    assert_eq!(rgba(&image, 0, 0), [255, 255, 255, 255]);
    assert_eq!(rgba(&image, 1, 0), [0, 0, 0, 255]);
    assert_eq!(rgba(&image, 2, 0), [255, 255, 255, 255]);
  }

  #[test]
  fn test_render_rgb16_with_transparent_color() {
    let ihdr =
      IHDR { width: 2, height: 1, bit_depth: 16, color_type: PngColorType::RGB, is_interlaced: false };
    let trns = Chunk::new(ChunkType::tRNS, vec![0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC]).unwrap();
    let filtered = [0, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xFF, 0x00, 0, 0, 0, 0];
    let seq = build(ihdr, &filtered, vec![trns], 1);
    let image = render_image(&seq).unwrap();
    assert_eq!(rgba(&image, 0, 0), [0x12, 0x56, 0x9A, 0]);
    assert_eq!(rgba(&image, 1, 0), [0xFF, 0, 0, 255]);
  }

  #[test]
  fn test_render_gray_alpha() {
    let ya8 = IHDR { color_type: PngColorType::YA, ..gray8(2, 1) };
    let image = render_image(&build(ya8, &[0, 10, 20, 30, 40], vec![], 1)).unwrap();
    assert_eq!(rgba(&image, 0, 0), [10, 10, 10, 20]);
    assert_eq!(rgba(&image, 1, 0), [30, 30, 30, 40]);
    //
    let ya16 = IHDR { bit_depth: 16, ..ya8 };
    let filtered = [0, 0xAB, 0xCD, 0x12, 0x34, 0x01, 0x02, 0xFF, 0xFF];
    let image = render_image(&build(ya16, &filtered, vec![], 1)).unwrap();
    assert_eq!(rgba(&image, 0, 0), [0xAB, 0xAB, 0xAB, 0x12]);
    assert_eq!(rgba(&image, 1, 0), [0x01, 0x01, 0x01, 0xFF]);
  }

  #[test]
  fn test_render_gray_with_transparent_value() {
    let gray2 = IHDR { bit_depth: 2, ..gray8(2, 1) };
    let trns = Chunk::new(ChunkType::tRNS, vec![0, 1]).unwrap();
    let image = render_image(&build(gray2, &[0, 0b01_10_0000], vec![trns], 1)).unwrap();
    assert_eq!(rgba(&image, 0, 0), [0x55, 0x55, 0x55, 0]);
    assert_eq!(rgba(&image, 1, 0), [0xAA, 0xAA, 0xAA, 255]);
    //
    let gray16 = IHDR { bit_depth: 16, ..gray8(2, 1) };
    let trns = Chunk::new(ChunkType::tRNS, vec![0x12, 0x34]).unwrap();
    let filtered = [0, 0x12, 0x34, 0x12, 0x35];
    let image = render_image(&build(gray16, &filtered, vec![trns], 1)).unwrap();
    assert_eq!(rgba(&image, 0, 0), [0x12, 0x12, 0x12, 0]);
    assert_eq!(rgba(&image, 1, 0), [0x12, 0x12, 0x12, 255]);
  }

  #[test]
  fn test_render_rgba16() {
    let ihdr =
      IHDR { width: 1, height: 1, bit_depth: 16, color_type: PngColorType::RGBA, is_interlaced: false };
    let filtered = [0, 0x10, 0x01, 0x20, 0x02, 0x30, 0x03, 0x40, 0x04];
    let image = render_image(&build(ihdr, &filtered, vec![], 1)).unwrap();
    assert_eq!(rgba(&image, 0, 0), [0x10, 0x20, 0x30, 0x40]);
  }

  #[test]
  fn test_render_interlaced() {
    let ihdr = IHDR { is_interlaced: true, ..gray8(3, 3) };
    let value = |x: u32, y: u32| (100 + y * 3 + x) as u8;
    let mut filtered = Vec::new();
    let dims = reduced_image_dimensions(3, 3);
    for level in 1..=7 {
      let (w, h) = dims[level];
      if w == 0 || h == 0 {
        continue;
      }
      for ry in 0..h {
        filtered.push(0);
        for rx in 0..w {
          let (x, y) = interlaced_pos_to_full_pos(level, rx, ry);
          filtered.push(value(x, y));
        }
      }
    }
    assert_eq!(filtered.len(), ihdr.get_zlib_decompression_requirement());
    let image = render_image(&build(ihdr, &filtered, vec![], 1)).unwrap();
    for y in 0..3 {
      for x in 0..3 {
        let v = value(x, y);
        assert_eq!(rgba(&image, x, y), [v, v, v, 255], "({x},{y})");
      }
    }
  }

  #[test]
  fn test_render_errors() {
    let ihdr = gray8(2, 2);
    let bad_filter = build(ihdr, &[0, 1, 2, 7, 3, 4], vec![], 1);
    assert_eq!(
      render_image(&bad_filter),
      Err(PngError::Format(FormatError::InvalidFilterType { pass: 0, row: 1, filter: 7 }))
    );
    //
    let short = build(ihdr, &[0, 1, 2], vec![], 1);
    assert_eq!(
      render_image(&short),
      Err(PngError::Format(FormatError::ImageDataTooShort { expected: 6, actual: 3 }))
    );
    //
    let garbage = sequence_with_idat(ihdr, vec![0xFF, 0xFF, 0xFF]);
    assert!(matches!(
      render_image(&garbage),
      Err(PngError::Format(FormatError::Decompression { .. }))
    ));
    //
    let mut zlib = compress_to_vec_zlib(&[0, 1, 2, 0, 3, 4], 6);
    let last = zlib.len() - 1;
    zlib[last] ^= 0xFF;
    let bad_adler = sequence_with_idat(ihdr, zlib);
    assert!(matches!(
      render_image(&bad_adler),
      Err(PngError::Format(FormatError::Decompression { .. }))
    ));
    //
    let no_data = ChunkSequence::from_header(ihdr).unwrap();
    assert_eq!(render_image(&no_data), Err(PngError::Format(FormatError::MissingImageData)));
    //
    let ok = build(ihdr, &[0, 1, 2, 0, 3, 4], vec![], 1);
    let limits = RenderLimits { max_width: 1, max_height: 100 };
    assert_eq!(
      render_image_with_limits(&ok, &limits),
      Err(PngError::Format(FormatError::ImageTooLarge { width: 2, height: 2 }))
    );
    assert!(render_image(&ok).is_ok());
  }

  #[test]
  fn test_render_snapshot_while_editing() {
    let mut seq = build(gray8(1, 1), &[0, 42], vec![], 1);
    let snapshot = seq.clone();
    seq.update_chunk(ChunkId::first(ChunkType::IDAT), compress_to_vec_zlib(&[0, 7], 6)).unwrap();
    assert_eq!(rgba(&render_image(&snapshot).unwrap(), 0, 0), [42, 42, 42, 255]);
    assert_eq!(rgba(&render_image(&seq).unwrap(), 0, 0), [7, 7, 7, 255]);
  }
}
