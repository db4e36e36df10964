use alloc::vec::Vec;

use super::*;

/// An ordered, validated list of PNG chunks.
///
/// The rules of a sequence are always upheld:
/// * The first chunk is `IHDR`, and its data is a valid header.
/// * The last chunk is `IEND`, and its data is empty.
/// * Neither of those appears anywhere else.
///
/// Mutation requires `&mut self`, so edits can't race with readers. If a
/// renderer needs to work while edits continue, give it a `clone()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkSequence {
  header: IHDR,
  chunks: Vec<Chunk>,
}
impl ChunkSequence {
  /// The smallest valid sequence: just `IHDR` and `IEND`.
  pub fn from_header(ihdr: IHDR) -> Result<Self, ConstraintError> {
    ihdr.validate().map_err(ConstraintError::InvalidHeader)?;
    let header = Chunk::new(ChunkType::IHDR, ihdr.to_bytes().to_vec())?;
    let end = Chunk::new(ChunkType::IEND, Vec::new())?;
    Ok(Self { header: ihdr, chunks: alloc::vec![header, end] })
  }

  /// Parses and validates PNG bytes.
  ///
  /// Every chunk's CRC is checked, and all the sequence rules must hold. See
  /// [`FormatError`] for the ways this can fail.
  pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
    let mut rest = match bytes {
      [137, 80, 78, 71, 13, 10, 26, 10, rest @ ..] => rest,
      _ => return Err(FormatError::BadSignature),
    };
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut header: Option<IHDR> = None;
    let mut saw_terminator = false;
    while !rest.is_empty() {
      let offset = bytes.len() - rest.len();
      let chunk_index = chunks.len();
      if saw_terminator {
        return Err(FormatError::TrailingBytes { offset, count: rest.len() });
      }
      // not even enough for a length and type, so there's no more chunks
      let Some((len_bytes, after_len)) = split_array::<4>(rest) else { break };
      let Some((ty_bytes, after_ty)) = split_array::<4>(after_len) else { break };
      let declared = u32::from_be_bytes(len_bytes);
      let ty = ChunkType(ty_bytes);
      if declared as usize > MAX_CHUNK_LEN {
        return Err(FormatError::LengthTooLarge { offset, chunk_index, declared });
      }
      let len = declared as usize;
      if after_ty.len() < len + 4 {
        return Err(FormatError::LengthPastEnd {
          offset,
          chunk_index,
          declared,
          available: after_ty.len(),
        });
      }
      if !ty.is_valid() {
        return Err(FormatError::InvalidChunkType { offset, chunk_index });
      }
      let (data, after_data) = after_ty.split_at(len);
      let (crc_bytes, after_crc) = after_data.split_at(4);
      let stored = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
      let computed = chunk_crc(ty.0, data);
      if stored != computed {
        return Err(FormatError::CrcMismatch { offset, chunk_index, ty, stored, computed });
      }
      log::trace!("chunk {chunk_index}: {ty} len {len} at offset {offset}");
      match ty {
        ChunkType::IHDR if chunk_index == 0 => {
          header = Some(IHDR::try_from(data).map_err(FormatError::MalformedHeader)?);
        }
        ChunkType::IHDR => return Err(FormatError::DuplicateHeader { chunk_index }),
        _ if chunk_index == 0 => return Err(FormatError::HeaderNotFirst { found: ty }),
        ChunkType::IEND if len != 0 => {
          return Err(FormatError::MalformedTerminator { chunk_index, len })
        }
        ChunkType::IEND => saw_terminator = true,
        _ => (),
      }
      chunks.push(Chunk::from_checked_parts(ty, data.to_vec(), stored));
      rest = after_crc;
    }
    let Some(header) = header else {
      return Err(FormatError::MissingHeader);
    };
    if !saw_terminator {
      return Err(FormatError::MissingTerminator);
    }
    log::debug!("decoded {} chunks from {} bytes", chunks.len(), bytes.len());
    Ok(Self { header, chunks })
  }

  /// Writes the signature and every chunk, in order.
  ///
  /// CRCs are always recomputed, so the output is self-consistent even if a
  /// chunk was changed through [`Chunk::data_mut`].
  #[must_use]
  pub fn encode(&self) -> Vec<u8> {
    let total = PNG_SIGNATURE.len() + self.chunks.iter().map(Chunk::encoded_len).sum::<usize>();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&PNG_SIGNATURE);
    for chunk in &self.chunks {
      chunk.write_to(&mut out);
    }
    out
  }

  /// Replaces a chunk's data, keeping its position.
  ///
  /// The length and CRC are updated to match the new data. On any error the
  /// sequence is left unchanged.
  ///
  /// ## Failure
  /// * [`PngError::NotFound`] if no chunk matches `id`.
  /// * [`PngError::Constraint`] if the new data would make the `IHDR` invalid
  ///   or the `IEND` non-empty, or is longer than [`MAX_CHUNK_LEN`].
  pub fn update_chunk(&mut self, id: ChunkId, new_data: Vec<u8>) -> PngResult<Vec<u8>> {
    let index = self.position(id).ok_or(PngError::NotFound(id))?;
    let chunk = &mut self.chunks[index];
    if new_data.len() > MAX_CHUNK_LEN {
      return Err(ConstraintError::DataTooLong { len: new_data.len() }.into());
    }
    match chunk.ty() {
      ChunkType::IHDR => {
        self.header =
          IHDR::try_from(new_data.as_slice()).map_err(ConstraintError::InvalidHeader)?;
      }
      ChunkType::IEND if !new_data.is_empty() => {
        return Err(ConstraintError::TerminatorNotEmpty { len: new_data.len() }.into());
      }
      _ => (),
    }
    log::debug!("updating {} at index {index} to {} bytes", chunk.ty(), new_data.len());
    Ok(chunk.replace_data(new_data))
  }

  /// Like [`update_chunk`](Self::update_chunk), but gives back an edited copy
  /// and leaves `self` alone.
  pub fn with_updated_chunk(&self, id: ChunkId, new_data: Vec<u8>) -> PngResult<Self> {
    let mut out = self.clone();
    out.update_chunk(id, new_data)?;
    Ok(out)
  }

  /// Inserts a chunk so that it ends up at `index`.
  ///
  /// ## Failure
  /// * The chunk's type isn't valid, or its data is too long.
  /// * The chunk is an `IHDR` or `IEND`.
  /// * `index` isn't between the `IHDR` and the `IEND` (`1..=len-1`).
  pub fn insert_chunk(&mut self, index: usize, chunk: Chunk) -> Result<(), ConstraintError> {
    if !chunk.ty().is_valid() {
      return Err(ConstraintError::InvalidChunkType(chunk.ty()));
    }
    if chunk.data().len() > MAX_CHUNK_LEN {
      return Err(ConstraintError::DataTooLong { len: chunk.data().len() });
    }
    if chunk.ty().is_fixed() {
      return Err(ConstraintError::FixedChunk(chunk.ty()));
    }
    if index == 0 || index >= self.chunks.len() {
      return Err(ConstraintError::OutsideFixedChunks { index });
    }
    log::debug!("inserting {} at index {index}", chunk.ty());
    self.chunks.insert(index, chunk);
    Ok(())
  }

  /// Removes a chunk, giving it back.
  ///
  /// ## Failure
  /// * [`PngError::NotFound`] if no chunk matches `id`.
  /// * [`PngError::Constraint`] if the chunk is the `IHDR` or `IEND`.
  pub fn remove_chunk(&mut self, id: ChunkId) -> PngResult<Chunk> {
    let index = self.position(id).ok_or(PngError::NotFound(id))?;
    let ty = self.chunks[index].ty();
    if ty.is_fixed() {
      return Err(ConstraintError::FixedChunk(ty).into());
    }
    log::debug!("removing {ty} at index {index}");
    Ok(self.chunks.remove(index))
  }

  /// Finds the position of a chunk.
  #[must_use]
  pub fn position(&self, id: ChunkId) -> Option<usize> {
    match id {
      ChunkId::Index(i) if i < self.chunks.len() => Some(i),
      ChunkId::Index(_) => None,
      ChunkId::Nth(ty, n) => {
        self.chunks.iter().enumerate().filter(|(_, c)| c.ty() == ty).nth(n).map(|(i, _)| i)
      }
    }
  }

  #[inline]
  #[must_use]
  pub fn get(&self, id: ChunkId) -> Option<&Chunk> {
    self.position(id).map(|i| &self.chunks[i])
  }

  /// Mutable access to an ancillary or image data chunk.
  ///
  /// `IHDR` and `IEND` are never handed out this way, use
  /// [`update_chunk`](Self::update_chunk) for those.
  #[inline]
  pub fn get_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
    let i = self.position(id)?;
    let chunk = &mut self.chunks[i];
    if chunk.ty().is_fixed() {
      None
    } else {
      Some(chunk)
    }
  }

  #[inline]
  #[must_use]
  pub fn chunks(&self) -> &[Chunk] {
    &self.chunks
  }

  #[inline]
  pub fn iter(&self) -> core::slice::Iter<'_, Chunk> {
    self.chunks.iter()
  }

  /// Number of chunks, counting `IHDR` and `IEND`.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  /// Always false, a sequence has at least two chunks.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  /// The parsed `IHDR`.
  #[inline]
  #[must_use]
  pub const fn header(&self) -> IHDR {
    self.header
  }

  /// All chunks of the given type, in order.
  pub fn chunks_of_type(&self, ty: ChunkType) -> impl Iterator<Item = &Chunk> + '_ {
    self.chunks.iter().filter(move |c| c.ty() == ty)
  }

  /// The data of every `IDAT` chunk, in order.
  ///
  /// These form one zlib stream when taken together.
  pub fn image_data(&self) -> impl Iterator<Item = &[u8]> + '_ {
    self.chunks_of_type(ChunkType::IDAT).map(Chunk::data)
  }

  /// Typed views of every chunk. Unknown or malformed chunks come back as
  /// the `Err` value.
  pub fn typed(&self) -> impl Iterator<Item = Result<PngChunk<'_>, &Chunk>> + '_ {
    self.chunks.iter().map(PngChunk::try_from)
  }
}
impl<'a> IntoIterator for &'a ChunkSequence {
  type Item = &'a Chunk;
  type IntoIter = core::slice::Iter<'a, Chunk>;
  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.chunks.iter()
  }
}
