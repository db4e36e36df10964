//! Holds all the tools for reading, editing, and writing PNG chunks.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! A PNG is an 8-byte signature followed by a series of "chunks". Each chunk
//! is a 4-byte big-endian length, a 4-byte type tag, that many data bytes,
//! and a CRC-32 of the type and data. There's four "critical" chunk types:
//! * **Header** (`IHDR`) - Always the first chunk. Has the image dimensions,
//!   pixel format, and if the image is interlaced.
//! * **Palette** (`PLTE`) - The `[r, g, b]` colors for indexed images.
//! * **Image Data** (`IDAT`) - One or more chunks of compressed data that
//!   together form a single zlib stream.
//! * **End** (`IEND`) - Always the last chunk, and always empty.
//!
//! Everything else is "ancillary", extra info such as transparency, gamma, or
//! text.
//!
//! ## Checked Decoding
//!
//! [`ChunkSequence::decode`] validates everything: the signature, every
//! length, every CRC, and the header/terminator rules. It gives back an owned
//! sequence which can be edited with [`ChunkSequence::update_chunk`] and
//! friends, then written back out with [`ChunkSequence::encode`]. Encoding
//! always recomputes the CRCs.
//!
//! ## Quick Inspection
//!
//! [`RawPngChunkIter`] walks the chunks of any byte slice without checking
//! anything. It never panics, so it's fine for poking at damaged files.
//!
//! ## Rendering
//!
//! With the `miniz_oxide` feature, [`render_image`] turns a sequence into an
//! RGBA8 [`Bitmap`](crate::bitmap::Bitmap).

pub use crate::error::*;

mod crc32;
pub use crc32::*;

mod chunk_type;
pub use chunk_type::*;

mod raw_chunk;
pub use raw_chunk::*;

mod chunk;
pub use chunk::*;

mod ihdr;
pub use ihdr::*;

mod png_chunk;
pub use png_chunk::*;

mod sequence;
pub use sequence::*;

mod interlace;
pub use interlace::*;

mod unfilter;
pub use unfilter::*;

#[cfg(feature = "miniz_oxide")]
mod render;
#[cfg(feature = "miniz_oxide")]
pub use render::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
///
/// * If this is the case, the rest of the bytes are very likely PNG data.
/// * If this is *not* the case, the rest of the bytes are very likely *not* PNG
///   data.
#[inline]
#[must_use]
pub const fn is_png_header_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}
