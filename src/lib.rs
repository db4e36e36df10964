#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![forbid(unsafe_code)]

//! A crate for inspecting and editing the chunks of PNG files.
//!
//! The core is [`png::ChunkSequence`]: decode PNG bytes into a validated list
//! of chunks, look at them (raw or through typed views), edit them, and encode
//! them back into bytes. With the `miniz_oxide` feature (on by default) a
//! sequence can also be rendered into an RGBA8 [`bitmap::Bitmap`].
//!
//! There's no I/O in here: reading and writing files is up to the caller.
//!
//! ```
//! use itch::png::*;
//! # fn main() -> Result<(), PngError> {
//! let ihdr = IHDR { width: 1, height: 1, bit_depth: 8, color_type: PngColorType::Y, is_interlaced: false };
//! let mut seq = ChunkSequence::from_header(ihdr)?;
//! seq.insert_chunk(1, Chunk::new(ChunkType::tEXt, b"Title\0itch".to_vec())?)?;
//! let bytes = seq.encode();
//! let back = ChunkSequence::decode(&bytes)?;
//! assert_eq!(back, seq);
//! # Ok(())
//! # }
//! ```

extern crate alloc;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub mod error;

pub mod bitmap;

pub mod png;
