//! # Binary Decoding
//!
//! Stateless decoding primitives shared by every PDB record format.
//!
//! - [`BinaryReader`]: the byte-source abstraction (position, length,
//!   little-endian integer reads)
//! - [`SliceReader`]: zero-copy reader and substream views over a borrowed
//!   buffer
//! - [`BinaryReaderExt`]: GUIDs, arrays, alignment, floats, strings, packed
//!   decimals and encoded constants

mod ext;
mod reader;
mod values;

pub use ext::BinaryReaderExt;
pub use reader::{BinaryReader, SliceReader};
pub use values::{EncodedConstant, Guid, PackedDecimal, Ticks};
