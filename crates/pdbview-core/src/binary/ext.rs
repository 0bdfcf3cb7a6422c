//! Decoding helpers layered on top of [`BinaryReader`].
//!
//! Everything here is format knowledge shared by PDB record decoders: GUIDs,
//! element arrays, alignment padding, IEEE floats, length-prefixed strings,
//! packed decimals and the tag-prefixed numeric leaves CodeView uses for
//! sizes, offsets and enumerator values.

use super::reader::BinaryReader;
use super::values::{EncodedConstant, Guid, PackedDecimal, Ticks};
use crate::error::{PdbError, PdbResult};
use crate::types::TypeLeafKind;

/// Trait adding PDB-specific reads to any [`BinaryReader`].
///
/// Implemented for every reader, including `dyn BinaryReader`.
pub trait BinaryReaderExt: BinaryReader
{
    /// Read a GUID: `u32`, two `u16`, then eight bytes.
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` if fewer than 16 bytes remain.
    fn read_guid(&mut self) -> PdbResult<Guid>
    {
        let data1 = self.read_u32()?;
        let data2 = self.read_u16()?;
        let data3 = self.read_u16()?;
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(self.read_bytes(8)?);
        Ok(Guid { data1, data2, data3, data4 })
    }

    /// Rewind to the start and read the whole source.
    ///
    /// ## Errors
    ///
    /// Propagates failures from the underlying reader.
    fn read_all_bytes(&mut self) -> PdbResult<Vec<u8>>
    {
        self.set_position(0)?;
        let length = self.len();
        self.read_byte_array(length)
    }

    /// Read exactly `count` bytes into an owned buffer.
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` if fewer than `count` bytes remain.
    fn read_byte_array(&mut self, count: usize) -> PdbResult<Vec<u8>>
    {
        Ok(self.read_bytes(count)?.to_vec())
    }

    /// Read exactly `count` little-endian `u16` values.
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` if fewer than `2 * count` bytes remain.
    fn read_u16_array(&mut self, count: usize) -> PdbResult<Vec<u16>>
    {
        let bytes = self.read_bytes(byte_len(count, 2)?)?;
        Ok(bytes.chunks_exact(2).map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]])).collect())
    }

    /// Read exactly `count` little-endian `u32` values.
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` if fewer than `4 * count` bytes remain.
    fn read_u32_array(&mut self, count: usize) -> PdbResult<Vec<u32>>
    {
        let bytes = self.read_bytes(byte_len(count, 4)?)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    /// Discard `count` bytes.
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` if fewer than `count` bytes remain.
    fn skip(&mut self, count: usize) -> PdbResult<()>
    {
        self.read_bytes(count).map(|_| ())
    }

    /// Consume padding until the position is a multiple of `alignment`.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use pdbview_core::binary::{BinaryReader, BinaryReaderExt, SliceReader};
    ///
    /// let data = [0u8; 8];
    /// let mut reader = SliceReader::new(&data);
    /// reader.set_position(3)?;
    /// reader.align(4)?;
    /// assert_eq!(reader.position(), 4);
    /// reader.align(4)?;
    /// assert_eq!(reader.position(), 4);
    /// # Ok::<(), pdbview_core::error::PdbError>(())
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns `InvalidArgument` for a zero alignment and `UnexpectedEof` if
    /// the padding runs past the end.
    fn align(&mut self, alignment: usize) -> PdbResult<()>
    {
        if alignment == 0 {
            return Err(PdbError::InvalidArgument("alignment must be positive".to_string()));
        }

        let unaligned = self.position() % alignment;
        if unaligned != 0 {
            self.skip(alignment - unaligned)?;
        }
        Ok(())
    }

    /// Reinterpret four bytes as an IEEE-754 single.
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` if fewer than 4 bytes remain.
    fn read_f32(&mut self) -> PdbResult<f32>
    {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reinterpret eight bytes as an IEEE-754 double.
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` if fewer than 8 bytes remain.
    fn read_f64(&mut self) -> PdbResult<f64>
    {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read a `u16` length followed by that many UTF-8 bytes (no terminator).
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` on truncation and `InvalidUtf8` if the payload
    /// is not valid UTF-8.
    fn read_length_prefixed_string(&mut self) -> PdbResult<String>
    {
        let length = usize::from(self.read_u16()?);
        let offset = self.absolute_position();
        let bytes = self.read_bytes(length)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| PdbError::InvalidUtf8 { offset })
    }

    /// Read a legacy packed decimal from four 32-bit words.
    ///
    /// Word 0 carries the sign (its top bit) and the scale (bits 16..24).
    /// Words 1, 2 and 3 are the high, low and middle mantissa groups, the
    /// Windows `DECIMAL` layout.
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` if fewer than 16 bytes remain.
    fn read_packed_decimal(&mut self) -> PdbResult<PackedDecimal>
    {
        let flags = self.read_i32()?;
        let word1 = self.read_u32()?;
        let word2 = self.read_u32()?;
        let word3 = self.read_u32()?;

        Ok(PackedDecimal {
            negative: flags < 0,
            scale: flags.to_le_bytes()[2],
            hi: word1,
            mid: word3,
            lo: word2,
        })
    }

    /// Read a numeric leaf.
    ///
    /// A tag below `LF_NUMERIC` is the value itself. Any other tag selects the
    /// payload that follows it.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use pdbview_core::binary::{BinaryReader, BinaryReaderExt, EncodedConstant, SliceReader};
    ///
    /// let data = [0x05, 0x00, 0x01, 0x80, 0x01, 0x00];
    /// let mut reader = SliceReader::new(&data);
    /// assert_eq!(reader.read_encoded_constant()?, EncodedConstant::UShort(5));
    /// assert_eq!(reader.position(), 2);
    /// assert_eq!(reader.read_encoded_constant()?, EncodedConstant::Short(1));
    /// # Ok::<(), pdbview_core::error::PdbError>(())
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns `UnsupportedConstant` for unknown tags, plus any error from
    /// reading the payload.
    fn read_encoded_constant(&mut self) -> PdbResult<EncodedConstant>
    {
        let offset = self.absolute_position();
        let leaf = self.read_u16()?;

        if leaf < TypeLeafKind::LF_NUMERIC.0 {
            return Ok(EncodedConstant::UShort(leaf));
        }

        let value = match TypeLeafKind(leaf) {
            TypeLeafKind::LF_CHAR => EncodedConstant::Char(self.read_i8()?),
            TypeLeafKind::LF_SHORT => EncodedConstant::Short(self.read_i16()?),
            TypeLeafKind::LF_USHORT => EncodedConstant::UShort(self.read_u16()?),
            TypeLeafKind::LF_LONG => EncodedConstant::Long(self.read_i32()?),
            TypeLeafKind::LF_ULONG => EncodedConstant::ULong(self.read_u32()?),
            TypeLeafKind::LF_QUADWORD => EncodedConstant::QuadWord(self.read_i64()?),
            TypeLeafKind::LF_UQUADWORD => EncodedConstant::UQuadWord(self.read_u64()?),
            TypeLeafKind::LF_REAL32 => EncodedConstant::Real32(self.read_f32()?),
            TypeLeafKind::LF_REAL64 => EncodedConstant::Real64(self.read_f64()?),
            TypeLeafKind::LF_VARSTRING => EncodedConstant::VarString(self.read_length_prefixed_string()?),
            TypeLeafKind::LF_DECIMAL => EncodedConstant::Decimal(self.read_packed_decimal()?),
            TypeLeafKind::LF_DATE => EncodedConstant::Date(Ticks(self.read_i64()?)),
            _ => return Err(PdbError::UnsupportedConstant { leaf, offset }),
        };
        Ok(value)
    }
}

impl<R: BinaryReader + ?Sized> BinaryReaderExt for R {}

fn byte_len(count: usize, element_size: usize) -> PdbResult<usize>
{
    count
        .checked_mul(element_size)
        .ok_or_else(|| PdbError::InvalidArgument(format!("array of {count} elements is too large")))
}
