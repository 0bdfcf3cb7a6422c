//! Position-tracking byte sources.
//!
//! [`BinaryReader`] is the abstraction every decoder in this crate works
//! against: a current position, a total length, and little-endian fixed
//! width reads. [`SliceReader`] is the in-memory implementation. It borrows
//! the backing buffer, so substreams are views into the same storage and the
//! borrow checker keeps them from outliving it.

use crate::error::{PdbError, PdbResult};

/// A byte source with a movable read position.
///
/// Only [`position`](BinaryReader::position),
/// [`set_position`](BinaryReader::set_position), [`len`](BinaryReader::len)
/// and [`read_bytes`](BinaryReader::read_bytes) are required. The integer
/// reads are provided on top of `read_bytes` and are always little-endian,
/// which is what every PDB stream uses.
pub trait BinaryReader
{
    /// Current read position, relative to the start of this source.
    fn position(&self) -> usize;

    /// Move the read position.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidArgument` if `position` is past the end of the source.
    fn set_position(&mut self, position: usize) -> PdbResult<()>;

    /// Total length of the source in bytes.
    fn len(&self) -> usize;

    /// Consume `count` bytes and return them.
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` if fewer than `count` bytes remain. The
    /// position is left unchanged in that case. On success the slice must be
    /// exactly `count` bytes long; the provided integer reads reject any
    /// other length.
    fn read_bytes(&mut self, count: usize) -> PdbResult<&[u8]>;

    /// Offset of the current position inside the root buffer.
    ///
    /// Used for diagnostics only. Sources that are not views into a larger
    /// buffer report their plain position.
    fn absolute_position(&self) -> u64
    {
        self.position() as u64
    }

    fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    /// Bytes left between the current position and the end.
    fn remaining(&self) -> usize
    {
        self.len().saturating_sub(self.position())
    }

    fn read_u8(&mut self) -> PdbResult<u8>
    {
        Ok(u8::from_le_bytes(read_array(self)?))
    }

    fn read_i8(&mut self) -> PdbResult<i8>
    {
        Ok(i8::from_le_bytes(read_array(self)?))
    }

    fn read_u16(&mut self) -> PdbResult<u16>
    {
        Ok(u16::from_le_bytes(read_array(self)?))
    }

    fn read_i16(&mut self) -> PdbResult<i16>
    {
        Ok(i16::from_le_bytes(read_array(self)?))
    }

    fn read_u32(&mut self) -> PdbResult<u32>
    {
        Ok(u32::from_le_bytes(read_array(self)?))
    }

    fn read_i32(&mut self) -> PdbResult<i32>
    {
        Ok(i32::from_le_bytes(read_array(self)?))
    }

    fn read_u64(&mut self) -> PdbResult<u64>
    {
        Ok(u64::from_le_bytes(read_array(self)?))
    }

    fn read_i64(&mut self) -> PdbResult<i64>
    {
        Ok(i64::from_le_bytes(read_array(self)?))
    }
}

/// Read exactly `N` bytes into an array.
///
/// A `read_bytes` implementation that hands back a slice of the wrong length
/// is reported as `UnexpectedEof` instead of panicking.
fn read_array<R, const N: usize>(reader: &mut R) -> PdbResult<[u8; N]>
where
    R: BinaryReader + ?Sized,
{
    let offset = reader.absolute_position();
    let available = reader.remaining();
    let bytes = reader.read_bytes(N)?;
    <[u8; N]>::try_from(bytes).map_err(|_| PdbError::UnexpectedEof {
        offset,
        requested: N,
        available,
    })
}

/// Zero-copy reader over a borrowed byte slice.
///
/// ## Example
///
/// ```rust
/// use pdbview_core::binary::{BinaryReader, SliceReader};
///
/// let data = [0x34, 0x12, 0xff];
/// let mut reader = SliceReader::new(&data);
/// assert_eq!(reader.read_u16()?, 0x1234);
/// assert_eq!(reader.remaining(), 1);
/// # Ok::<(), pdbview_core::error::PdbError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SliceReader<'a>
{
    data: &'a [u8],
    position: usize,
    /// Offset of `data[0]` inside the root buffer
    base: u64,
}

impl<'a> SliceReader<'a>
{
    /// Create a reader positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self
    {
        Self::with_base(data, 0)
    }

    /// Create a reader whose diagnostics report offsets relative to `base`.
    ///
    /// Useful when `data` is one stream cut out of a larger file.
    #[must_use]
    pub fn with_base(data: &'a [u8], base: u64) -> Self
    {
        Self { data, position: 0, base }
    }

    /// The whole underlying window, independent of the position.
    #[must_use]
    pub fn as_slice(&self) -> &'a [u8]
    {
        self.data
    }

    /// Consume `count` bytes and return them with the buffer's lifetime.
    ///
    /// ## Errors
    ///
    /// Returns `UnexpectedEof` if fewer than `count` bytes remain.
    pub fn read_slice(&mut self, count: usize) -> PdbResult<&'a [u8]>
    {
        let available = self.data.len().saturating_sub(self.position);
        if count > available {
            return Err(PdbError::UnexpectedEof {
                offset: self.absolute_position(),
                requested: count,
                available,
            });
        }

        let start = self.position;
        self.position += count;
        Ok(&self.data[start..self.position])
    }

    /// Split off a bounded view starting at the current position.
    ///
    /// The view shares storage with `self`, starts at its own position 0 and
    /// covers `length` bytes (`None` means everything that is left). The
    /// parent's position moves past the view. No bytes are copied.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidArgument` if `length` is larger than what remains.
    pub fn read_substream(&mut self, length: Option<usize>) -> PdbResult<SliceReader<'a>>
    {
        let remaining = self.remaining();
        let length = length.unwrap_or(remaining);
        if length > remaining {
            return Err(PdbError::InvalidArgument(format!(
                "substream of {length} bytes exceeds the {remaining} bytes left at offset 0x{:x}",
                self.absolute_position()
            )));
        }

        let base = self.absolute_position();
        let data = self.read_slice(length)?;
        Ok(SliceReader::with_base(data, base))
    }
}

impl BinaryReader for SliceReader<'_>
{
    fn position(&self) -> usize
    {
        self.position
    }

    fn set_position(&mut self, position: usize) -> PdbResult<()>
    {
        if position > self.data.len() {
            return Err(PdbError::InvalidArgument(format!(
                "position {position} is past the end of a {} byte stream",
                self.data.len()
            )));
        }
        self.position = position;
        Ok(())
    }

    fn len(&self) -> usize
    {
        self.data.len()
    }

    fn read_bytes(&mut self, count: usize) -> PdbResult<&[u8]>
    {
        self.read_slice(count)
    }

    fn absolute_position(&self) -> u64
    {
        self.base + self.position as u64
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_reads_are_little_endian()
    {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let mut reader = SliceReader::new(&data);
        assert_eq!(reader.read_u32().unwrap(), 0x0403_0201);
        assert_eq!(reader.read_u16().unwrap(), 0x0605);
        assert_eq!(reader.read_i8().unwrap(), 7);
        assert_eq!(reader.position(), 7);
    }

    #[test]
    fn test_read_past_end_fails_without_moving()
    {
        let data = [0xaa, 0xbb, 0xcc];
        let mut reader = SliceReader::new(&data);
        reader.read_u16().unwrap();

        match reader.read_u16() {
            Err(PdbError::UnexpectedEof { offset, requested, available }) => {
                assert_eq!(offset, 2);
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
            other => panic!("expected UnexpectedEof, got {other:?}"),
        }
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.read_u8().unwrap(), 0xcc);
    }

    #[test]
    fn test_substream_shares_storage()
    {
        let data = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let mut parent = SliceReader::new(&data);
        parent.read_u16().unwrap();

        let mut child = parent.read_substream(Some(4)).unwrap();
        assert_eq!(parent.position(), 6);
        assert_eq!(child.position(), 0);
        assert_eq!(child.len(), 4);
        assert_eq!(child.absolute_position(), 2);
        assert!(std::ptr::eq(child.as_slice().as_ptr(), data[2..].as_ptr()));
        assert_eq!(child.read_u8().unwrap(), 2);
    }

    #[test]
    fn test_substream_defaults_to_rest()
    {
        let data = [0u8; 10];
        let mut parent = SliceReader::new(&data);
        parent.set_position(3).unwrap();

        let child = parent.read_substream(None).unwrap();
        assert_eq!(child.len(), 7);
        assert_eq!(parent.remaining(), 0);
    }

    #[test]
    fn test_substream_longer_than_rest_is_rejected()
    {
        let data = [0u8; 4];
        let mut parent = SliceReader::new(&data);
        assert!(matches!(parent.read_substream(Some(5)), Err(PdbError::InvalidArgument(_))));
        assert_eq!(parent.position(), 0);
    }

    #[test]
    fn test_nested_substream_reports_root_offsets()
    {
        let data = [0u8; 16];
        let mut root = SliceReader::with_base(&data, 0x100);
        root.set_position(4).unwrap();
        let mut outer = root.read_substream(Some(8)).unwrap();
        outer.set_position(2).unwrap();
        let mut inner = outer.read_substream(Some(2)).unwrap();
        inner.read_u16().unwrap();

        match inner.read_u8() {
            Err(PdbError::UnexpectedEof { offset, .. }) => assert_eq!(offset, 0x100 + 4 + 2 + 2),
            other => panic!("expected UnexpectedEof, got {other:?}"),
        }
    }

    /// Hands back one byte fewer than asked for.
    struct ShortReader
    {
        data: Vec<u8>,
        position: usize,
    }

    impl BinaryReader for ShortReader
    {
        fn position(&self) -> usize
        {
            self.position
        }

        fn set_position(&mut self, position: usize) -> PdbResult<()>
        {
            self.position = position;
            Ok(())
        }

        fn len(&self) -> usize
        {
            self.data.len()
        }

        fn read_bytes(&mut self, count: usize) -> PdbResult<&[u8]>
        {
            let start = self.position;
            self.position += count;
            Ok(&self.data[start..start + count - 1])
        }
    }

    #[test]
    fn test_wrong_length_from_read_bytes_is_an_error()
    {
        let mut reader = ShortReader {
            data: vec![0xaa; 8],
            position: 0,
        };

        assert!(matches!(
            reader.read_u32(),
            Err(PdbError::UnexpectedEof {
                offset: 0,
                requested: 4,
                available: 8
            })
        ));
        assert!(matches!(reader.read_u8(), Err(PdbError::UnexpectedEof { requested: 1, .. })));
    }
}
