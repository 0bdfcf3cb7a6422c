//! Record providers.
//!
//! The resolver reads decoded records through [`TypeRecordProvider`]. Whoever
//! owns the PDB container implements it; [`TpiStream`] is the in-memory
//! implementation for records that are already decoded.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::OnceCell;

use super::hash::HashTable;
use crate::error::{PdbError, PdbResult};
use crate::types::{TypeIndex, TypeLeafKind, TypeRecord};

/// Indexed, read-only access to the decoded records of a TPI stream.
pub trait TypeRecordProvider
{
    /// Number of complex records in the stream.
    fn record_count(&self) -> u32;

    /// The record a complex index refers to.
    ///
    /// ## Errors
    ///
    /// Returns `TypeIndexOutOfRange` for simple indices and indices past the
    /// end of the stream.
    fn record(&self, index: TypeIndex) -> PdbResult<&TypeRecord>;

    /// Byte offset of the record inside the TPI stream, for diagnostics.
    fn record_offset(&self, _index: TypeIndex) -> Option<u64>
    {
        None
    }

    /// Hash buckets of the stream, when the PDB has them.
    fn hash_table(&self) -> Option<&HashTable>
    {
        None
    }

    /// Leaf kind of the record at `index`.
    ///
    /// ## Errors
    ///
    /// Same as [`record`](TypeRecordProvider::record).
    fn kind_at(&self, index: TypeIndex) -> PdbResult<TypeLeafKind>
    {
        self.record(index).map(TypeRecord::kind)
    }

    /// Indices of every record of exactly `kind`, in stream order.
    fn records_of_kind(&self, kind: TypeLeafKind) -> Cow<'_, [TypeIndex]>
    {
        Cow::Owned(
            (0..self.record_count())
                .map(TypeIndex::from_array_index)
                .filter(|&index| self.kind_at(index).is_ok_and(|found| found == kind))
                .collect(),
        )
    }
}

/// Decoded TPI records held in memory.
///
/// ## Example
///
/// ```rust
/// use pdbview_core::tpi::{TpiStream, TypeRecordProvider};
/// use pdbview_core::types::{ClassRecord, TagRecord, TypeLeafKind};
///
/// let mut builder = TpiStream::builder();
/// let foo = builder.push(ClassRecord::new(TagRecord::new(TypeLeafKind::LF_STRUCTURE, "Foo"), 8));
/// let stream = builder.build()?;
///
/// assert_eq!(foo.value(), 0x1000);
/// assert_eq!(stream.record_count(), 1);
/// # Ok::<(), pdbview_core::error::PdbError>(())
/// ```
#[derive(Debug)]
pub struct TpiStream
{
    records: Vec<TypeRecord>,
    offsets: Option<Vec<u64>>,
    hash_table: Option<HashTable>,
    by_kind: OnceCell<HashMap<TypeLeafKind, Vec<TypeIndex>>>,
}

impl TpiStream
{
    #[must_use]
    pub fn builder() -> TpiStreamBuilder
    {
        TpiStreamBuilder::default()
    }

    /// Wrap already-decoded records without offsets or hash table.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidArgument` if there are more records than type indices.
    pub fn new(records: Vec<TypeRecord>) -> PdbResult<Self>
    {
        TpiStreamBuilder {
            records,
            ..TpiStreamBuilder::default()
        }
        .build()
    }

    /// Iterate over every record with its index.
    pub fn iter(&self) -> impl Iterator<Item = (TypeIndex, &TypeRecord)>
    {
        (0u32..).map(TypeIndex::from_array_index).zip(self.records.iter())
    }

    fn kind_index(&self) -> &HashMap<TypeLeafKind, Vec<TypeIndex>>
    {
        self.by_kind.get_or_init(|| {
            let mut by_kind: HashMap<TypeLeafKind, Vec<TypeIndex>> = HashMap::new();
            for (index, record) in self.iter() {
                by_kind.entry(record.kind()).or_default().push(index);
            }
            by_kind
        })
    }
}

impl TypeRecordProvider for TpiStream
{
    #[allow(clippy::cast_possible_truncation)]
    fn record_count(&self) -> u32
    {
        // Bounded by TpiStreamBuilder::build
        self.records.len() as u32
    }

    fn record(&self, index: TypeIndex) -> PdbResult<&TypeRecord>
    {
        index
            .array_index()
            .and_then(|position| self.records.get(position))
            .ok_or(PdbError::TypeIndexOutOfRange {
                index,
                count: self.records.len(),
            })
    }

    fn record_offset(&self, index: TypeIndex) -> Option<u64>
    {
        let offsets = self.offsets.as_ref()?;
        offsets.get(index.array_index()?).copied()
    }

    fn hash_table(&self) -> Option<&HashTable>
    {
        self.hash_table.as_ref()
    }

    fn records_of_kind(&self, kind: TypeLeafKind) -> Cow<'_, [TypeIndex]>
    {
        match self.kind_index().get(&kind) {
            Some(indices) => Cow::Borrowed(indices.as_slice()),
            None => Cow::Borrowed(&[]),
        }
    }
}

/// Collects records for a [`TpiStream`].
#[derive(Debug, Default)]
pub struct TpiStreamBuilder
{
    records: Vec<TypeRecord>,
    offsets: Option<Vec<u64>>,
    hash_table: Option<HashTable>,
}

impl TpiStreamBuilder
{
    /// Append a record and return the index it will have.
    #[allow(clippy::cast_possible_truncation)]
    pub fn push(&mut self, record: impl Into<TypeRecord>) -> TypeIndex
    {
        let index = TypeIndex::from_array_index(self.records.len() as u32);
        self.records.push(record.into());
        index
    }

    /// Index the next pushed record will get.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_index(&self) -> TypeIndex
    {
        TypeIndex::from_array_index(self.records.len() as u32)
    }

    /// Byte offset of every record inside the TPI stream, in record order.
    #[must_use]
    pub fn with_offsets(mut self, offsets: Vec<u64>) -> Self
    {
        self.offsets = Some(offsets);
        self
    }

    #[must_use]
    pub fn with_hash_table(mut self, hash_table: HashTable) -> Self
    {
        self.hash_table = Some(hash_table);
        self
    }

    /// Finish the stream.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidArgument` if the offsets do not line up with the
    /// records or the records overflow the type index space.
    pub fn build(self) -> PdbResult<TpiStream>
    {
        let limit = (u32::MAX - TypeIndex::FIRST_NON_SIMPLE) as usize;
        if self.records.len() > limit {
            return Err(PdbError::InvalidArgument(format!(
                "{} records exceed the type index space",
                self.records.len()
            )));
        }

        if let Some(offsets) = &self.offsets {
            if offsets.len() != self.records.len() {
                return Err(PdbError::InvalidArgument(format!(
                    "{} record offsets given for {} records",
                    offsets.len(),
                    self.records.len()
                )));
            }
        }

        Ok(TpiStream {
            records: self.records,
            offsets: self.offsets,
            hash_table: self.hash_table,
            by_kind: OnceCell::new(),
        })
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::types::{ClassRecord, PointerRecord, TagRecord};

    fn sample() -> TpiStream
    {
        let mut builder = TpiStream::builder();
        builder.push(ClassRecord::new(TagRecord::new(TypeLeafKind::LF_STRUCTURE, "A"), 4));
        builder.push(PointerRecord::new(TypeIndex::new(0x1000), 8 << 13));
        builder.push(ClassRecord::new(TagRecord::new(TypeLeafKind::LF_STRUCTURE, "B"), 4));
        builder.push(ClassRecord::new(TagRecord::new(TypeLeafKind::LF_CLASS, "C"), 4));
        builder.with_offsets(vec![0, 0x20, 0x30, 0x48]).build().unwrap()
    }

    #[test]
    fn test_record_lookup()
    {
        let stream = sample();
        assert_eq!(stream.record_count(), 4);
        assert_eq!(
            stream.kind_at(TypeIndex::new(0x1001)).unwrap(),
            TypeLeafKind::LF_POINTER
        );
        assert_eq!(stream.record_offset(TypeIndex::new(0x1002)), Some(0x30));
    }

    #[test]
    fn test_out_of_range_and_simple_indices()
    {
        let stream = sample();
        assert!(matches!(
            stream.record(TypeIndex::new(0x1004)),
            Err(PdbError::TypeIndexOutOfRange { count: 4, .. })
        ));
        assert!(stream.record(TypeIndex::new(0x0074)).is_err());
        assert_eq!(stream.record_offset(TypeIndex::new(0x0074)), None);
    }

    #[test]
    fn test_records_of_kind_is_exact_and_ordered()
    {
        let stream = sample();
        assert_eq!(
            stream.records_of_kind(TypeLeafKind::LF_STRUCTURE).as_ref(),
            &[TypeIndex::new(0x1000), TypeIndex::new(0x1002)]
        );
        assert_eq!(
            stream.records_of_kind(TypeLeafKind::LF_CLASS).as_ref(),
            &[TypeIndex::new(0x1003)]
        );
        assert!(stream.records_of_kind(TypeLeafKind::LF_ENUM).is_empty());
    }

    #[test]
    fn test_mismatched_offsets_rejected()
    {
        let mut builder = TpiStream::builder();
        builder.push(PointerRecord::new(TypeIndex::new(0x74), 0));
        assert!(builder.with_offsets(vec![]).build().is_err());
    }
}
