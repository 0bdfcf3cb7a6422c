//! TPI hash buckets and the V1 string hash.

use smallvec::SmallVec;

use crate::error::{PdbError, PdbResult};
use crate::types::TypeIndex;

/// Most chains hold a handful of entries.
type Chain = SmallVec<[TypeIndex; 4]>;

/// Hash buckets of the TPI stream, read-only once built.
///
/// Bucket `hash % bucket_count` holds the chain of type indices whose
/// records hashed to it, in insertion order.
#[derive(Debug, Clone)]
pub struct HashTable
{
    buckets: Vec<Chain>,
}

impl HashTable
{
    /// Create a table with `bucket_count` empty buckets.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidArgument` if `bucket_count` is zero.
    pub fn new(bucket_count: u32) -> PdbResult<Self>
    {
        if bucket_count == 0 {
            return Err(PdbError::InvalidArgument("hash table needs at least one bucket".to_string()));
        }
        Ok(Self {
            buckets: vec![Chain::new(); bucket_count as usize],
        })
    }

    /// Build a table from pre-computed bucket chains.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidArgument` if `buckets` is empty or has more than
    /// `u32::MAX` entries.
    pub fn from_buckets(buckets: Vec<Vec<TypeIndex>>) -> PdbResult<Self>
    {
        if buckets.is_empty() || u32::try_from(buckets.len()).is_err() {
            return Err(PdbError::InvalidArgument(format!(
                "hash table bucket count {} out of range",
                buckets.len()
            )));
        }
        Ok(Self {
            buckets: buckets.into_iter().map(Chain::from_vec).collect(),
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn bucket_count(&self) -> u32
    {
        // Bounded by both constructors
        self.buckets.len() as u32
    }

    /// Append `index` to the chain of the bucket `hash` falls into.
    pub fn insert(&mut self, hash: u32, index: TypeIndex)
    {
        let bucket = self.bucket_of(hash);
        self.buckets[bucket].push(index);
    }

    /// Walk the chain of the bucket `hash` falls into.
    pub fn chain(&self, hash: u32) -> impl Iterator<Item = TypeIndex> + '_
    {
        self.buckets[self.bucket_of(hash)].iter().copied()
    }

    fn bucket_of(&self, hash: u32) -> usize
    {
        (hash % self.bucket_count()) as usize
    }
}

/// The PDB "V1" string hash used to bucket tag records by name.
///
/// XORs the name as little-endian 32-bit words, folds in a trailing 16-bit
/// word and byte, then mixes. The `0x20202020` mask makes ASCII letters hash
/// case-insensitively.
///
/// ## Example
///
/// ```rust
/// use pdbview_core::tpi::hash_string_v1;
///
/// assert_eq!(hash_string_v1("Foo"), hash_string_v1("foo"));
/// ```
pub fn hash_string_v1(name: &str) -> u32
{
    let bytes = name.as_bytes();
    let mut words = bytes.chunks_exact(4);
    let mut result = words
        .by_ref()
        .fold(0u32, |acc, word| acc ^ u32::from_le_bytes([word[0], word[1], word[2], word[3]]));

    let mut tail = words.remainder();
    if tail.len() >= 2 {
        result ^= u32::from(u16::from_le_bytes([tail[0], tail[1]]));
        tail = &tail[2..];
    }
    if let Some(&byte) = tail.first() {
        result ^= u32::from(byte);
    }

    result |= 0x2020_2020;
    result ^= result >> 11;
    result ^ (result >> 16)
}
