//! # Type Resolution
//!
//! Turns the flat, index-addressed record array of a TPI stream into
//! memoized [`PdbType`] values, on demand.
//!
//! ## Resolution Steps
//!
//! For a requested index the reader:
//!
//! 1. Builds simple indices straight from their encoding (no record lookup)
//! 2. Unwraps `LF_MODIFIER` records, collecting their qualifiers
//! 3. Replaces a forward-declared class/union/enum with its definition, found
//!    through the hash table or, without one, by scanning records of the
//!    same kind and keeping the last match
//! 4. Builds the concrete type from the final record
//!
//! The result is cached under the *requested* index, so `const Foo` and `Foo`
//! live in different slots, and so do a forward declaration and the
//! definition it resolved to.
//!
//! ## Identity
//!
//! Every call with the same index returns the same `Arc`. Use
//! [`Arc::ptr_eq`] to check whether two lookups landed on one object.
//!
//! ## Thread Safety
//!
//! The memo table sits behind an `RwLock`. Two threads missing on the same
//! index may both build a value, but only the first insert is kept and both
//! get that one back.

mod pdb_type;
mod udt;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use once_cell::sync::OnceCell;
use tracing::{debug, trace, warn};

pub use self::pdb_type::{PdbType, PdbTypeKind};
use crate::config::{ResolverConfig, UnsupportedRecordPolicy};
use crate::error::{PdbError, PdbResult};
use crate::tpi::{hash_string_v1, HashTable, TypeRecordProvider};
use crate::types::{ModifierOptions, TagRecord, TypeIndex, TypeRecord};

/// How many `LF_MODIFIER` links are followed before giving up.
const MAX_MODIFIER_DEPTH: usize = 32;

/// Where a forward declaration's definition was found.
#[derive(Debug, Clone, Copy)]
enum RepairSource
{
    Hash,
    Scan,
}

/// A type resolution session over one TPI stream.
///
/// Owns the record provider for as long as resolved types are handed out.
/// [`into_provider`](PdbTypeReader::into_provider) ends the session.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use pdbview_core::resolver::PdbTypeReader;
/// use pdbview_core::tpi::TpiStream;
/// use pdbview_core::types::{ClassRecord, TagRecord, TypeLeafKind};
///
/// let mut builder = TpiStream::builder();
/// let foo = builder.push(ClassRecord::new(TagRecord::new(TypeLeafKind::LF_STRUCTURE, "Foo"), 8));
/// let reader = PdbTypeReader::new(builder.build()?);
///
/// let first = reader.resolve(foo)?;
/// let second = reader.resolve(foo)?;
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(first.name().as_deref(), Some("Foo"));
/// # Ok::<(), pdbview_core::error::PdbError>(())
/// ```
#[derive(Debug)]
pub struct PdbTypeReader<P>
{
    provider: P,
    config: ResolverConfig,
    types: RwLock<HashMap<TypeIndex, Arc<PdbType>>>,
    user_defined_types: OnceCell<Vec<Arc<PdbType>>>,
}

impl<P: TypeRecordProvider> PdbTypeReader<P>
{
    pub fn new(provider: P) -> Self
    {
        Self::with_config(provider, ResolverConfig::default())
    }

    pub fn with_config(provider: P, config: ResolverConfig) -> Self
    {
        Self {
            provider,
            config,
            types: RwLock::new(HashMap::new()),
            user_defined_types: OnceCell::new(),
        }
    }

    /// Resolve `index`, building and caching the type on first use.
    ///
    /// ## Errors
    ///
    /// - `TypeIndexOutOfRange` if a complex index on the way has no record
    /// - `UnsupportedRecord` for record kinds the resolver does not model,
    ///   under [`UnsupportedRecordPolicy::Strict`]
    /// - `ModifierChainTooDeep` for cyclic modifier records
    ///
    /// A forward declaration without a definition is not an error; it
    /// resolves to the incomplete type.
    pub fn resolve(&self, index: TypeIndex) -> PdbResult<Arc<PdbType>>
    {
        if let Some(existing) = self.cache().get(&index) {
            return Ok(Arc::clone(existing));
        }

        trace!("Type cache miss for {index}");
        let created = Arc::new(self.create_type(index)?);

        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(types.entry(index).or_insert(created)))
    }

    /// Number of indices resolved so far.
    pub fn cached_len(&self) -> usize
    {
        self.cache().len()
    }

    pub fn provider(&self) -> &P
    {
        &self.provider
    }

    pub fn config(&self) -> &ResolverConfig
    {
        &self.config
    }

    /// End the session and hand the provider back.
    ///
    /// Every `Arc<PdbType>` still held stays valid as a value, but nothing
    /// can be resolved from this session any more.
    pub fn into_provider(self) -> P
    {
        self.provider
    }

    fn cache(&self) -> RwLockReadGuard<'_, HashMap<TypeIndex, Arc<PdbType>>>
    {
        self.types.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn create_type(&self, original_index: TypeIndex) -> PdbResult<PdbType>
    {
        let mut index = original_index;
        let mut modifiers = ModifierOptions::empty();

        for _ in 0..=MAX_MODIFIER_DEPTH {
            if index.is_simple() {
                return Ok(PdbType::simple(original_index, index, modifiers));
            }

            let record = self.provider.record(index)?;
            if let TypeRecord::Modifier(modifier) = record {
                modifiers |= modifier.modifiers;
                index = modifier.modified_type;
                continue;
            }

            let (record_index, record) = self.repair_forward_reference(index, record);
            return self.dispatch(original_index, record_index, record, modifiers);
        }

        Err(PdbError::ModifierChainTooDeep { index: original_index })
    }

    /// Swap a forward declaration for its definition, when one exists.
    fn repair_forward_reference<'a>(&'a self, index: TypeIndex, record: &'a TypeRecord)
        -> (TypeIndex, &'a TypeRecord)
    {
        let Some(forward) = record.as_tag().filter(|tag| tag.is_forward_reference()) else {
            return (index, record);
        };
        if !self.config.resolve_forward_references {
            return (index, record);
        }

        let found = match self.provider.hash_table() {
            Some(table) => self.probe_hash(table, forward, record).map(|hit| (hit, RepairSource::Hash)),
            None => self.scan_for_definition(forward, record).map(|hit| (hit, RepairSource::Scan)),
        };

        match found {
            Some(((resolved, definition), via)) => {
                debug!(
                    "Resolved forward reference {index} ({}) to {resolved} via {via:?}",
                    forward.name
                );
                (resolved, definition)
            }
            None => {
                debug!("No definition found for forward reference {index} ({})", forward.name);
                (index, record)
            }
        }
    }

    /// Probe the bucket of the display name, then the bucket of the unique
    /// name. Each probe compares the candidate's name of the same sort.
    fn probe_hash(&self, table: &HashTable, forward: &TagRecord, record: &TypeRecord)
        -> Option<(TypeIndex, &TypeRecord)>
    {
        self.probe_bucket(table, &forward.name, record, |tag| tag.name == forward.name)
            .or_else(|| {
                let unique = forward.unique_name()?;
                self.probe_bucket(table, unique, record, |tag| tag.unique_name() == Some(unique))
            })
    }

    fn probe_bucket(
        &self,
        table: &HashTable,
        key: &str,
        forward: &TypeRecord,
        matches: impl Fn(&TagRecord) -> bool,
    ) -> Option<(TypeIndex, &TypeRecord)>
    {
        table.chain(hash_string_v1(key)).find_map(|candidate| {
            // Chains pointing outside the stream are skipped
            let record = self.provider.record(candidate).ok()?;
            let tag = record.as_tag()?;
            (record.same_tag_family(forward) && !tag.is_forward_reference() && matches(tag))
                .then_some((candidate, record))
        })
    }

    /// Last definition of exactly the forward record's kind with a matching
    /// name. The unique name is compared when the forward record has one.
    fn scan_for_definition(&self, forward: &TagRecord, record: &TypeRecord) -> Option<(TypeIndex, &TypeRecord)>
    {
        let matches = |tag: &TagRecord| match forward.unique_name() {
            Some(unique) => tag.unique_name() == Some(unique),
            None => tag.name == forward.name,
        };

        let candidates = self.provider.records_of_kind(forward.kind);
        candidates.iter().rev().find_map(|&candidate| {
            let candidate_record = self.provider.record(candidate).ok()?;
            let tag = candidate_record.as_tag()?;
            (candidate_record.same_tag_family(record) && !tag.is_forward_reference() && matches(tag))
                .then_some((candidate, candidate_record))
        })
    }

    fn dispatch(
        &self,
        original_index: TypeIndex,
        record_index: TypeIndex,
        record: &TypeRecord,
        modifiers: ModifierOptions,
    ) -> PdbResult<PdbType>
    {
        let kind = match record {
            TypeRecord::Class(class) => PdbTypeKind::Class(class.clone()),
            TypeRecord::Union(union) => PdbTypeKind::Union(union.clone()),
            TypeRecord::Enum(enumeration) => PdbTypeKind::Enum(enumeration.clone()),
            TypeRecord::Array(array) => PdbTypeKind::Array(array.clone()),
            TypeRecord::Pointer(pointer) => PdbTypeKind::Pointer(pointer.clone()),
            TypeRecord::Procedure(procedure) => PdbTypeKind::Function(procedure.clone()),
            TypeRecord::MemberFunction(function) => PdbTypeKind::MemberFunction(function.clone()),
            // Modifiers are unwrapped before dispatch; one here means the
            // provider handed out something inconsistent.
            TypeRecord::Modifier(_) | TypeRecord::Unsupported { .. } => {
                self.unsupported(original_index, record_index, record)?
            }
        };

        Ok(PdbType {
            original_index,
            record_index: Some(record_index),
            modifiers,
            kind,
        })
    }

    fn unsupported(&self, original_index: TypeIndex, record_index: TypeIndex, record: &TypeRecord)
        -> PdbResult<PdbTypeKind>
    {
        let kind = record.kind();
        match self.config.unsupported_records {
            UnsupportedRecordPolicy::Strict => Err(PdbError::UnsupportedRecord {
                index: original_index,
                kind,
                offset: self.provider.record_offset(record_index),
            }),
            UnsupportedRecordPolicy::Lenient => {
                warn!("Unsupported type record {kind} at {record_index}, using a placeholder");
                Ok(PdbTypeKind::Unsupported { kind })
            }
        }
    }
}
