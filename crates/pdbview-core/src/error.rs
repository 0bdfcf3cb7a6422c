//! # Error Types
//!
//! General error handling for TPI decoding and type resolution.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

use crate::types::{TypeIndex, TypeLeafKind};

/// Main error type for decoding and resolution
///
/// ## Error Categories
///
/// 1. **Stream-boundary errors**: UnexpectedEof
/// 2. **Argument errors**: InvalidArgument
/// 3. **Format errors**: InvalidUtf8, UnsupportedConstant, UnsupportedRecord
/// 4. **Lookup errors**: TypeIndexOutOfRange, ModifierChainTooDeep
///
/// A forward reference that cannot be matched to its definition is *not* an
/// error. The resolver hands back the incomplete type instead.
#[derive(Error, Debug)]
pub enum PdbError
{
    /// A read ran past the end of the byte source
    ///
    /// `offset` is the absolute position of the read inside the root buffer,
    /// so nested substreams report the same offset a hex dump would show.
    #[error("Unexpected end of stream at offset 0x{offset:x}: requested {requested} bytes, {available} available")]
    UnexpectedEof
    {
        /// Absolute byte offset where the read started
        offset: u64,
        /// Number of bytes the read needed
        requested: usize,
        /// Number of bytes left in the source
        available: usize,
    },

    /// Invalid argument passed to a decoding function
    ///
    /// Examples:
    /// - Aligning to zero bytes
    /// - Requesting a substream longer than the remaining data
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A length-prefixed string did not hold valid UTF-8
    #[error("Invalid UTF-8 string at offset 0x{offset:x}")]
    InvalidUtf8
    {
        /// Absolute byte offset of the string payload
        offset: u64,
    },

    /// The tag of an encoded constant is not a known numeric leaf
    #[error("Unsupported encoded constant leaf 0x{leaf:04x} at offset 0x{offset:x}")]
    UnsupportedConstant
    {
        /// Raw 16-bit tag that was read
        leaf: u16,
        /// Absolute byte offset of the tag
        offset: u64,
    },

    /// A record kind outside the set the resolver understands reached dispatch
    ///
    /// Only raised under [`UnsupportedRecordPolicy::Strict`](crate::config::UnsupportedRecordPolicy::Strict).
    /// The lenient policy produces a placeholder type instead.
    #[error("Unsupported type record {kind} at {index}{}", format_offset(.offset))]
    UnsupportedRecord
    {
        /// Index under which the type was requested
        index: TypeIndex,
        /// Leaf kind of the offending record
        kind: TypeLeafKind,
        /// Byte offset of the record in the TPI stream, when known
        offset: Option<u64>,
    },

    /// A complex type index points past the end of the record array
    #[error("Type index {index} out of range ({count} records)")]
    TypeIndexOutOfRange
    {
        /// The index that was requested
        index: TypeIndex,
        /// Number of records the provider holds
        count: usize,
    },

    /// `LF_MODIFIER` records nest deeper than the resolver follows
    ///
    /// Only a cycle of modifier records (or a corrupt stream) gets here.
    #[error("Modifier chain starting at {index} is too deep")]
    ModifierChainTooDeep
    {
        /// Index under which the type was requested
        index: TypeIndex,
    },
}

fn format_offset(offset: &Option<u64>) -> String
{
    offset.map(|offset| format!(" (stream offset 0x{offset:x})")).unwrap_or_default()
}

/// Convenience type alias for `Result<T, PdbError>`
///
/// ```rust
/// use pdbview_core::error::PdbResult;
/// fn foo() -> PdbResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type PdbResult<T> = std::result::Result<T, PdbError>;
