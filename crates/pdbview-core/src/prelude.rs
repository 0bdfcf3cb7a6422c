//! Common module for library exports

pub use crate::binary::{BinaryReader, BinaryReaderExt, EncodedConstant, SliceReader};
pub use crate::config::{ResolverConfig, UnsupportedRecordPolicy};
pub use crate::error::{PdbError, PdbResult};
pub use crate::resolver::{PdbType, PdbTypeKind, PdbTypeReader};
pub use crate::tpi::{hash_string_v1, HashTable, TpiStream, TypeRecordProvider};
pub use crate::types::{
    ClassRecord, EnumRecord, ModifierOptions, ModifierRecord, TagRecord, TypeIndex, TypeLeafKind, TypeRecord,
    UnionRecord,
};
