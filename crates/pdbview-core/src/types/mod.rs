//! # Type Index & Record Model
//!
//! The identifier space of the TPI stream and the closed set of decoded
//! record variants the resolver consumes.

mod index;
mod leaf;
mod record;

pub use index::{SimpleTypeKind, SimpleTypeMode, TypeIndex};
pub use leaf::TypeLeafKind;
pub use record::{
    ArrayRecord, CallingConvention, ClassOptions, ClassRecord, EnumRecord, FunctionOptions, MemberFunctionRecord,
    ModifierOptions, ModifierRecord, PointerMode, PointerRecord, ProcedureRecord, TagRecord, TypeRecord, UnionRecord,
};
