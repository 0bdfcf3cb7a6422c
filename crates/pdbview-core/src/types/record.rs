//! Decoded type records.
//!
//! These are the values handed over by the record decoder. The resolver only
//! reads them; it never decodes bytes itself.

use bitflags::bitflags;

use super::{TypeIndex, TypeLeafKind};

bitflags! {
    /// Qualifiers carried by `LF_MODIFIER` records.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierOptions: u16 {
        const CONST = 0x0001;
        const VOLATILE = 0x0002;
        const UNALIGNED = 0x0004;
    }
}

bitflags! {
    /// Property bits shared by class, union and enum records.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassOptions: u16 {
        const PACKED = 0x0001;
        const HAS_CONSTRUCTOR_OR_DESTRUCTOR = 0x0002;
        const HAS_OVERLOADED_OPERATOR = 0x0004;
        const NESTED = 0x0008;
        const CONTAINS_NESTED = 0x0010;
        const HAS_OVERLOADED_ASSIGNMENT_OPERATOR = 0x0020;
        const HAS_CONVERSION_OPERATOR = 0x0040;
        /// Declaration only; the definition is another record
        const FORWARD_REFERENCE = 0x0080;
        const SCOPED = 0x0100;
        /// A decorated (mangled) name follows the display name
        const HAS_UNIQUE_NAME = 0x0200;
        const SEALED = 0x0400;
        const INTRINSIC = 0x2000;
    }
}

bitflags! {
    /// Function attribute bits of procedure and member function records.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionOptions: u8 {
        const CXX_RETURN_UDT = 0x01;
        const CONSTRUCTOR = 0x02;
        const CONSTRUCTOR_WITH_VIRTUAL_BASES = 0x04;
    }
}

/// Calling convention byte of function records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CallingConvention(pub u8);

impl CallingConvention
{
    pub const NEAR_C: Self = CallingConvention(0x00);
    pub const NEAR_PASCAL: Self = CallingConvention(0x02);
    pub const NEAR_FAST: Self = CallingConvention(0x04);
    pub const NEAR_STDCALL: Self = CallingConvention(0x07);
    pub const THISCALL: Self = CallingConvention(0x0b);
    pub const CLRCALL: Self = CallingConvention(0x16);
    pub const NEAR_VECTOR: Self = CallingConvention(0x18);
}

/// `LF_MODIFIER`: qualifiers applied to another type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierRecord
{
    pub modified_type: TypeIndex,
    pub modifiers: ModifierOptions,
}

/// Header shared by class, union and enum records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord
{
    pub kind: TypeLeafKind,
    pub name: String,
    pub unique_name: Option<String>,
    pub options: ClassOptions,
    pub field_list: TypeIndex,
    pub member_count: u16,
}

impl TagRecord
{
    pub fn new(kind: TypeLeafKind, name: impl Into<String>) -> Self
    {
        Self {
            kind,
            name: name.into(),
            unique_name: None,
            options: ClassOptions::empty(),
            field_list: TypeIndex::NONE,
            member_count: 0,
        }
    }

    /// Attach a decorated name and set `HAS_UNIQUE_NAME`.
    #[must_use]
    pub fn with_unique_name(mut self, unique_name: impl Into<String>) -> Self
    {
        self.unique_name = Some(unique_name.into());
        self.options |= ClassOptions::HAS_UNIQUE_NAME;
        self
    }

    /// Mark the record as a declaration without a definition.
    #[must_use]
    pub fn forward_reference(mut self) -> Self
    {
        self.options |= ClassOptions::FORWARD_REFERENCE;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, field_list: TypeIndex, member_count: u16) -> Self
    {
        self.field_list = field_list;
        self.member_count = member_count;
        self
    }

    pub fn is_forward_reference(&self) -> bool
    {
        self.options.contains(ClassOptions::FORWARD_REFERENCE)
    }

    pub fn has_unique_name(&self) -> bool
    {
        self.unique_name().is_some()
    }

    /// The decorated name, if the record carries one.
    pub fn unique_name(&self) -> Option<&str>
    {
        if self.options.contains(ClassOptions::HAS_UNIQUE_NAME) {
            self.unique_name.as_deref()
        } else {
            None
        }
    }
}

/// `LF_CLASS`, `LF_STRUCTURE` or `LF_INTERFACE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord
{
    pub tag: TagRecord,
    pub derivation_list: TypeIndex,
    pub vtable_shape: TypeIndex,
    pub size: u64,
}

impl ClassRecord
{
    pub fn new(tag: TagRecord, size: u64) -> Self
    {
        Self {
            tag,
            derivation_list: TypeIndex::NONE,
            vtable_shape: TypeIndex::NONE,
            size,
        }
    }
}

/// `LF_UNION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionRecord
{
    pub tag: TagRecord,
    pub size: u64,
}

/// `LF_ENUM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRecord
{
    pub tag: TagRecord,
    pub underlying_type: TypeIndex,
}

/// `LF_ARRAY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayRecord
{
    pub element_type: TypeIndex,
    pub index_type: TypeIndex,
    /// Total size in bytes
    pub size: u64,
    pub name: String,
}

/// What a pointer record points with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerMode
{
    Pointer,
    LValueReference,
    PointerToDataMember,
    PointerToMemberFunction,
    RValueReference,
    Other(u8),
}

/// `LF_POINTER`.
///
/// The attribute word packs kind (bits 0..5), mode (5..8), qualifier flags
/// (8..13) and size in bytes (13..19).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerRecord
{
    pub referent_type: TypeIndex,
    pub attributes: u32,
    /// Class of a pointer to member
    pub containing_class: Option<TypeIndex>,
}

impl PointerRecord
{
    const KIND_MASK: u32 = 0x1f;
    const MODE_SHIFT: u32 = 5;
    const MODE_MASK: u32 = 0x07;
    const FLAT32: u32 = 0x0100;
    const VOLATILE: u32 = 0x0200;
    const CONST: u32 = 0x0400;
    const UNALIGNED: u32 = 0x0800;
    const RESTRICT: u32 = 0x1000;
    const SIZE_SHIFT: u32 = 13;
    const SIZE_MASK: u32 = 0x3f;

    pub fn new(referent_type: TypeIndex, attributes: u32) -> Self
    {
        Self {
            referent_type,
            attributes,
            containing_class: None,
        }
    }

    /// Raw pointer kind (near, far, 64-bit, ...).
    #[allow(clippy::cast_possible_truncation)]
    pub fn kind(&self) -> u8
    {
        (self.attributes & Self::KIND_MASK) as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn mode(&self) -> PointerMode
    {
        match (self.attributes >> Self::MODE_SHIFT) & Self::MODE_MASK {
            0 => PointerMode::Pointer,
            1 => PointerMode::LValueReference,
            2 => PointerMode::PointerToDataMember,
            3 => PointerMode::PointerToMemberFunction,
            4 => PointerMode::RValueReference,
            other => PointerMode::Other(other as u8),
        }
    }

    /// Size of the pointer in bytes.
    pub fn size(&self) -> u64
    {
        u64::from((self.attributes >> Self::SIZE_SHIFT) & Self::SIZE_MASK)
    }

    pub fn is_flat32(&self) -> bool
    {
        self.attributes & Self::FLAT32 != 0
    }

    pub fn is_volatile(&self) -> bool
    {
        self.attributes & Self::VOLATILE != 0
    }

    pub fn is_const(&self) -> bool
    {
        self.attributes & Self::CONST != 0
    }

    pub fn is_unaligned(&self) -> bool
    {
        self.attributes & Self::UNALIGNED != 0
    }

    pub fn is_restrict(&self) -> bool
    {
        self.attributes & Self::RESTRICT != 0
    }
}

/// `LF_PROCEDURE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureRecord
{
    pub return_type: TypeIndex,
    pub calling_convention: CallingConvention,
    pub options: FunctionOptions,
    pub parameter_count: u16,
    pub argument_list: TypeIndex,
}

/// `LF_MFUNCTION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFunctionRecord
{
    pub return_type: TypeIndex,
    pub class_type: TypeIndex,
    pub this_type: TypeIndex,
    pub calling_convention: CallingConvention,
    pub options: FunctionOptions,
    pub parameter_count: u16,
    pub argument_list: TypeIndex,
    pub this_pointer_adjustment: i32,
}

/// One decoded TPI record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRecord
{
    Modifier(ModifierRecord),
    Class(ClassRecord),
    Union(UnionRecord),
    Enum(EnumRecord),
    Array(ArrayRecord),
    Pointer(PointerRecord),
    Procedure(ProcedureRecord),
    MemberFunction(MemberFunctionRecord),
    /// Any record kind the decoder passes through undecoded (field lists,
    /// argument lists, bitfields, ...)
    Unsupported
    {
        kind: TypeLeafKind,
    },
}

impl TypeRecord
{
    /// Leaf kind of the record.
    pub fn kind(&self) -> TypeLeafKind
    {
        match self {
            Self::Modifier(_) => TypeLeafKind::LF_MODIFIER,
            Self::Class(record) => record.tag.kind,
            Self::Union(record) => record.tag.kind,
            Self::Enum(record) => record.tag.kind,
            Self::Array(_) => TypeLeafKind::LF_ARRAY,
            Self::Pointer(_) => TypeLeafKind::LF_POINTER,
            Self::Procedure(_) => TypeLeafKind::LF_PROCEDURE,
            Self::MemberFunction(_) => TypeLeafKind::LF_MFUNCTION,
            Self::Unsupported { kind } => *kind,
        }
    }

    /// The class/union/enum header, if this is a tag record.
    pub fn as_tag(&self) -> Option<&TagRecord>
    {
        match self {
            Self::Class(record) => Some(&record.tag),
            Self::Union(record) => Some(&record.tag),
            Self::Enum(record) => Some(&record.tag),
            _ => None,
        }
    }

    /// Whether both records are classes, both unions, or both enums.
    pub fn same_tag_family(&self, other: &TypeRecord) -> bool
    {
        matches!(
            (self, other),
            (Self::Class(_), Self::Class(_)) | (Self::Union(_), Self::Union(_)) | (Self::Enum(_), Self::Enum(_))
        )
    }
}

impl From<ClassRecord> for TypeRecord
{
    fn from(record: ClassRecord) -> Self
    {
        Self::Class(record)
    }
}

impl From<UnionRecord> for TypeRecord
{
    fn from(record: UnionRecord) -> Self
    {
        Self::Union(record)
    }
}

impl From<EnumRecord> for TypeRecord
{
    fn from(record: EnumRecord) -> Self
    {
        Self::Enum(record)
    }
}

impl From<ModifierRecord> for TypeRecord
{
    fn from(record: ModifierRecord) -> Self
    {
        Self::Modifier(record)
    }
}

impl From<ArrayRecord> for TypeRecord
{
    fn from(record: ArrayRecord) -> Self
    {
        Self::Array(record)
    }
}

impl From<PointerRecord> for TypeRecord
{
    fn from(record: PointerRecord) -> Self
    {
        Self::Pointer(record)
    }
}

impl From<ProcedureRecord> for TypeRecord
{
    fn from(record: ProcedureRecord) -> Self
    {
        Self::Procedure(record)
    }
}

impl From<MemberFunctionRecord> for TypeRecord
{
    fn from(record: MemberFunctionRecord) -> Self
    {
        Self::MemberFunction(record)
    }
}
