//! Resolved type values.

use std::borrow::Cow;

use crate::types::{
    ArrayRecord, ClassRecord, EnumRecord, MemberFunctionRecord, ModifierOptions, PointerRecord, ProcedureRecord,
    SimpleTypeKind, SimpleTypeMode, TagRecord, TypeIndex, TypeLeafKind, UnionRecord,
};

/// A type as handed out by the resolver.
///
/// Holds indices, never other `PdbType`s: to follow an edge (element type,
/// pointee, return type, ...) pass the index back to
/// [`PdbTypeReader::resolve`](super::PdbTypeReader::resolve).
///
/// Two indices can lead to the same record: a `const Foo` modifier and `Foo`
/// itself, or a forward declaration and its definition. They still get
/// separate `PdbType`s, each remembering the index it was requested under.
#[derive(Debug, Clone, PartialEq)]
pub struct PdbType
{
    pub(super) original_index: TypeIndex,
    pub(super) record_index: Option<TypeIndex>,
    pub(super) modifiers: ModifierOptions,
    pub(super) kind: PdbTypeKind,
}

/// What a [`PdbType`] is, with the record it was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum PdbTypeKind
{
    /// Built-in primitive
    Simple
    {
        kind: SimpleTypeKind,
    },
    /// Pointer to a built-in primitive, encoded in the index
    SimplePointer
    {
        kind: SimpleTypeKind,
        mode: SimpleTypeMode,
    },
    Class(ClassRecord),
    Union(UnionRecord),
    Enum(EnumRecord),
    Array(ArrayRecord),
    Pointer(PointerRecord),
    Function(ProcedureRecord),
    MemberFunction(MemberFunctionRecord),
    /// Placeholder for records the resolver does not model
    Unsupported
    {
        kind: TypeLeafKind,
    },
}

impl PdbType
{
    pub(super) fn simple(original_index: TypeIndex, simple_index: TypeIndex, modifiers: ModifierOptions) -> Self
    {
        let kind = simple_index.simple_kind();
        let mode = simple_index.simple_mode();
        let kind = if mode.is_pointer() {
            PdbTypeKind::SimplePointer { kind, mode }
        } else {
            PdbTypeKind::Simple { kind }
        };

        Self {
            original_index,
            record_index: None,
            modifiers,
            kind,
        }
    }

    /// The index this type was requested under.
    pub fn original_index(&self) -> TypeIndex
    {
        self.original_index
    }

    /// Index of the record this type wraps.
    ///
    /// Differs from [`original_index`](PdbType::original_index) when modifiers
    /// were unwrapped or a forward declaration was replaced by its
    /// definition. `None` for simple types.
    pub fn record_index(&self) -> Option<TypeIndex>
    {
        self.record_index
    }

    pub fn modifiers(&self) -> ModifierOptions
    {
        self.modifiers
    }

    pub fn is_const(&self) -> bool
    {
        self.modifiers.contains(ModifierOptions::CONST)
    }

    pub fn is_volatile(&self) -> bool
    {
        self.modifiers.contains(ModifierOptions::VOLATILE)
    }

    pub fn is_unaligned(&self) -> bool
    {
        self.modifiers.contains(ModifierOptions::UNALIGNED)
    }

    pub fn kind(&self) -> &PdbTypeKind
    {
        &self.kind
    }

    /// Class, union or enum.
    pub fn is_user_defined(&self) -> bool
    {
        self.tag_record().is_some()
    }

    /// The class/union/enum header this type resolved to.
    pub fn tag_record(&self) -> Option<&TagRecord>
    {
        match &self.kind {
            PdbTypeKind::Class(record) => Some(&record.tag),
            PdbTypeKind::Union(record) => Some(&record.tag),
            PdbTypeKind::Enum(record) => Some(&record.tag),
            _ => None,
        }
    }

    /// True for a class/union/enum whose definition could not be found.
    pub fn is_forward_reference(&self) -> bool
    {
        self.tag_record().is_some_and(TagRecord::is_forward_reference)
    }

    /// Display name, where the type has one.
    ///
    /// Simple pointers get a `*` suffix; unnamed arrays, pointers and
    /// functions have no name.
    pub fn name(&self) -> Option<Cow<'_, str>>
    {
        match &self.kind {
            PdbTypeKind::Simple { kind } => kind.name().map(Cow::Borrowed),
            PdbTypeKind::SimplePointer { kind, .. } => kind.name().map(|name| Cow::Owned(format!("{name}*"))),
            PdbTypeKind::Class(ClassRecord { tag, .. })
            | PdbTypeKind::Union(UnionRecord { tag, .. })
            | PdbTypeKind::Enum(EnumRecord { tag, .. }) => Some(Cow::Borrowed(tag.name.as_str())),
            PdbTypeKind::Array(record) if !record.name.is_empty() => Some(Cow::Borrowed(record.name.as_str())),
            _ => None,
        }
    }

    /// Size in bytes, where the record states it.
    ///
    /// Enums report the size of their underlying primitive.
    pub fn size(&self) -> Option<u64>
    {
        match &self.kind {
            PdbTypeKind::Simple { kind } => kind.size(),
            PdbTypeKind::SimplePointer { mode, .. } => mode.pointer_size(),
            PdbTypeKind::Class(record) => Some(record.size),
            PdbTypeKind::Union(record) => Some(record.size),
            PdbTypeKind::Array(record) => Some(record.size),
            PdbTypeKind::Pointer(record) => Some(record.size()),
            PdbTypeKind::Enum(record) if record.underlying_type.is_simple() => {
                record.underlying_type.simple_kind().size()
            }
            _ => None,
        }
    }

    /// Element type of an array.
    pub fn element_type(&self) -> Option<TypeIndex>
    {
        match &self.kind {
            PdbTypeKind::Array(record) => Some(record.element_type),
            _ => None,
        }
    }

    /// Pointee of a pointer record. Simple pointers point at their primitive,
    /// which is the index with the mode bits cleared.
    pub fn referent_type(&self) -> Option<TypeIndex>
    {
        match &self.kind {
            PdbTypeKind::Pointer(record) => Some(record.referent_type),
            PdbTypeKind::SimplePointer { kind, .. } => Some(TypeIndex::new(u32::from(kind.0))),
            _ => None,
        }
    }

    /// Return type of a function or member function.
    pub fn return_type(&self) -> Option<TypeIndex>
    {
        match &self.kind {
            PdbTypeKind::Function(record) => Some(record.return_type),
            PdbTypeKind::MemberFunction(record) => Some(record.return_type),
            _ => None,
        }
    }

    /// Underlying integer type of an enum.
    pub fn underlying_type(&self) -> Option<TypeIndex>
    {
        match &self.kind {
            PdbTypeKind::Enum(record) => Some(record.underlying_type),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_simple_index_splits_into_kind_and_mode()
    {
        let plain = PdbType::simple(TypeIndex::new(0x74), TypeIndex::new(0x74), ModifierOptions::empty());
        assert_eq!(plain.kind(), &PdbTypeKind::Simple { kind: SimpleTypeKind::INT32 });
        assert_eq!(plain.name().as_deref(), Some("int"));
        assert_eq!(plain.size(), Some(4));
        assert_eq!(plain.record_index(), None);

        let pointer = PdbType::simple(TypeIndex::new(0x1010), TypeIndex::new(0x0670), ModifierOptions::CONST);
        assert_eq!(
            pointer.kind(),
            &PdbTypeKind::SimplePointer {
                kind: SimpleTypeKind::NARROW_CHARACTER,
                mode: SimpleTypeMode::NEAR_POINTER_64
            }
        );
        assert_eq!(pointer.original_index(), TypeIndex::new(0x1010));
        assert_eq!(pointer.name().as_deref(), Some("char*"));
        assert_eq!(pointer.size(), Some(8));
        assert_eq!(pointer.referent_type(), Some(TypeIndex::new(0x70)));
        assert!(pointer.is_const());
        assert!(!pointer.is_volatile());
    }

    #[test]
    fn test_enum_size_comes_from_underlying_type()
    {
        let record = EnumRecord {
            tag: TagRecord::new(TypeLeafKind::LF_ENUM, "Color"),
            underlying_type: TypeIndex::new(0x0075),
        };
        let ty = PdbType {
            original_index: TypeIndex::new(0x1000),
            record_index: Some(TypeIndex::new(0x1000)),
            modifiers: ModifierOptions::empty(),
            kind: PdbTypeKind::Enum(record),
        };
        assert_eq!(ty.size(), Some(4));
        assert_eq!(ty.underlying_type(), Some(TypeIndex::new(0x0075)));
        assert!(ty.is_user_defined());
        assert!(!ty.is_forward_reference());
    }
}
