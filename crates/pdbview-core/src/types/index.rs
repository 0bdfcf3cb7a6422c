//! Type index space.

use std::fmt;

/// Identifier of a type in the TPI stream.
///
/// Values below [`TypeIndex::FIRST_NON_SIMPLE`] are *simple* types: a
/// built-in primitive, optionally behind a pointer, with both packed into the
/// index itself. Everything else is an ordinal into the TPI record array,
/// offset by `FIRST_NON_SIMPLE`.
///
/// ## Example
///
/// ```rust
/// use pdbview_core::types::{SimpleTypeKind, SimpleTypeMode, TypeIndex};
///
/// let int_ptr = TypeIndex::new(0x0674);
/// assert!(int_ptr.is_simple());
/// assert_eq!(int_ptr.simple_kind(), SimpleTypeKind::INT32);
/// assert_eq!(int_ptr.simple_mode(), SimpleTypeMode::NEAR_POINTER_64);
///
/// let first = TypeIndex::from_array_index(0);
/// assert_eq!(first.value(), 0x1000);
/// assert_eq!(first.array_index(), Some(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TypeIndex(pub u32);

impl TypeIndex
{
    pub const FIRST_NON_SIMPLE: u32 = 0x1000;

    const SIMPLE_KIND_MASK: u32 = 0x0000_00ff;
    const SIMPLE_MODE_MASK: u32 = 0x0000_0f00;

    /// "No type" (`T_NOTYPE`).
    pub const NONE: Self = TypeIndex(0);

    pub const fn new(value: u32) -> Self
    {
        TypeIndex(value)
    }

    /// Index of the record at position `index` in the record array.
    pub const fn from_array_index(index: u32) -> Self
    {
        TypeIndex(Self::FIRST_NON_SIMPLE.saturating_add(index))
    }

    pub const fn value(self) -> u32
    {
        self.0
    }

    /// Whether this index is decoded from its bits alone.
    pub const fn is_simple(self) -> bool
    {
        self.0 < Self::FIRST_NON_SIMPLE
    }

    /// Position in the record array, `None` for simple indices.
    #[must_use]
    pub fn array_index(self) -> Option<usize>
    {
        if self.is_simple() {
            None
        } else {
            usize::try_from(self.0 - Self::FIRST_NON_SIMPLE).ok()
        }
    }

    /// Primitive kind of a simple index. Meaningless for complex indices.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn simple_kind(self) -> SimpleTypeKind
    {
        SimpleTypeKind((self.0 & Self::SIMPLE_KIND_MASK) as u8)
    }

    /// Pointer mode of a simple index. Meaningless for complex indices.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn simple_mode(self) -> SimpleTypeMode
    {
        SimpleTypeMode(((self.0 & Self::SIMPLE_MODE_MASK) >> 8) as u8)
    }
}

impl From<u32> for TypeIndex
{
    fn from(value: u32) -> Self
    {
        TypeIndex(value)
    }
}

impl From<TypeIndex> for u32
{
    fn from(index: TypeIndex) -> Self
    {
        index.0
    }
}

impl fmt::Display for TypeIndex
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Built-in primitive kind, the low byte of a simple [`TypeIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimpleTypeKind(pub u8);

impl SimpleTypeKind
{
    pub const NONE: Self = SimpleTypeKind(0x00);
    pub const VOID: Self = SimpleTypeKind(0x03);
    pub const NOT_TRANSLATED: Self = SimpleTypeKind(0x07);
    pub const HRESULT: Self = SimpleTypeKind(0x08);

    pub const SIGNED_CHARACTER: Self = SimpleTypeKind(0x10);
    pub const UNSIGNED_CHARACTER: Self = SimpleTypeKind(0x20);
    pub const NARROW_CHARACTER: Self = SimpleTypeKind(0x70);
    pub const WIDE_CHARACTER: Self = SimpleTypeKind(0x71);
    pub const CHARACTER16: Self = SimpleTypeKind(0x7a);
    pub const CHARACTER32: Self = SimpleTypeKind(0x7b);
    pub const CHARACTER8: Self = SimpleTypeKind(0x7c);

    pub const SBYTE: Self = SimpleTypeKind(0x68);
    pub const BYTE: Self = SimpleTypeKind(0x69);
    pub const INT16_SHORT: Self = SimpleTypeKind(0x11);
    pub const UINT16_SHORT: Self = SimpleTypeKind(0x21);
    pub const INT16: Self = SimpleTypeKind(0x72);
    pub const UINT16: Self = SimpleTypeKind(0x73);
    pub const INT32_LONG: Self = SimpleTypeKind(0x12);
    pub const UINT32_LONG: Self = SimpleTypeKind(0x22);
    pub const INT32: Self = SimpleTypeKind(0x74);
    pub const UINT32: Self = SimpleTypeKind(0x75);
    pub const INT64_QUAD: Self = SimpleTypeKind(0x13);
    pub const UINT64_QUAD: Self = SimpleTypeKind(0x23);
    pub const INT64: Self = SimpleTypeKind(0x76);
    pub const UINT64: Self = SimpleTypeKind(0x77);
    pub const INT128_OCT: Self = SimpleTypeKind(0x14);
    pub const UINT128_OCT: Self = SimpleTypeKind(0x24);
    pub const INT128: Self = SimpleTypeKind(0x78);
    pub const UINT128: Self = SimpleTypeKind(0x79);

    pub const FLOAT16: Self = SimpleTypeKind(0x46);
    pub const FLOAT32: Self = SimpleTypeKind(0x40);
    pub const FLOAT32_PARTIAL_PRECISION: Self = SimpleTypeKind(0x45);
    pub const FLOAT48: Self = SimpleTypeKind(0x44);
    pub const FLOAT64: Self = SimpleTypeKind(0x41);
    pub const FLOAT80: Self = SimpleTypeKind(0x42);
    pub const FLOAT128: Self = SimpleTypeKind(0x43);

    pub const COMPLEX16: Self = SimpleTypeKind(0x56);
    pub const COMPLEX32: Self = SimpleTypeKind(0x50);
    pub const COMPLEX32_PARTIAL_PRECISION: Self = SimpleTypeKind(0x55);
    pub const COMPLEX48: Self = SimpleTypeKind(0x54);
    pub const COMPLEX64: Self = SimpleTypeKind(0x51);
    pub const COMPLEX80: Self = SimpleTypeKind(0x52);
    pub const COMPLEX128: Self = SimpleTypeKind(0x53);

    pub const BOOLEAN8: Self = SimpleTypeKind(0x30);
    pub const BOOLEAN16: Self = SimpleTypeKind(0x31);
    pub const BOOLEAN32: Self = SimpleTypeKind(0x32);
    pub const BOOLEAN64: Self = SimpleTypeKind(0x33);
    pub const BOOLEAN128: Self = SimpleTypeKind(0x34);

    /// C-style spelling of the primitive, `None` for unknown kinds.
    #[must_use]
    pub fn name(self) -> Option<&'static str>
    {
        let name = match self {
            Self::NONE => "<no type>",
            Self::VOID => "void",
            Self::NOT_TRANSLATED => "<not translated>",
            Self::HRESULT => "HRESULT",
            Self::SIGNED_CHARACTER => "signed char",
            Self::UNSIGNED_CHARACTER => "unsigned char",
            Self::NARROW_CHARACTER => "char",
            Self::WIDE_CHARACTER => "wchar_t",
            Self::CHARACTER16 => "char16_t",
            Self::CHARACTER32 => "char32_t",
            Self::CHARACTER8 => "char8_t",
            Self::SBYTE => "__int8",
            Self::BYTE => "unsigned __int8",
            Self::INT16_SHORT => "short",
            Self::UINT16_SHORT => "unsigned short",
            Self::INT16 => "__int16",
            Self::UINT16 => "unsigned __int16",
            Self::INT32_LONG => "long",
            Self::UINT32_LONG => "unsigned long",
            Self::INT32 => "int",
            Self::UINT32 => "unsigned",
            Self::INT64_QUAD | Self::INT64 => "__int64",
            Self::UINT64_QUAD | Self::UINT64 => "unsigned __int64",
            Self::INT128_OCT | Self::INT128 => "__int128",
            Self::UINT128_OCT | Self::UINT128 => "unsigned __int128",
            Self::FLOAT16 => "__half",
            Self::FLOAT32 | Self::FLOAT32_PARTIAL_PRECISION => "float",
            Self::FLOAT48 => "__float48",
            Self::FLOAT64 => "double",
            Self::FLOAT80 => "long double",
            Self::FLOAT128 => "__float128",
            Self::COMPLEX16 => "_Complex __half",
            Self::COMPLEX32 | Self::COMPLEX32_PARTIAL_PRECISION => "_Complex float",
            Self::COMPLEX48 => "_Complex __float48",
            Self::COMPLEX64 => "_Complex double",
            Self::COMPLEX80 => "_Complex long double",
            Self::COMPLEX128 => "_Complex __float128",
            Self::BOOLEAN8 => "bool",
            Self::BOOLEAN16 => "__bool16",
            Self::BOOLEAN32 => "__bool32",
            Self::BOOLEAN64 => "__bool64",
            Self::BOOLEAN128 => "__bool128",
            _ => return None,
        };
        Some(name)
    }

    /// Size of the primitive in bytes. `void` and unknown kinds have none.
    #[must_use]
    pub fn size(self) -> Option<u64>
    {
        let size = match self {
            Self::SIGNED_CHARACTER
            | Self::UNSIGNED_CHARACTER
            | Self::NARROW_CHARACTER
            | Self::CHARACTER8
            | Self::SBYTE
            | Self::BYTE
            | Self::BOOLEAN8 => 1,
            Self::WIDE_CHARACTER
            | Self::CHARACTER16
            | Self::INT16_SHORT
            | Self::UINT16_SHORT
            | Self::INT16
            | Self::UINT16
            | Self::FLOAT16
            | Self::BOOLEAN16 => 2,
            Self::HRESULT
            | Self::CHARACTER32
            | Self::INT32_LONG
            | Self::UINT32_LONG
            | Self::INT32
            | Self::UINT32
            | Self::FLOAT32
            | Self::FLOAT32_PARTIAL_PRECISION
            | Self::COMPLEX16
            | Self::BOOLEAN32 => 4,
            Self::FLOAT48 => 6,
            Self::INT64_QUAD
            | Self::UINT64_QUAD
            | Self::INT64
            | Self::UINT64
            | Self::FLOAT64
            | Self::COMPLEX32
            | Self::COMPLEX32_PARTIAL_PRECISION
            | Self::BOOLEAN64 => 8,
            Self::FLOAT80 => 10,
            Self::COMPLEX48 => 12,
            Self::INT128_OCT
            | Self::UINT128_OCT
            | Self::INT128
            | Self::UINT128
            | Self::FLOAT128
            | Self::COMPLEX64
            | Self::BOOLEAN128 => 16,
            Self::COMPLEX80 => 20,
            Self::COMPLEX128 => 32,
            _ => return None,
        };
        Some(size)
    }
}

/// Pointer mode of a simple [`TypeIndex`] (bits 8..12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimpleTypeMode(pub u8);

impl SimpleTypeMode
{
    /// Not a pointer
    pub const DIRECT: Self = SimpleTypeMode(0);
    pub const NEAR_POINTER: Self = SimpleTypeMode(1);
    pub const FAR_POINTER: Self = SimpleTypeMode(2);
    pub const HUGE_POINTER: Self = SimpleTypeMode(3);
    pub const NEAR_POINTER_32: Self = SimpleTypeMode(4);
    pub const FAR_POINTER_32: Self = SimpleTypeMode(5);
    pub const NEAR_POINTER_64: Self = SimpleTypeMode(6);
    pub const NEAR_POINTER_128: Self = SimpleTypeMode(7);

    pub const fn is_pointer(self) -> bool
    {
        self.0 != Self::DIRECT.0
    }

    /// Size of the pointer in bytes, `None` for `DIRECT` and unknown modes.
    #[must_use]
    pub fn pointer_size(self) -> Option<u64>
    {
        match self {
            Self::NEAR_POINTER => Some(2),
            Self::FAR_POINTER | Self::HUGE_POINTER | Self::NEAR_POINTER_32 => Some(4),
            Self::FAR_POINTER_32 => Some(6),
            Self::NEAR_POINTER_64 => Some(8),
            Self::NEAR_POINTER_128 => Some(16),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_simple_is_decided_by_value()
    {
        assert!(TypeIndex::new(0x0fff).is_simple());
        assert!(!TypeIndex::new(0x1000).is_simple());
        assert_eq!(TypeIndex::new(0x0074).array_index(), None);
        assert_eq!(TypeIndex::new(0x1005).array_index(), Some(5));
    }

    #[test]
    fn test_simple_fields()
    {
        let index = TypeIndex::new(0x0403);
        assert_eq!(index.simple_kind(), SimpleTypeKind::VOID);
        assert_eq!(index.simple_mode(), SimpleTypeMode::NEAR_POINTER_32);
        assert!(index.simple_mode().is_pointer());
        assert!(!TypeIndex::new(0x0074).simple_mode().is_pointer());
    }

    #[test]
    fn test_simple_kind_sizes()
    {
        assert_eq!(SimpleTypeKind::INT32.size(), Some(4));
        assert_eq!(SimpleTypeKind::WIDE_CHARACTER.size(), Some(2));
        assert_eq!(SimpleTypeKind::FLOAT80.size(), Some(10));
        assert_eq!(SimpleTypeKind::VOID.size(), None);
        assert_eq!(SimpleTypeKind(0xee).name(), None);
    }

    #[test]
    fn test_display()
    {
        assert_eq!(TypeIndex::new(0x1004).to_string(), "0x1004");
    }
}
