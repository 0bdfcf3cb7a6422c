//! CodeView leaf kinds.
//!
//! Leaf kinds tag both whole type records (`LF_CLASS`, `LF_POINTER`, ...)
//! and the numeric leaves embedded inside them (`LF_CHAR`, `LF_ULONG`, ...).
//! The set is open-ended, so the kind is a newtype with named constants in
//! the style of `gimli::constants`, not a closed enum.

use std::fmt;

/// Raw 16-bit leaf kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeLeafKind(pub u16);

macro_rules! leaf_kinds {
    ($($name:ident = $value:expr),+ $(,)?) => {
        impl TypeLeafKind
        {
            $(pub const $name: Self = TypeLeafKind($value);)+

            /// Symbolic name of a known leaf kind.
            #[must_use]
            pub fn name(self) -> Option<&'static str>
            {
                match self {
                    $(Self::$name => Some(stringify!($name)),)+
                    _ => None,
                }
            }
        }
    };
}

leaf_kinds! {
    LF_VTSHAPE = 0x000a,
    LF_LABEL = 0x000e,
    LF_NULL = 0x000f,
    LF_NOTTRAN = 0x0010,
    LF_ENDPRECOMP = 0x0014,

    LF_MODIFIER = 0x1001,
    LF_POINTER = 0x1002,
    LF_PROCEDURE = 0x1008,
    LF_MFUNCTION = 0x1009,
    LF_COBOL0 = 0x100a,
    LF_BARRAY = 0x100b,
    LF_VFTPATH = 0x100d,
    LF_OEM = 0x100f,
    LF_OEM2 = 0x1011,

    LF_SKIP = 0x1200,
    LF_ARGLIST = 0x1201,
    LF_FIELDLIST = 0x1203,
    LF_DERIVED = 0x1204,
    LF_BITFIELD = 0x1205,
    LF_METHODLIST = 0x1206,

    LF_BCLASS = 0x1400,
    LF_VBCLASS = 0x1401,
    LF_IVBCLASS = 0x1402,
    LF_INDEX = 0x1404,
    LF_VFUNCTAB = 0x1409,
    LF_VFUNCOFF = 0x140c,

    LF_ENUMERATE = 0x1502,
    LF_ARRAY = 0x1503,
    LF_CLASS = 0x1504,
    LF_STRUCTURE = 0x1505,
    LF_UNION = 0x1506,
    LF_ENUM = 0x1507,
    LF_DIMARRAY = 0x1508,
    LF_PRECOMP = 0x1509,
    LF_ALIAS = 0x150a,
    LF_DEFARG = 0x150b,
    LF_FRIENDFCN = 0x150c,
    LF_MEMBER = 0x150d,
    LF_STMEMBER = 0x150e,
    LF_METHOD = 0x150f,
    LF_NESTTYPE = 0x1510,
    LF_ONEMETHOD = 0x1511,
    LF_NESTTYPEEX = 0x1512,
    LF_MEMBERMODIFY = 0x1513,
    LF_MANAGED = 0x1514,
    LF_TYPESERVER2 = 0x1515,
    LF_STRIDED_ARRAY = 0x1516,
    LF_HLSL = 0x1517,
    LF_MODIFIER_EX = 0x1518,
    LF_INTERFACE = 0x1519,
    LF_BINTERFACE = 0x151a,
    LF_VECTOR = 0x151b,
    LF_MATRIX = 0x151c,
    LF_VFTABLE = 0x151d,

    LF_FUNC_ID = 0x1601,
    LF_MFUNC_ID = 0x1602,
    LF_BUILDINFO = 0x1603,
    LF_SUBSTR_LIST = 0x1604,
    LF_STRING_ID = 0x1605,
    LF_UDT_SRC_LINE = 0x1606,
    LF_UDT_MOD_SRC_LINE = 0x1607,

    LF_NUMERIC = 0x8000,
    LF_SHORT = 0x8001,
    LF_USHORT = 0x8002,
    LF_LONG = 0x8003,
    LF_ULONG = 0x8004,
    LF_REAL32 = 0x8005,
    LF_REAL64 = 0x8006,
    LF_REAL80 = 0x8007,
    LF_REAL128 = 0x8008,
    LF_QUADWORD = 0x8009,
    LF_UQUADWORD = 0x800a,
    LF_REAL48 = 0x800b,
    LF_COMPLEX32 = 0x800c,
    LF_COMPLEX64 = 0x800d,
    LF_COMPLEX80 = 0x800e,
    LF_COMPLEX128 = 0x800f,
    LF_VARSTRING = 0x8010,
    LF_OCTWORD = 0x8017,
    LF_UOCTWORD = 0x8018,
    LF_DECIMAL = 0x8019,
    LF_DATE = 0x801a,
    LF_UTF8STRING = 0x801b,
    LF_REAL16 = 0x801c,
}

impl TypeLeafKind
{
    /// `LF_CHAR` shares its value with the `LF_NUMERIC` threshold.
    pub const LF_CHAR: Self = TypeLeafKind(0x8000);

    /// Leaf kinds decoded as class records.
    pub const CLASS_KINDS: [Self; 3] = [Self::LF_CLASS, Self::LF_STRUCTURE, Self::LF_INTERFACE];
    /// Leaf kinds decoded as union records.
    pub const UNION_KINDS: [Self; 1] = [Self::LF_UNION];
    /// Leaf kinds decoded as enum records.
    pub const ENUM_KINDS: [Self; 1] = [Self::LF_ENUM];

    /// Whether records of this kind describe a class, union or enum.
    #[must_use]
    pub fn is_user_defined(self) -> bool
    {
        Self::CLASS_KINDS.contains(&self) || Self::UNION_KINDS.contains(&self) || Self::ENUM_KINDS.contains(&self)
    }
}

impl fmt::Display for TypeLeafKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self.name() {
            Some(name) => write!(f, "{name} (0x{:04x})", self.0),
            None => write!(f, "0x{:04x}", self.0),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_display_known_and_unknown()
    {
        assert_eq!(TypeLeafKind::LF_CLASS.to_string(), "LF_CLASS (0x1504)");
        assert_eq!(TypeLeafKind(0x7777).to_string(), "0x7777");
    }

    #[test]
    fn test_user_defined_kinds()
    {
        assert!(TypeLeafKind::LF_STRUCTURE.is_user_defined());
        assert!(TypeLeafKind::LF_INTERFACE.is_user_defined());
        assert!(TypeLeafKind::LF_ENUM.is_user_defined());
        assert!(!TypeLeafKind::LF_POINTER.is_user_defined());
    }
}
