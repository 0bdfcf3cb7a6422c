//! Value types produced by the decoding toolkit.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Globally unique identifier in the standard Windows layout.
///
/// On disk: one little-endian `u32`, two little-endian `u16`, then eight
/// single bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid
{
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl fmt::Display for Guid
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

/// Legacy 128-bit packed decimal (`LF_DECIMAL`).
///
/// The value is `(-1)^negative * mantissa / 10^scale` where the mantissa is
/// 96 bits split into three 32-bit groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedDecimal
{
    pub negative: bool,
    pub scale: u8,
    pub hi: u32,
    pub mid: u32,
    pub lo: u32,
}

impl PackedDecimal
{
    /// The 96-bit unscaled magnitude.
    #[must_use]
    pub fn mantissa(&self) -> u128
    {
        (u128::from(self.hi) << 64) | (u128::from(self.mid) << 32) | u128::from(self.lo)
    }

    /// Lossy conversion to a double.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64
    {
        let magnitude = self.mantissa() as f64 / 10f64.powi(i32::from(self.scale));
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl fmt::Display for PackedDecimal
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let digits = self.mantissa().to_string();
        let scale = usize::from(self.scale);
        let sign = if self.negative { "-" } else { "" };

        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }

        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (whole, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{whole}.{fraction}")
    }
}

/// Date stored as a count of 100-nanosecond ticks since 0001-01-01 00:00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticks(pub i64);

impl Ticks
{
    pub const PER_SECOND: i64 = 10_000_000;

    /// Calendar value of this tick count, or `None` if it is negative or out
    /// of `chrono`'s range.
    #[must_use]
    pub fn to_datetime(self) -> Option<NaiveDateTime>
    {
        if self.0 < 0 {
            return None;
        }

        let epoch = NaiveDate::from_ymd_opt(1, 1, 1)?.and_hms_opt(0, 0, 0)?;
        let seconds = TimeDelta::try_seconds(self.0 / Self::PER_SECOND)?;
        let nanos = TimeDelta::nanoseconds((self.0 % Self::PER_SECOND) * 100);
        epoch.checked_add_signed(seconds)?.checked_add_signed(nanos)
    }
}

/// Result of decoding a tag-prefixed numeric leaf.
///
/// Small non-negative values are stored inline as the tag itself and come
/// back as [`EncodedConstant::UShort`].
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedConstant
{
    Char(i8),
    Short(i16),
    UShort(u16),
    Long(i32),
    ULong(u32),
    QuadWord(i64),
    UQuadWord(u64),
    Real32(f32),
    Real64(f64),
    VarString(String),
    Decimal(PackedDecimal),
    Date(Ticks),
}

impl EncodedConstant
{
    /// Integral value of the constant, if it is one of the integer leaves.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128>
    {
        match *self {
            Self::Char(v) => Some(i128::from(v)),
            Self::Short(v) => Some(i128::from(v)),
            Self::UShort(v) => Some(i128::from(v)),
            Self::Long(v) => Some(i128::from(v)),
            Self::ULong(v) => Some(i128::from(v)),
            Self::QuadWord(v) => Some(i128::from(v)),
            Self::UQuadWord(v) => Some(i128::from(v)),
            Self::Real32(_) | Self::Real64(_) | Self::VarString(_) | Self::Decimal(_) | Self::Date(_) => None,
        }
    }

    /// Integral value as `u64`, for sizes and counts. Negative values give `None`.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64>
    {
        self.as_i128().and_then(|v| u64::try_from(v).ok())
    }
}

impl fmt::Display for EncodedConstant
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::Char(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::UShort(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::ULong(v) => write!(f, "{v}"),
            Self::QuadWord(v) => write!(f, "{v}"),
            Self::UQuadWord(v) => write!(f, "{v}"),
            Self::Real32(v) => write!(f, "{v}"),
            Self::Real64(v) => write!(f, "{v}"),
            Self::VarString(v) => write!(f, "{v:?}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Date(ticks) => match ticks.to_datetime() {
                Some(date) => write!(f, "{date}"),
                None => write!(f, "<{} ticks>", ticks.0),
            },
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_guid_display()
    {
        let guid = Guid {
            data1: 0x1234_5678,
            data2: 0x9abc,
            data3: 0xdef0,
            data4: [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef],
        };
        assert_eq!(guid.to_string(), "12345678-9abc-def0-0123-456789abcdef");
    }

    #[test]
    fn test_decimal_display_applies_scale()
    {
        let value = PackedDecimal { negative: true, scale: 2, hi: 0, mid: 0, lo: 12345 };
        assert_eq!(value.to_string(), "-123.45");

        let small = PackedDecimal { negative: false, scale: 3, hi: 0, mid: 0, lo: 7 };
        assert_eq!(small.to_string(), "0.007");

        let whole = PackedDecimal { negative: false, scale: 0, hi: 0, mid: 1, lo: 0 };
        assert_eq!(whole.to_string(), "4294967296");
    }

    #[test]
    fn test_decimal_to_f64()
    {
        let value = PackedDecimal { negative: true, scale: 1, hi: 0, mid: 0, lo: 25 };
        assert!((value.to_f64() + 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ticks_to_datetime()
    {
        let epoch = Ticks(0).to_datetime().unwrap();
        assert_eq!(epoch.to_string(), "0001-01-01 00:00:00");

        let one_and_a_half_seconds = Ticks(15_000_000).to_datetime().unwrap();
        assert_eq!(one_and_a_half_seconds.to_string(), "0001-01-01 00:00:01.500");

        assert!(Ticks(-1).to_datetime().is_none());
    }

    #[test]
    fn test_constant_integral_views()
    {
        assert_eq!(EncodedConstant::Char(-3).as_i128(), Some(-3));
        assert_eq!(EncodedConstant::UQuadWord(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(EncodedConstant::Long(-1).as_u64(), None);
        assert_eq!(EncodedConstant::Real32(1.0).as_i128(), None);
    }
}
