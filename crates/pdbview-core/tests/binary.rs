//! Tests for the binary decoding toolkit

use pdbview_core::binary::{BinaryReader, BinaryReaderExt, EncodedConstant, SliceReader, Ticks};
use pdbview_core::error::PdbError;

#[test]
fn test_encoded_constant_inline_value_consumes_only_tag()
{
    let data = [0x05, 0x00, 0xaa, 0xbb];
    let mut reader = SliceReader::new(&data);

    assert_eq!(reader.read_encoded_constant().unwrap(), EncodedConstant::UShort(5));
    assert_eq!(reader.position(), 2);
}

#[test]
fn test_encoded_constant_signed_short()
{
    let data = [0x01, 0x80, 0x01, 0x00];
    let mut reader = SliceReader::new(&data);

    let constant = reader.read_encoded_constant().unwrap();
    assert_eq!(constant, EncodedConstant::Short(1));
    assert_eq!(constant.as_i128(), Some(1));
    assert_eq!(reader.position(), 4);
}

#[test]
fn test_encoded_constant_string_and_date()
{
    let mut data = vec![0x10, 0x80, 0x02, 0x00, b'o', b'k'];
    data.extend_from_slice(&[0x1a, 0x80]);
    data.extend_from_slice(&(Ticks::PER_SECOND * 86_400).to_le_bytes());
    let mut reader = SliceReader::new(&data);

    assert_eq!(
        reader.read_encoded_constant().unwrap(),
        EncodedConstant::VarString("ok".to_string())
    );
    let EncodedConstant::Date(ticks) = reader.read_encoded_constant().unwrap() else {
        panic!("Expected a date constant");
    };
    assert_eq!(
        ticks.to_datetime().unwrap().to_string(),
        "0001-01-02 00:00:00"
    );
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_encoded_constant_unknown_tag_fails()
{
    let data = [0x7f, 0x80, 0x00, 0x00];
    let mut reader = SliceReader::with_base(&data, 0x40);

    assert!(matches!(
        reader.read_encoded_constant(),
        Err(PdbError::UnsupportedConstant {
            leaf: 0x807f,
            offset: 0x40
        })
    ));
}

#[test]
fn test_align_to_four()
{
    let data = [0u8; 8];
    let mut reader = SliceReader::new(&data);

    reader.set_position(3).unwrap();
    reader.align(4).unwrap();
    assert_eq!(reader.position(), 4);

    reader.align(4).unwrap();
    assert_eq!(reader.position(), 4);
}

#[test]
fn test_length_prefixed_strings()
{
    let data = [0x05, 0x00, b'h', b'e', b'l', b'l', b'o', 0x00, 0x00];
    let mut reader = SliceReader::new(&data);

    assert_eq!(reader.read_length_prefixed_string().unwrap(), "hello");
    assert_eq!(reader.read_length_prefixed_string().unwrap(), "");
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_read_f32_reinterprets_bits()
{
    let data = [0x00, 0x00, 0x80, 0x3f];
    let mut reader = SliceReader::new(&data);

    assert_eq!(reader.read_f32().unwrap(), 1.0);
}

#[test]
fn test_read_past_end_is_deterministic()
{
    let data = [0x01, 0x02, 0x03];
    let mut reader = SliceReader::new(&data);

    let err = reader.read_u32().unwrap_err();
    assert!(matches!(
        err,
        PdbError::UnexpectedEof {
            offset: 0,
            requested: 4,
            available: 3
        }
    ));
    // A failed read leaves the position alone
    assert_eq!(reader.position(), 0);
    assert_eq!(reader.read_u16().unwrap(), 0x0201);
}

#[test]
fn test_substream_shares_storage_and_has_own_position()
{
    let data = [0x10, 0x11, 0x12, 0x13, 0x14, 0x15];
    let mut parent = SliceReader::new(&data);
    parent.read_u8().unwrap();

    let mut child = parent.read_substream(Some(3)).unwrap();
    assert_eq!(parent.position(), 4);
    assert_eq!(child.position(), 0);
    assert_eq!(child.len(), 3);
    assert_eq!(child.as_slice().as_ptr(), data[1..].as_ptr());

    assert_eq!(child.read_u8().unwrap(), 0x11);
    assert_eq!(child.absolute_position(), 2);

    let rest = parent.read_substream(None).unwrap();
    assert_eq!(rest.as_slice(), &[0x14, 0x15]);
    assert_eq!(parent.remaining(), 0);
}

#[test]
fn test_substream_longer_than_remainder_fails()
{
    let data = [0u8; 4];
    let mut parent = SliceReader::new(&data);

    assert!(parent.read_substream(Some(5)).is_err());
    assert_eq!(parent.position(), 0);
}

#[test]
fn test_arrays_and_guid()
{
    let data = [
        0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0x01, 0x00, 0x02,
        0x00,
    ];
    let mut reader = SliceReader::new(&data);

    let guid = reader.read_guid().unwrap();
    assert_eq!(guid.to_string(), "00112233-4455-6677-8899-aabbccddeeff");
    assert_eq!(reader.read_u16_array(2).unwrap(), vec![1, 2]);
    assert_eq!(reader.position(), 20);
    assert!(reader.read_byte_array(1).is_err());
}

#[test]
fn test_packed_decimal()
{
    // -1.5: sign bit set, scale 1, mantissa 15 in the low word
    let mut data = Vec::new();
    for word in [0x8001_0000u32, 0, 15, 0] {
        data.extend_from_slice(&word.to_le_bytes());
    }
    let mut reader = SliceReader::new(&data);

    let decimal = reader.read_packed_decimal().unwrap();
    assert!(decimal.negative);
    assert_eq!(decimal.scale, 1);
    assert_eq!(decimal.mantissa(), 15);
    assert_eq!(decimal.to_string(), "-1.5");
}

#[test]
fn test_decimal_constant_uses_windows_layout()
{
    // LF_DECIMAL tag, then flags, Hi32, Lo32, Mid32
    let mut data = vec![0x19, 0x80];
    for word in [0u32, 0, 5, 0] {
        data.extend_from_slice(&word.to_le_bytes());
    }
    let mut reader = SliceReader::new(&data);

    let EncodedConstant::Decimal(decimal) = reader.read_encoded_constant().unwrap() else {
        panic!("Expected a decimal constant");
    };
    assert_eq!(decimal.to_string(), "5");
    assert_eq!(decimal.to_f64(), 5.0);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_toolkit_works_through_trait_objects()
{
    let data = [0x03, 0x00, b'a', b'b', b'c'];
    let mut reader = SliceReader::new(&data);
    let source: &mut dyn BinaryReader = &mut reader;

    assert_eq!(source.read_length_prefixed_string().unwrap(), "abc");
}
