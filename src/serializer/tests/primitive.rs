#![cfg(test)]

use crate::serializer::{cstring, cstring_len, u16, u32, u64, usize_as_u16, usize_as_u8, width_value};
use crate::vf::WidthCode;

#[test]
fn test_integers_are_little_endian() {
    let mut dest = Vec::new();
    u16(&mut dest, 0x0201).unwrap();
    u32(&mut dest, 0x0605_0403).unwrap();
    u64(&mut dest, 0x0E0D_0C0B_0A09_0807).unwrap();
    assert_eq!(dest, (1u8..=14).collect::<Vec<_>>());
}

#[test]
fn test_width_value_each_code() {
    let mut dest = Vec::new();
    width_value(&mut dest, WidthCode::U8, 0x2A).unwrap();
    assert_eq!(dest, [0x2A]);

    let mut dest = Vec::new();
    width_value(&mut dest, WidthCode::U16, 0x0201).unwrap();
    assert_eq!(dest, [0x01, 0x02]);

    let mut dest = Vec::new();
    width_value(&mut dest, WidthCode::U32, 0x0403_0201).unwrap();
    assert_eq!(dest, [0x01, 0x02, 0x03, 0x04]);

    let mut dest = Vec::new();
    width_value(&mut dest, WidthCode::U64, 0x8000_0000_0000_0001).unwrap();
    assert_eq!(dest, [0x01, 0, 0, 0, 0, 0, 0, 0x80]);
}

#[test]
fn test_cstring_appends_terminator() {
    let mut dest = Vec::new();
    cstring(&mut dest, "abc").unwrap();
    assert_eq!(dest, b"abc\0");
}

#[test]
fn test_cstring_len_counts_terminator() {
    let mut dest = Vec::new();
    cstring_len(&mut dest, "abc").unwrap();
    assert_eq!(dest, [4, 0]);
}

#[test]
fn test_usize_overflow_is_rejected() {
    let mut dest = Vec::new();
    assert!(usize_as_u16(&mut dest, 65536).is_err());
    assert!(usize_as_u8(&mut dest, 256).is_err());
    assert!(usize_as_u16(&mut dest, 65535).is_ok());
    assert!(usize_as_u8(&mut dest, 255).is_ok());
}
