#![cfg(test)]

use std::io::Cursor;
use std::path::Path;

use crate::parser;
use crate::serializer::vf::write_vf;
use crate::vf::{Entry, Vf};

fn written(vf: &Vf) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_vf(vf, &mut bytes).expect("serialize descriptor");
    bytes
}

#[test]
fn test_golden_layout() {
    let mut vf = Vf::new("a/b");
    vf.add_path("s.bin").unwrap();
    vf.add_data(&[0xAA, 0xBB]);
    vf.add_file_offset(0, 3, 9).unwrap();

    let expected = [
        &b"FluxFS VF\0"[..],
        &[4, 0][..],                   // vpath length, terminator included
        &b"a/b\0"[..],
        &[1][..],                      // stringCount
        &[6, 0][..],
        &b"s.bin\0"[..],
        &[0b0000_0000, 2, 0xAA, 0xBB][..],   // inline, u8 length
        &[0b0000_0001, 3, 9][..],            // external, u8 length, u8 offset, index 0
    ]
    .concat();
    assert_eq!(written(&vf), expected);
}

#[test]
fn test_width_minimality() {
    // A 3-byte inline fragment keeps every width field at one byte.
    let mut vf = Vf::new("v");
    vf.add_data(&[1, 2, 3]);
    let bytes = written(&vf);
    let record = &bytes[bytes.len() - 5..];
    assert_eq!(record, [0b0000_0000, 3, 1, 2, 3]);

    // length 300 needs a u16, offset 70 000 a u32.
    let mut vf = Vf::new("v");
    vf.add_path("s.bin").unwrap();
    vf.add_file_offset(0, 300, 70_000).unwrap();
    let bytes = written(&vf);
    let record = &bytes[bytes.len() - 7..];
    assert_eq!(record[0], 0b0001_0011);
    assert_eq!(&record[1..3], [0x2C, 0x01]); // 300
    assert_eq!(&record[3..7], [0x70, 0x11, 0x01, 0x00]); // 70 000
}

#[test]
fn test_direct_path_index_is_packed_into_the_type_byte() {
    let mut vf = Vf::new("v");
    for i in 0..7 {
        vf.add_path(format!("p{i}")).unwrap();
    }
    vf.add_file_offset(6, 1, 0).unwrap();
    let bytes = written(&vf);
    let record = &bytes[bytes.len() - 3..];
    assert_eq!(record, [0b1100_0001, 1, 0]);
}

#[test]
fn test_extended_path_index_writes_the_overflow_byte() {
    let mut vf = Vf::new("v");
    for i in 0..8 {
        vf.add_path(format!("p{i}")).unwrap();
    }
    vf.add_file_offset(7, 1, 0).unwrap();
    let bytes = written(&vf);
    let record = &bytes[bytes.len() - 4..];
    assert_eq!(record, [0b1110_0001, 1, 0, 7]);
}

#[test]
fn test_round_trip_preserves_logical_content() {
    let mut vf = Vf::new("dir/file.bin");
    let index = vf.add_path("backing.bin").unwrap();
    vf.add_data(&[0x10; 300]);
    vf.add_file_offset(index, 70_000, u32::MAX as u64 + 1).unwrap();
    vf.add_data(&[]);

    let bytes = written(&vf);
    let parsed = parser::vf::parse(&mut Cursor::new(&bytes), Path::new("round.vf")).unwrap();

    assert_eq!(parsed.vpath(), vf.vpath());
    assert_eq!(parsed.size(), vf.size());
    assert_eq!(parsed.paths(), vf.paths());
    assert_eq!(parsed.entries(), vf.entries());
}

#[test]
fn test_save_load_save_is_byte_identical() {
    let mut vf = Vf::new("x/y/z");
    for i in 0..9 {
        vf.add_path(format!("p{i}.bin")).unwrap();
    }
    vf.add_data(&[7; 42]);
    vf.add_file_offset(8, 65_536, 255).unwrap();
    vf.add_file_offset(2, 1, 0).unwrap();

    let first = written(&vf);
    let parsed = parser::vf::parse(&mut Cursor::new(&first), Path::new("round.vf")).unwrap();
    let second = written(&parsed);
    assert_eq!(first, second);
}

#[test]
fn test_empty_inline_fragment_round_trips() {
    let mut vf = Vf::new("v");
    vf.add_data(&[]);
    let bytes = written(&vf);
    let parsed = parser::vf::parse(&mut Cursor::new(&bytes), Path::new("empty.vf")).unwrap();
    assert_eq!(parsed.entries(), [Entry::Inline { bytes: Vec::new() }]);
    assert_eq!(parsed.size(), 0);
}
