//! Primitive little-endian reads over a byte stream.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{Error, Result};
use crate::vf::WidthCode;

/// Parses a `u8` (byte) from the `Read` source.
pub fn u8(src: &mut impl Read) -> Result<u8> {
    src.read_u8().map_err(Error::from_io)
}

/// Parses a `u16` from the `Read` source, in little-endian order.
pub fn u16(src: &mut impl Read) -> Result<u16> {
    src.read_u16::<LittleEndian>().map_err(Error::from_io)
}

/// Parses a `u32` from the `Read` source, in little-endian order.
pub fn u32(src: &mut impl Read) -> Result<u32> {
    src.read_u32::<LittleEndian>().map_err(Error::from_io)
}

/// Parses a `u64` from the `Read` source, in little-endian order.
pub fn u64(src: &mut impl Read) -> Result<u64> {
    src.read_u64::<LittleEndian>().map_err(Error::from_io)
}

/// Parses a length or offset field at the width selected by `code`.
pub fn width_value(src: &mut impl Read, code: WidthCode) -> Result<u64> {
    match code {
        WidthCode::U8 => u8(src).map(|value| value as u64),
        WidthCode::U16 => u16(src).map(|value| value as u64),
        WidthCode::U32 => u32(src).map(|value| value as u64),
        WidthCode::U64 => u64(src),
    }
}

/// Parses a NUL-terminated string of at most `cap` bytes, terminator included.
///
/// Consumption stops after the terminator, or once `cap` bytes have been
/// read, in which case termination is forced at the final slot. The returned
/// bytes never include the terminator.
pub fn cstring(src: &mut impl Read, cap: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut remaining = cap;
    while remaining > 0 {
        let byte = u8(src)?;
        remaining -= 1;
        if byte == 0 {
            return Ok(bytes);
        }
        bytes.push(byte);
    }
    bytes.pop();
    Ok(bytes)
}
