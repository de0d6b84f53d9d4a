//! Little-endian serialization for virtual-file descriptors.
//!
//! All multi-byte integers are written little-endian; strings are written as
//! raw bytes followed by a NUL terminator, preceded elsewhere by their
//! on-disk length (terminator included).

pub mod vf;

#[cfg(test)]
mod tests;

use std::io::{self, Error, ErrorKind, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use num_traits::ToPrimitive;

use crate::vf::WidthCode;

/// Serializes a `u8` (byte).
pub fn u8(dest: &mut dyn Write, n: u8) -> io::Result<()> {
    dest.write_u8(n)
}

/// Serializes a `u16` in little-endian order.
pub fn u16(dest: &mut dyn Write, n: u16) -> io::Result<()> {
    dest.write_u16::<LittleEndian>(n)
}

/// Serializes a `u32` in little-endian order.
pub fn u32(dest: &mut dyn Write, n: u32) -> io::Result<()> {
    dest.write_u32::<LittleEndian>(n)
}

/// Serializes a `u64` in little-endian order.
pub fn u64(dest: &mut dyn Write, n: u64) -> io::Result<()> {
    dest.write_u64::<LittleEndian>(n)
}

/// Serializes a length or offset field at the width selected by `code`.
pub fn width_value(dest: &mut dyn Write, code: WidthCode, value: u64) -> io::Result<()> {
    match code {
        WidthCode::U8 => dest.write_u8(value as u8),
        WidthCode::U16 => dest.write_u16::<LittleEndian>(value as u16),
        WidthCode::U32 => dest.write_u32::<LittleEndian>(value as u32),
        WidthCode::U64 => dest.write_u64::<LittleEndian>(value),
    }
}

/// Serializes a string as its bytes followed by the NUL terminator.
pub fn cstring(dest: &mut dyn Write, s: &str) -> io::Result<()> {
    dest.write_all(s.as_bytes())?;
    dest.write_u8(0)
}

/// Serializes a string's on-disk length (terminator included) as a `u16`.
pub fn cstring_len(dest: &mut dyn Write, s: &str) -> io::Result<()> {
    usize_as_u16(dest, s.len() + 1)
}

/// Serializes a Rust `usize` as a `u16`, failing on overflow.
pub fn usize_as_u16(dest: &mut dyn Write, n: usize) -> io::Result<()> {
    u16(dest, n.to_u16().ok_or(Error::new(ErrorKind::InvalidInput, "length exceeds u16"))?)
}

/// Serializes a Rust `usize` as a `u8`, failing on overflow.
pub fn usize_as_u8(dest: &mut dyn Write, n: usize) -> io::Result<()> {
    u8(dest, n.to_u8().ok_or(Error::new(ErrorKind::InvalidInput, "count exceeds u8"))?)
}
