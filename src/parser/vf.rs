//! Descriptor loading.
//!
//! [`parse`] decodes a descriptor from any byte stream without touching the
//! host filesystem; [`load_vf`] wraps it for on-disk descriptors and opens
//! the backing files named by the path table, resolving relative entries
//! against the directory containing the descriptor.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::warn;

use super::primitive::{cstring, u16, u8, width_value};
use super::{Error, Result};
use crate::vf::{
    Entry, Vf, WidthCode, KIND_EXTERNAL, LENGTH_WIDTH_SHIFT, OFFSET_WIDTH_SHIFT,
    PATH_INDEX_EXTENDED, PATH_INDEX_SHIFT, SIGNATURE,
};

/// Decodes the bytes stored for a path, accepting invalid UTF-8 lossily.
fn path_string(bytes: Vec<u8>, what: &str, origin: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(string) => string,
        Err(err) => {
            warn!(descriptor = %origin.display(), "{what} is not valid UTF-8");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

/// Reads the signature and virtual path, leaving the stream at the path table.
fn header(src: &mut impl Read, origin: &Path) -> Result<String> {
    let signature = cstring(src, SIGNATURE.len() + 1)?;
    if signature != SIGNATURE.as_bytes() {
        return Err(Error::BadSignature);
    }
    let vpath_len = u16(src)? as usize;
    let vpath = cstring(src, vpath_len)?;
    Ok(path_string(vpath, "virtual path", origin))
}

/// Reads one fragment record, the type byte already consumed.
fn fragment(src: &mut impl Read, type_byte: u8, path_count: u8) -> Result<Entry> {
    let length = width_value(src, WidthCode::from_bits(type_byte >> LENGTH_WIDTH_SHIFT))?;
    if type_byte & KIND_EXTERNAL == 0 {
        let mut bytes = Vec::new();
        let read = src.take(length).read_to_end(&mut bytes).map_err(Error::from_io)?;
        if (read as u64) < length {
            return Err(Error::UnexpectedEof);
        }
        return Ok(Entry::Inline { bytes });
    }

    let offset = width_value(src, WidthCode::from_bits(type_byte >> OFFSET_WIDTH_SHIFT))?;
    let code = type_byte >> PATH_INDEX_SHIFT;
    let path_index = if code == PATH_INDEX_EXTENDED { u8(src)? } else { code };
    if path_index >= path_count {
        return Err(Error::BadReference { index: path_index, count: path_count });
    }
    Ok(Entry::External { length, offset, path_index })
}

/// Decodes a whole descriptor from `src`.
///
/// Stream end before a fragment type byte is the normal terminator; stream
/// end anywhere inside a record is [`Error::UnexpectedEof`]. Backing files
/// are not opened; every path-table slot of the returned [`Vf`] is unbound.
pub fn parse(src: &mut impl Read, origin: &Path) -> Result<Vf> {
    let vpath = header(src, origin)?;

    let count = u8(src)?;
    let mut paths = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let path_len = u16(src)? as usize;
        let raw = cstring(src, path_len)?;
        paths.push(path_string(raw, "external path", origin));
    }

    let mut entries = Vec::new();
    let mut size: u64 = 0;
    loop {
        let type_byte = match u8(src) {
            Ok(byte) => byte,
            Err(Error::UnexpectedEof) => break,
            Err(err) => return Err(err),
        };
        let entry = fragment(src, type_byte, count)?;
        size = size.checked_add(entry.length()).ok_or_else(|| {
            Error::IO(io::Error::new(io::ErrorKind::InvalidData, "virtual size overflows u64"))
        })?;
        entries.push(entry);
    }

    let files = paths.iter().map(|_| None).collect();
    Ok(Vf { vpath, paths, files, entries, size })
}

/// Opens every path-table entry for reading, resolving relative paths
/// against `base`.
fn open_externals(vf: &mut Vf, base: &Path) -> Result<()> {
    for (slot, path) in vf.paths.iter().enumerate() {
        let resolved = base.join(path);
        let file = File::open(&resolved)
            .map_err(|source| Error::ExternalOpenFailed { path: resolved.clone(), source })?;
        vf.files[slot] = Some(file);
    }
    Ok(())
}

/// Loads a descriptor from disk, opening its backing files.
pub fn load_vf(path: &Path) -> Result<Vf> {
    let file = File::open(path).map_err(Error::IO)?;
    let mut src = BufReader::new(file);
    let mut vf = parse(&mut src, path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    open_externals(&mut vf, base)?;
    Ok(vf)
}

/// Reads only the signature and virtual path of a descriptor.
pub fn read_vpath(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(Error::IO)?;
    let mut src = BufReader::new(file);
    header(&mut src, path)
}

/// Loads a descriptor to learn its total logical size, then releases it.
pub fn read_vf_size(path: &Path) -> Result<u64> {
    Ok(load_vf(path)?.size())
}
