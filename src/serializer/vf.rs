//! Width-minimal descriptor encoding.
//!
//! Identical logical content always produces byte-identical descriptors:
//! every length and offset field uses the smallest width that can represent
//! its value, and path indices at most [`DIRECT_PATH_INDEX_MAX`] are packed
//! into the type byte itself.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::{cstring, cstring_len, u8, usize_as_u8, width_value};
use crate::vf::{
    Entry, Vf, WidthCode, KIND_EXTERNAL, LENGTH_WIDTH_SHIFT, OFFSET_WIDTH_SHIFT,
    DIRECT_PATH_INDEX_MAX, PATH_INDEX_EXTENDED, PATH_INDEX_SHIFT, SIGNATURE,
};

/// Writes one fragment record.
fn fragment(dest: &mut dyn Write, entry: &Entry) -> io::Result<()> {
    let length = entry.length();
    let length_code = WidthCode::minimal_for(length);
    match entry {
        Entry::Inline { bytes } => {
            u8(dest, (length_code as u8) << LENGTH_WIDTH_SHIFT)?;
            width_value(dest, length_code, length)?;
            dest.write_all(bytes)
        }
        Entry::External { offset, path_index, .. } => {
            let offset_code = WidthCode::minimal_for(*offset);
            let index_code = if *path_index > DIRECT_PATH_INDEX_MAX {
                PATH_INDEX_EXTENDED
            } else {
                *path_index
            };
            let type_byte = KIND_EXTERNAL
                | (length_code as u8) << LENGTH_WIDTH_SHIFT
                | (offset_code as u8) << OFFSET_WIDTH_SHIFT
                | index_code << PATH_INDEX_SHIFT;
            u8(dest, type_byte)?;
            width_value(dest, length_code, length)?;
            width_value(dest, offset_code, *offset)?;
            if index_code == PATH_INDEX_EXTENDED {
                u8(dest, *path_index)?;
            }
            Ok(())
        }
    }
}

/// Serializes a whole descriptor into `dest`.
pub fn write_vf(vf: &Vf, dest: &mut dyn Write) -> io::Result<()> {
    cstring(dest, SIGNATURE)?;
    cstring_len(dest, vf.vpath())?;
    cstring(dest, vf.vpath())?;
    usize_as_u8(dest, vf.paths().len())?;
    for path in vf.paths() {
        cstring_len(dest, path)?;
        cstring(dest, path)?;
    }
    for entry in vf.entries() {
        fragment(dest, entry)?;
    }
    Ok(())
}

/// Serializes `vf` to a descriptor file at `path`.
pub fn save_vf(vf: &Vf, path: &Path) -> io::Result<()> {
    let mut dest = BufWriter::new(File::create(path)?);
    write_vf(vf, &mut dest)?;
    dest.flush()
}
