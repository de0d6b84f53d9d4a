//! Random-access reads across the fragment list.

use std::io;
use std::os::unix::fs::FileExt;

use super::{Entry, Vf};

impl Vf {
    /// Copies up to `buf.len()` bytes of the logical byte stream starting at
    /// `offset` into `buf`, returning the number of bytes copied.
    ///
    /// Requests starting at or past [`Vf::size`] return `Ok(0)`. A seek or
    /// short read on a backing file aborts the call with the underlying
    /// error; the virtual file stays usable for later reads.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let mut offset = offset;
        let mut remaining = buf.len();
        let mut copied = 0usize;
        let mut frag_start = 0u64;

        for entry in &self.entries {
            if remaining == 0 {
                break;
            }
            let frag_end = frag_start + entry.length();
            if offset >= frag_start && offset < frag_end {
                let entry_offset = offset - frag_start;
                let available = entry.length() - entry_offset;
                let to_copy = available.min(remaining as u64) as usize;
                let dest = &mut buf[copied..copied + to_copy];
                match entry {
                    Entry::Inline { bytes } => {
                        let start = entry_offset as usize;
                        dest.copy_from_slice(&bytes[start..start + to_copy]);
                    }
                    Entry::External { offset: file_offset, path_index, .. } => {
                        let file = self
                            .files
                            .get(*path_index as usize)
                            .and_then(Option::as_ref)
                            .ok_or_else(|| {
                                io::Error::new(
                                    io::ErrorKind::NotConnected,
                                    "backing file is not open",
                                )
                            })?;
                        let position = file_offset.checked_add(entry_offset).ok_or_else(|| {
                            io::Error::new(
                                io::ErrorKind::InvalidInput,
                                "backing-file offset overflows u64",
                            )
                        })?;
                        file.read_exact_at(dest, position)?;
                    }
                }
                copied += to_copy;
                remaining -= to_copy;
                offset += to_copy as u64;
            }
            frag_start = frag_end;
        }

        Ok(copied)
    }
}
