//! Descriptor decoding: primitives, header, path table, fragment records.

pub mod primitive;
pub mod vf;

#[cfg(test)]
mod tests;

use std::io;
use std::path::PathBuf;

/// Result of parsing operations with error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding a `.vf` descriptor.
///
/// None of these abort the process: a failed descriptor is skipped and the
/// scan moves on.
#[derive(Debug)]
pub enum Error {
    /// The stream ended before a record was fully read.
    UnexpectedEof,
    /// The descriptor does not begin with the FluxFS signature.
    BadSignature,
    /// A fragment names a path-table slot that was never defined.
    BadReference {
        /// Index the fragment asked for.
        index: u8,
        /// Number of entries the table actually holds.
        count: u8,
    },
    /// A backing file named by the path table could not be opened.
    ExternalOpenFailed {
        /// Resolved path of the backing file.
        path: PathBuf,
        /// Open failure reported by the host.
        source: io::Error,
    },
    /// Read failure other than end of stream.
    IO(io::Error),
}

impl Error {
    /// Classifies an I/O failure, folding short reads into [`Error::UnexpectedEof`].
    pub(crate) fn from_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::IO(err)
        }
    }
}
