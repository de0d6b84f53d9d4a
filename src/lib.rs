//! FluxFS - a read-only user-space filesystem whose files are composed on
//! demand from inline byte blobs and byte ranges of external host files.

pub mod config;
pub mod namespace;
pub mod parser;
pub mod scan;
pub mod serializer;
pub mod vf;
pub mod volume;

use std::io;
use std::path::Path;

use tracing::info;

use crate::namespace::Namespace;
use crate::volume::{FluxFs, Options};

/// Discovers every descriptor under the scan roots listed in `conf` and
/// assembles the volume served to the bridge.
pub fn build_volume(conf: &Path, options: Options) -> io::Result<FluxFs> {
    let roots = scan::read_conf(conf)?;
    let descriptors = scan::find_virtual_files(&roots);
    info!(roots = roots.len(), descriptors = descriptors.len(), "scan complete");
    let namespace = Namespace::build(&descriptors);
    info!(files = namespace.file_count(), "namespace built");
    Ok(FluxFs::mount(namespace, options))
}
