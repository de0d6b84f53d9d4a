//! Scan-root configuration and `.vf` discovery.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::warn;

/// File-name extension identifying virtual-file descriptors.
pub const VF_EXTENSION: &str = "vf";

/// Reads the scan-root list: one directory per line, UTF-8, `\n` or `\r\n`
/// terminated, blank lines skipped.
pub fn read_conf(path: &Path) -> io::Result<Vec<PathBuf>> {
    let file = fs::File::open(path)?;
    parse_conf(BufReader::new(file))
}

fn parse_conf(src: impl BufRead) -> io::Result<Vec<PathBuf>> {
    let mut roots = Vec::new();
    for line in src.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        roots.push(PathBuf::from(line));
    }
    Ok(roots)
}

/// Walks every scan root depth-first and collects the path of each regular
/// file carrying the [`VF_EXTENSION`]. Symlinks are followed; unreadable
/// directories are logged and skipped.
pub fn find_virtual_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for root in roots {
        walk(root, &mut found);
    }
    found
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(directory = %dir.display(), %err, "skipping unreadable directory");
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(directory = %dir.display(), %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        // fs::metadata follows symlinks, so a linked directory is descended
        // into and a linked descriptor is collected.
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable entry");
                continue;
            }
        };
        if metadata.is_dir() {
            walk(&path, found);
        } else if metadata.is_file()
            && path.extension().is_some_and(|extension| extension == VF_EXTENSION)
        {
            found.push(path);
        }
    }
}
