//! The filesystem surface answered to the host bridge: `getattr`,
//! `readdir` and `read`.
//!
//! [`FluxFs`] serves an immutable [`Namespace`] built at startup. Descriptor
//! loads are lazy by default and single-flight: concurrent first reads of
//! the same virtual file block on one loader and share the resulting
//! [`Vf`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use moka::sync::Cache;
use tracing::{debug, warn};

use crate::namespace::{FileStub, LookupError, Namespace, NodeRef};
use crate::parser::vf::load_vf;
use crate::vf::Vf;

/// Result of [`Volume`] operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Default capacity of the loaded-descriptor cache.
const CACHE_CAPACITY: u64 = 1024;

/// Errors surfaced to the bridge, one per POSIX code it expects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// No entry exists at the requested path.
    NoEntry,
    /// A non-final path component is not a directory.
    NotDir,
    /// `read` targeted a directory.
    IsDir,
    /// A descriptor load or backing-file read failed.
    IO,
}

impl Error {
    /// The negative errno the bridge reports to the kernel.
    pub fn errno(&self) -> i32 {
        match self {
            Error::NoEntry => -libc::ENOENT,
            Error::NotDir => -libc::ENOTDIR,
            Error::IsDir => -libc::EISDIR,
            Error::IO => -libc::EIO,
        }
    }
}

impl From<LookupError> for Error {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NoEntry => Error::NoEntry,
            LookupError::NotDir => Error::NotDir,
        }
    }
}

/// Timestamp reported by [`Stat`].
#[derive(Debug, Copy, Clone)]
pub struct Time {
    pub seconds: i64,
    pub nanos: u32,
}

/// Attributes answered by [`Volume::get_attr`].
#[derive(Debug, Copy, Clone)]
pub struct Stat {
    pub mode: u32,
    pub nlink: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub atime: Time,
    pub mtime: Time,
}

/// One name yielded by [`Volume::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
}

/// Operation set required by the host filesystem bridge.
#[async_trait]
pub trait Volume: Send + Sync {
    /// Reports attributes for the entry at `path`.
    async fn get_attr(&self, path: &str) -> Result<Stat>;

    /// Lists the directory at `path`: `.`, `..`, then each subdirectory,
    /// then each file, in insertion order.
    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>>;

    /// Reads up to `size` bytes of the file at `path` starting at `offset`.
    /// A short or empty result past end of file is not an error.
    async fn read(&self, path: &str, offset: u64, size: u32) -> Result<Vec<u8>>;
}

/// Mount-time options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Load every descriptor at mount instead of on first read.
    pub eager_load: bool,
    /// Capacity of the loaded-descriptor cache.
    pub cache_capacity: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self { eager_load: false, cache_capacity: CACHE_CAPACITY }
    }
}

/// Read-only volume over a namespace of virtual files.
pub struct FluxFs {
    namespace: Namespace,
    loaded: Cache<PathBuf, Arc<Vf>>,
}

impl FluxFs {
    /// Wraps a built namespace, optionally preloading every descriptor.
    pub fn mount(namespace: Namespace, options: Options) -> Self {
        let fs = Self { namespace, loaded: Cache::new(options.cache_capacity) };
        if options.eager_load {
            fs.preload();
        }
        fs
    }

    /// The namespace this volume serves.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn preload(&self) {
        for stub in self.namespace.stubs() {
            // A failed load stays out of the cache; the read path retries
            // and reports -EIO if the descriptor is still unreadable.
            let _ = self.vf_for(stub);
        }
    }

    /// Fetches the loaded descriptor for a stub, loading at most once even
    /// across concurrent readers.
    fn vf_for(&self, stub: &FileStub) -> Result<Arc<Vf>> {
        self.loaded
            .try_get_with(stub.descriptor.clone(), || {
                debug!(descriptor = %stub.descriptor.display(), "loading virtual file");
                load_vf(&stub.descriptor).map(Arc::new)
            })
            .map_err(|err| {
                warn!(descriptor = %stub.descriptor.display(), ?err, "descriptor load failed");
                Error::IO
            })
    }
}

fn now() -> Time {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    Time { seconds: elapsed.as_secs() as i64, nanos: elapsed.subsec_nanos() }
}

fn dir_stat() -> Stat {
    let time = now();
    Stat {
        mode: libc::S_IFDIR as u32 | 0o755,
        nlink: 2,
        uid: unsafe { libc::getuid() },
        gid: unsafe { libc::getgid() },
        size: 0,
        atime: time,
        mtime: time,
    }
}

fn file_stat(size: u64) -> Stat {
    let time = now();
    Stat {
        mode: libc::S_IFREG as u32 | 0o644,
        nlink: 1,
        uid: unsafe { libc::getuid() },
        gid: unsafe { libc::getgid() },
        size,
        atime: time,
        mtime: time,
    }
}

#[async_trait]
impl Volume for FluxFs {
    async fn get_attr(&self, path: &str) -> Result<Stat> {
        match self.namespace.resolve(path)? {
            NodeRef::Dir(_) => Ok(dir_stat()),
            NodeRef::File(stub) => Ok(file_stat(stub.size)),
        }
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let dir = match self.namespace.resolve(path)? {
            NodeRef::Dir(dir) => dir,
            NodeRef::File(_) => return Err(Error::NotDir),
        };
        let mut entries = Vec::with_capacity(dir.dirs().len() + dir.files().len() + 2);
        entries.push(DirEntry { name: ".".to_owned() });
        entries.push(DirEntry { name: "..".to_owned() });
        entries.extend(dir.dirs().iter().map(|sub| DirEntry { name: sub.name().to_owned() }));
        entries.extend(dir.files().iter().map(|file| DirEntry { name: file.name.clone() }));
        Ok(entries)
    }

    async fn read(&self, path: &str, offset: u64, size: u32) -> Result<Vec<u8>> {
        let stub = match self.namespace.resolve(path)? {
            NodeRef::File(stub) => stub,
            NodeRef::Dir(_) => return Err(Error::IsDir),
        };
        let vf = self.vf_for(stub)?;
        // Never allocate past the loaded size, whatever the bridge asks for.
        let want = (size as u64).min(vf.size().saturating_sub(offset)) as usize;
        let mut buf = vec![0u8; want];
        let copied = vf.read_at(&mut buf, offset).map_err(|err| {
            warn!(path, %err, "backing-file read failed");
            Error::IO
        })?;
        buf.truncate(copied);
        Ok(buf)
    }
}
