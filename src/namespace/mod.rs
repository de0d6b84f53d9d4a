//! The virtual directory tree assembled from discovered descriptors.
//!
//! The tree is built once at startup and never mutated afterwards, so
//! lookups run without synchronisation. Ownership is strictly top-down: a
//! directory owns its children and nothing points back up.

use std::fmt::Write;
use std::path::PathBuf;

use tracing::warn;

use crate::parser::vf::{read_vf_size, read_vpath};

/// A leaf of the tree: one virtual file and where its descriptor lives.
#[derive(Debug, Clone)]
pub struct FileStub {
    /// Name within the parent directory.
    pub name: String,
    /// Declared logical size in bytes.
    pub size: u64,
    /// Location of the `.vf` descriptor on the host.
    pub descriptor: PathBuf,
}

/// An internal node: a named directory with ordered children.
#[derive(Debug, Default)]
pub struct Directory {
    name: String,
    dirs: Vec<Directory>,
    files: Vec<FileStub>,
}

impl Directory {
    /// Name within the parent directory; empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child directories in insertion order.
    pub fn dirs(&self) -> &[Directory] {
        &self.dirs
    }

    /// Files in insertion order.
    pub fn files(&self) -> &[FileStub] {
        &self.files
    }

    fn child_dir(&self, name: &str) -> Option<&Directory> {
        self.dirs.iter().find(|dir| dir.name == name)
    }

    fn child_file(&self, name: &str) -> Option<&FileStub> {
        self.files.iter().find(|file| file.name == name)
    }

    /// Returns the named child directory, creating it when absent.
    fn child_dir_entry(&mut self, name: &str) -> &mut Directory {
        let position = match self.dirs.iter().position(|dir| dir.name == name) {
            Some(position) => position,
            None => {
                self.dirs.push(Directory { name: name.to_owned(), ..Directory::default() });
                self.dirs.len() - 1
            }
        };
        &mut self.dirs[position]
    }
}

/// Either kind of tree node, borrowed during lookup.
#[derive(Debug)]
pub enum NodeRef<'a> {
    Dir(&'a Directory),
    File(&'a FileStub),
}

/// Why a lookup failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No entry with the requested name exists.
    NoEntry,
    /// A non-final path component named a file.
    NotDir,
}

/// The namespace served by the filesystem surface.
#[derive(Debug, Default)]
pub struct Namespace {
    root: Directory,
}

impl Namespace {
    /// Builds the tree from discovered descriptor paths.
    ///
    /// Each descriptor contributes its virtual path and declared size; any
    /// descriptor that fails to parse is skipped with a warning and the rest
    /// of the namespace is still served.
    pub fn build(descriptors: &[PathBuf]) -> Self {
        let mut namespace = Namespace::default();
        for descriptor in descriptors {
            let vpath = match read_vpath(descriptor) {
                Ok(vpath) => vpath,
                Err(err) => {
                    warn!(descriptor = %descriptor.display(), ?err, "skipping descriptor");
                    continue;
                }
            };
            let size = match read_vf_size(descriptor) {
                Ok(size) => size,
                Err(err) => {
                    warn!(descriptor = %descriptor.display(), ?err, "skipping descriptor");
                    continue;
                }
            };
            namespace.insert(&vpath, size, descriptor.clone());
        }
        namespace
    }

    /// The anonymous root directory.
    pub fn root(&self) -> &Directory {
        &self.root
    }

    /// Inserts one virtual file, creating intermediate directories as
    /// needed. On a name collision the existing entry wins and `false` is
    /// returned.
    pub fn insert(&mut self, vpath: &str, size: u64, descriptor: PathBuf) -> bool {
        let mut components: Vec<&str> =
            vpath.split('/').filter(|component| !component.is_empty()).collect();
        let Some(file_name) = components.pop() else {
            warn!(%vpath, descriptor = %descriptor.display(), "descriptor has an empty virtual path");
            return false;
        };

        let mut current = &mut self.root;
        for component in components {
            if current.child_file(component).is_some() {
                warn!(%vpath, component, "virtual path collides with an existing file");
                return false;
            }
            current = current.child_dir_entry(component);
        }

        if current.child_dir(file_name).is_some() || current.child_file(file_name).is_some() {
            warn!(%vpath, "virtual path collides with an existing entry");
            return false;
        }
        current.files.push(FileStub { name: file_name.to_owned(), size, descriptor });
        true
    }

    /// Resolves a `/`-separated path to a tree node. The empty path (any
    /// run of separators) names the root.
    pub fn resolve(&self, path: &str) -> Result<NodeRef<'_>, LookupError> {
        let mut components =
            path.split('/').filter(|component| !component.is_empty()).peekable();
        let mut current = &self.root;
        while let Some(component) = components.next() {
            if components.peek().is_none() {
                if let Some(dir) = current.child_dir(component) {
                    return Ok(NodeRef::Dir(dir));
                }
                if let Some(file) = current.child_file(component) {
                    return Ok(NodeRef::File(file));
                }
                return Err(LookupError::NoEntry);
            }
            current = match current.child_dir(component) {
                Some(dir) => dir,
                None if current.child_file(component).is_some() => {
                    return Err(LookupError::NotDir)
                }
                None => return Err(LookupError::NoEntry),
            };
        }
        Ok(NodeRef::Dir(current))
    }

    /// Every file stub in the tree, depth first.
    pub fn stubs(&self) -> Vec<&FileStub> {
        let mut stubs = Vec::new();
        collect_stubs(&self.root, &mut stubs);
        stubs
    }

    /// Number of virtual files in the tree.
    pub fn file_count(&self) -> usize {
        self.stubs().len()
    }

    /// Renders the tree as an indented listing.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_dir(&self.root, 0, &mut out);
        out
    }
}

fn collect_stubs<'a>(dir: &'a Directory, stubs: &mut Vec<&'a FileStub>) {
    stubs.extend(dir.files.iter());
    for sub in &dir.dirs {
        collect_stubs(sub, stubs);
    }
}

fn render_dir(dir: &Directory, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let name = if dir.name.is_empty() { "/" } else { &dir.name };
    let _ = writeln!(out, "{indent}[dir] {name}");
    for file in &dir.files {
        let _ = writeln!(out, "{indent}  {} ({} bytes)", file.name, file.size);
    }
    for sub in &dir.dirs {
        render_dir(sub, depth + 1, out);
    }
}
