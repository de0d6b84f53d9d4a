#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use fluxfs::parser::vf::load_vf;
use fluxfs::serializer::vf::save_vf;
use fluxfs::vf::Vf;

/// Bytes of the canonical backing file.
pub const SOURCE_BYTES: [u8; 25] = [
    0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0xFF, 0x12, 0x34, 0x40, 0x30, 0x64, 0x10, 0x92, 0x29, 0x43,
    0x78, 0x83, 0x37, 0x08, 0xCD, 0x44, 0xED, 0x02, 0xD3, 0xC0,
];

/// First inline fragment of the canonical virtual file.
pub const INLINE_HEAD: [u8; 10] =
    [0x45, 0x80, 0xF3, 0x12, 0x00, 0x5F, 0x1A, 0x31, 0x10, 0xF3];

/// Last inline fragment of the canonical virtual file.
pub const INLINE_TAIL: [u8; 10] =
    [0x78, 0x40, 0x21, 0x37, 0x98, 0xA2, 0xB9, 0x11, 0x23, 0x77];

/// The 30 logical bytes of the canonical virtual file: ten inline bytes,
/// ten bytes of `source.bin` starting at offset 5, ten more inline bytes.
pub fn expected_bytes() -> Vec<u8> {
    let mut bytes = INLINE_HEAD.to_vec();
    bytes.extend_from_slice(&SOURCE_BYTES[5..15]);
    bytes.extend_from_slice(&INLINE_TAIL);
    bytes
}

pub struct Fixture {
    pub tempdir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self { tempdir: TempDir::new().expect("create temp dir") }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.tempdir.path().join(name)
    }

    pub fn write_file(&self, name: &str, data: &[u8]) {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture dirs");
        }
        std::fs::write(path, data).expect("write fixture file");
    }

    pub fn create_dir(&self, name: &str) {
        std::fs::create_dir_all(self.path(name)).expect("create fixture dir");
    }

    /// Builds the canonical virtual file of the format's reference fixture.
    pub fn canonical_vf(&self) -> Vf {
        let mut vf = Vf::new("files/bytes.bin");
        let index = vf.add_path("source.bin").expect("path table has room");
        vf.add_data(&INLINE_HEAD);
        vf.add_file_offset(index, 10, 5).expect("index is valid");
        vf.add_data(&INLINE_TAIL);
        vf
    }

    /// Writes `source.bin` and the canonical descriptor beside it,
    /// returning the descriptor path.
    pub fn write_canonical_vf(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture dirs");
        }
        let source = path.parent().expect("descriptor has a parent").join("source.bin");
        std::fs::write(source, SOURCE_BYTES).expect("write source.bin");
        save_vf(&self.canonical_vf(), &path).expect("save descriptor");
        path
    }

    /// Loads a previously written descriptor.
    pub fn load(&self, name: &str) -> Vf {
        load_vf(&self.path(name)).expect("load descriptor")
    }
}
