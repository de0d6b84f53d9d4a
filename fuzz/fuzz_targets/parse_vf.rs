#![no_main]

use std::io::Cursor;
use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = fluxfs::parser::vf::parse(&mut Cursor::new(data), Path::new("fuzz.vf"));
});
