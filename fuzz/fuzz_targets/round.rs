#![no_main]

use std::io::Cursor;
use std::path::Path;

use libfuzzer_sys::fuzz_target;

use fluxfs::serializer::vf::write_vf;

// Any descriptor the parser accepts must re-encode to something the parser
// accepts again with identical logical content.
fuzz_target!(|data: &[u8]| {
    let origin = Path::new("fuzz.vf");
    let Ok(first) = fluxfs::parser::vf::parse(&mut Cursor::new(data), origin) else {
        return;
    };

    // Lossy UTF-8 repair may grow a path past the writer's length fields.
    let mut bytes = Vec::new();
    if write_vf(&first, &mut bytes).is_err() {
        return;
    }

    let second = fluxfs::parser::vf::parse(&mut Cursor::new(&bytes), origin)
        .expect("re-parsing a serialized descriptor cannot fail");
    assert_eq!(first.vpath(), second.vpath());
    assert_eq!(first.size(), second.size());
    assert_eq!(first.paths(), second.paths());
    assert_eq!(first.entries(), second.entries());
});
