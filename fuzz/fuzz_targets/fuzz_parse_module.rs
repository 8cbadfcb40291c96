#![no_main]

use libfuzzer_sys::fuzz_target;
use stator_syntax::{ParseOptions, parse_module};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let options = ParseOptions {
        max_nesting_depth: 64,
        ..ParseOptions::default()
    };
    // Modules are always strict.
    if let Ok(program) = parse_module(source, &options) {
        assert!(program.strict);
    }
});
