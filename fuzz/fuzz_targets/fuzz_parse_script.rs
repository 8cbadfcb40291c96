#![no_main]

use libfuzzer_sys::fuzz_target;
use stator_syntax::{ParseOptions, parse_script};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    // A low ceiling keeps deeply nested inputs within the fuzzer's stack.
    let options = ParseOptions {
        max_nesting_depth: 64,
        ..ParseOptions::default()
    };
    if let Err(err) = parse_script(source, &options) {
        assert!(err.line >= 1 && err.column >= 1, "diagnostic must be located: {err}");
    }
});
