#![no_main]

use libfuzzer_sys::fuzz_target;
use stator_syntax::{MessageKey, PatternValidator, RegExpFlags, RegExpValidator};

fuzz_target!(|data: &[u8]| {
    // First byte picks the flags, the rest is the pattern.
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(pattern) = std::str::from_utf8(rest) else {
        return;
    };
    let flags = match selector % 4 {
        0 => "",
        1 => "u",
        2 => "v",
        _ => "gimsy",
    };
    assert!(RegExpFlags::parse(flags).is_some());
    let validator = PatternValidator::new(32);
    if let Err(err) = validator.validate(pattern, flags, "fuzz.js", 7, 3) {
        assert_eq!((err.line, err.column), (7, 3));
        assert!(matches!(
            err.key,
            MessageKey::InvalidRegExp | MessageKey::RegExpTooComplex
        ));
    }
});
