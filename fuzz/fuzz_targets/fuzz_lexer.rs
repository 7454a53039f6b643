#![no_main]

use libfuzzer_sys::fuzz_target;
use lupine_compiler::lexer::tokenize;

fuzz_target!(|data: &[u8]| {
    // The scanner must never panic on any input — errors are fine, panics are bugs.
    let _ = tokenize(data);
});
