#![no_main]

use libfuzzer_sys::fuzz_target;
use lupine_compiler::compile;

fuzz_target!(|data: &[u8]| {
    // The front end must never panic on any input — errors are fine, panics are bugs.
    let _ = compile(data);
});
