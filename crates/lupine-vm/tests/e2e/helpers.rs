use lupine_vm::{interpret, Error};

/// Interpret source and return what `print` wrote, as UTF-8.
pub fn run(source: &str) -> String {
    match interpret(source.as_bytes()) {
        Ok(output) => String::from_utf8(output).expect("print output was not UTF-8"),
        Err(e) => panic!("error interpreting {source:?}: {e}"),
    }
}

/// Interpret source, expecting a failure from some stage.
pub fn run_err(source: &str) -> Error {
    match interpret(source.as_bytes()) {
        Err(e) => e,
        Ok(output) => panic!(
            "expected error for {source:?}, got output {:?}",
            String::from_utf8_lossy(&output)
        ),
    }
}

/// Assert that a program prints exactly `expected`.
pub fn check(source: &str, expected: &str) {
    assert_eq!(run(source), expected, "program: {source:?}");
}
