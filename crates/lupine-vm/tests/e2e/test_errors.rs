use super::helpers::*;
use lupine_compiler::compiler::CompileErrorKind;
use lupine_compiler::lexer::LexErrorKind;
use lupine_compiler::parser::ParseErrorKind;
use lupine_vm::{Error, RuntimeErrorKind};

// --- Lexical ---

#[test]
fn test_unexpected_character() {
    let err = run_err("print(1) @");
    assert!(matches!(
        err,
        Error::Lex(e) if e.kind == LexErrorKind::UnexpectedCharacter(b'@')
    ));
}

#[test]
fn test_unterminated_string() {
    let err = run_err("print(\"oops");
    assert!(matches!(
        err,
        Error::Lex(e) if e.kind == LexErrorKind::UnterminatedString
    ));
}

#[test]
fn test_unterminated_long_string() {
    let err = run_err("print([[oops");
    assert!(matches!(
        err,
        Error::Lex(e) if e.kind == LexErrorKind::UnterminatedLongBracket
    ));
}

#[test]
fn test_invalid_number() {
    let err = run_err("print(1e)");
    assert!(matches!(
        err,
        Error::Lex(e) if e.kind == LexErrorKind::InvalidNumber
    ));
}

// --- Syntactic ---

#[test]
fn test_expected_expression() {
    let err = run_err("print(1 + )");
    assert!(matches!(
        err,
        Error::Parse(e) if matches!(e.kind, ParseErrorKind::ExpectedExpression { .. })
    ));
}

#[test]
fn test_expected_token() {
    let err = run_err("while true print(1) end");
    assert!(matches!(
        err,
        Error::Parse(e) if matches!(e.kind, ParseErrorKind::ExpectedToken { .. })
    ));
}

#[test]
fn test_unexpected_token() {
    let err = run_err("end");
    assert!(matches!(
        err,
        Error::Parse(e) if matches!(e.kind, ParseErrorKind::UnexpectedToken { .. })
    ));
}

// --- Compile ---

#[test]
fn test_break_outside_loop() {
    let err = run_err("break");
    assert!(matches!(
        err,
        Error::Compile(e) if e.kind == CompileErrorKind::BreakOutsideLoop
    ));
}

// --- Runtime ---

#[test]
fn test_undefined_variable_at_runtime_not_compile() {
    // Referencing an unknown global compiles fine and fails at runtime.
    let err = run_err("print(ghost)");
    assert!(matches!(
        err,
        Error::Runtime(e)
            if e.kind == RuntimeErrorKind::UndefinedVariable("ghost".to_string())
    ));
}

#[test]
fn test_undefined_variable_skipped_branch_is_fine() {
    check("if false then print(ghost) end print('ok')", "ok\n");
}

#[test]
fn test_division_by_zero() {
    for src in ["print(1 / 0)", "print(1 // 0)", "print(1 % 0)", "print(1.0 / 0.0)"] {
        let err = run_err(src);
        assert!(
            matches!(err, Error::Runtime(ref e) if e.kind == RuntimeErrorKind::DivisionByZero),
            "source: {src}"
        );
    }
}

#[test]
fn test_float_floor_div_by_zero_is_not_an_error() {
    // Only the integer paths of // and % diagnose a zero divisor.
    check("print(1.0 // 0.0)", "inf\n");
}

#[test]
fn test_arithmetic_type_errors() {
    for src in ["print(1 + nil)", "print('a' * 2)", "print(-true)"] {
        let err = run_err(src);
        assert!(
            matches!(err, Error::Runtime(ref e) if matches!(e.kind, RuntimeErrorKind::TypeError(_))),
            "source: {src}"
        );
    }
}

#[test]
fn test_bitwise_type_errors() {
    for src in ["print(1.5 & 2)", "print(1 | nil)", "print(~'x')", "print(1.0 << 2)"] {
        let err = run_err(src);
        assert!(
            matches!(err, Error::Runtime(ref e) if matches!(e.kind, RuntimeErrorKind::TypeError(_))),
            "source: {src}"
        );
    }
}

#[test]
fn test_comparison_type_errors() {
    for src in ["print(1 < 'a')", "print(nil <= nil)", "print(true > false)"] {
        let err = run_err(src);
        assert!(
            matches!(err, Error::Runtime(ref e) if matches!(e.kind, RuntimeErrorKind::TypeError(_))),
            "source: {src}"
        );
    }
}

#[test]
fn test_equality_never_type_errors() {
    check("print(1 == 'a')", "false\n");
    check("print(nil == 0)", "false\n");
    check("print(true ~= 'true')", "true\n");
}

#[test]
fn test_no_partial_output_after_error() {
    // The error cuts the run short; interpret returns no output at all.
    let err = run_err("print('before') print(1 + nil) print('after')");
    assert!(matches!(err, Error::Runtime(_)));
}

#[test]
fn test_runtime_error_line_number() {
    let err = run_err("local a = 1\n\n\nprint(a + nil)");
    let Error::Runtime(e) = err else {
        panic!("expected runtime error")
    };
    assert_eq!(e.line, 4);
}
