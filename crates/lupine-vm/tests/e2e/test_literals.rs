use super::helpers::*;

#[test]
fn test_nil_true_false() {
    check("print(nil)", "nil\n");
    check("print(true)", "true\n");
    check("print(false)", "false\n");
}

#[test]
fn test_integers() {
    check("print(0)", "0\n");
    check("print(42)", "42\n");
    check("print(-42)", "-42\n");
}

#[test]
fn test_hex_integers() {
    check("print(0xff)", "255\n");
    check("print(0x10)", "16\n");
}

#[test]
fn test_floats_always_show_point() {
    check("print(1.5)", "1.5\n");
    check("print(2.0)", "2.0\n");
    check("print(3.)", "3.0\n");
    check("print(.5)", "0.5\n");
}

#[test]
fn test_float_exponents() {
    check("print(1e2)", "100.0\n");
    check("print(25e-2)", "0.25\n");
}

#[test]
fn test_short_strings() {
    check("print(\"hello\")", "hello\n");
    check("print('hello')", "hello\n");
    check("print(\"\")", "\n");
}

#[test]
fn test_string_escapes() {
    check(r#"print("a\tb")"#, "a\tb\n");
    check(r#"print("line1\nline2")"#, "line1\nline2\n");
    check(r#"print("quote\"inside")"#, "quote\"inside\n");
    check(r#"print('it\'s')"#, "it's\n");
    check(r#"print("back\\slash")"#, "back\\slash\n");
}

#[test]
fn test_long_strings() {
    check("print([[verbatim]])", "verbatim\n");
    check("print([=[with ]] inside]=])", "with ]] inside\n");
    check(r"print([[no \n escapes]])", "no \\n escapes\n");
}

#[test]
fn test_integer_and_float_are_distinct() {
    check("print(42 == 42.0)", "false\n");
    check("print(42 ~= 42.0)", "true\n");
}

#[test]
fn test_truthiness_of_zero_and_empty() {
    check("print(0 and 'yes' or 'no')", "yes\n");
    check("print(0.0 and 'yes' or 'no')", "yes\n");
    check("print('' and 'yes' or 'no')", "yes\n");
    check("print(nil and 'yes' or 'no')", "no\n");
    check("print(false and 'yes' or 'no')", "no\n");
}
