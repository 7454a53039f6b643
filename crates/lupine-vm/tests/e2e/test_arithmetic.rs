use super::helpers::*;

#[test]
fn test_integer_arithmetic_stays_integer() {
    check("print(2 + 3)", "5\n");
    check("print(2 - 3)", "-1\n");
    check("print(2 * 3)", "6\n");
    check("print(7 // 2)", "3\n");
    check("print(7 % 2)", "1\n");
}

#[test]
fn test_float_operand_promotes() {
    check("print(2 + 0.5)", "2.5\n");
    check("print(1.5 * 2)", "3.0\n");
    check("print(7.0 // 2)", "3.0\n");
}

#[test]
fn test_division_always_float() {
    check("print(7 / 2)", "3.5\n");
    check("print(4 / 2)", "2.0\n");
}

#[test]
fn test_pow_always_float() {
    check("print(2 ^ 10)", "1024.0\n");
    check("print(2 ^ 0.5)", &format!("{}\n", 2f64.powf(0.5)));
}

#[test]
fn test_pow_right_associative() {
    // 2^(3^4) = 2^81, not (2^3)^4 = 4096.
    check("print(2 ^ 3 ^ 4 == 2 ^ 81)", "true\n");
    check("print(2 ^ 3 ^ 4 ~= 4096.0)", "true\n");
}

#[test]
fn test_floor_division_rounds_down() {
    check("print(-7 // 2)", "-4\n");
    check("print(7 // -2)", "-4\n");
    check("print(-7 // -2)", "3\n");
}

#[test]
fn test_modulo_follows_divisor_sign() {
    check("print(-5 % 3)", "1\n");
    check("print(5 % -3)", "-1\n");
    check("print(5.5 % 2)", "1.5\n");
}

#[test]
fn test_unary_minus_preserves_tag() {
    check("print(-(3))", "-3\n");
    check("print(-(3.0))", "-3.0\n");
    check("print(- - 5)", "5\n");
}

#[test]
fn test_precedence() {
    check("print(1 + 2 * 3)", "7\n");
    check("print((1 + 2) * 3)", "9\n");
    check("print(2 * 3 + 4 * 5)", "26\n");
    check("print(-2 ^ 2)", "-4.0\n");
}

#[test]
fn test_bitwise() {
    check("print(12 & 10)", "8\n");
    check("print(12 | 10)", "14\n");
    check("print(12 ~ 10)", "6\n");
    check("print(~0)", "-1\n");
    check("print(1 << 4)", "16\n");
    check("print(256 >> 4)", "16\n");
}

#[test]
fn test_shift_edge_counts() {
    check("print(1 << 64)", "0\n");
    check("print(1 << -1)", "0\n");
    check("print(-1 >> 63)", "1\n");
}

#[test]
fn test_relational() {
    check("print(5 > 3)", "true\n");
    check("print(3 > 5)", "false\n");
    check("print(3 <= 3)", "true\n");
    check("print(3 >= 4)", "false\n");
    check("print(1 < 1.5)", "true\n");
    check("print(2.5 < 2)", "false\n");
}

#[test]
fn test_equality() {
    check("print(1 == 1)", "true\n");
    check("print(1 ~= 2)", "true\n");
    check("print(nil == nil)", "true\n");
    check("print(nil == false)", "false\n");
    check("print('a' == 'a')", "true\n");
    check("print('a' == 'b')", "false\n");
}

#[test]
fn test_not() {
    check("print(not nil)", "true\n");
    check("print(not false)", "true\n");
    check("print(not 0)", "false\n");
    check("print(not '')", "false\n");
}

#[test]
fn test_integer_wraparound() {
    check(
        "print(9223372036854775807 + 1)",
        "-9223372036854775808\n",
    );
}
