mod common;
use common::*;
use pretty_assertions::assert_eq;
use timewarp::lang::ErrorCode;
use timewarp::mach::Val;

#[test]
fn test_integer_literals() {
    let mut h = harness();
    for n in &[0i64, 1, 7, 42, 1000, -3, -12345, 987654321] {
        assert_eq!(h.runtime.evaluate_expression(&n.to_string()), Ok(Val::Int(*n)));
    }
}

#[test]
fn test_float_literals() {
    let mut h = harness();
    for f in &[0.5f64, 2.25, 3.75, 1234.5] {
        assert_eq!(h.runtime.evaluate_expression(&f.to_string()), Ok(Val::Float(*f)));
    }
}

#[test]
fn test_display_round_trip() {
    let mut h = harness();
    let values = [
        Val::Float(3.0),
        Val::Float(-2.0),
        Val::Float(0.0),
        Val::Float(1e20),
        Val::Float(-0.125),
        Val::Int(i64::MIN),
        Val::Int(i64::MAX),
    ];
    for v in &values {
        let text = v.to_string();
        assert_eq!(h.runtime.evaluate_expression(&text), Ok(v.clone()), "{}", text);
    }
    assert_eq!(
        h.runtime.evaluate_expression("-9223372036854775808 ^ 1"),
        Ok(Val::Float(-9223372036854775808.0))
    );
}

#[test]
fn test_precedence() {
    let mut h = harness();
    let cases = [
        ("2 + 3 * 4", "14"),
        ("(2 + 3) * 4", "20"),
        ("2 ^ 10", "1024"),
        ("17 MOD 5", "2"),
        ("6 / 3", "2"),
        ("7 / 2", "3.5"),
        ("-(4 - 10)", "6"),
        ("1 < 2", "TRUE"),
        ("3 = 4", "FALSE"),
        ("\"ab\" + \"cd\"", "abcd"),
    ];
    for (expr, expected) in &cases {
        let v = h.runtime.evaluate_expression(expr).unwrap();
        assert_eq!(v.to_string(), *expected, "{}", expr);
    }
}

#[test]
fn test_functions() {
    let mut h = harness();
    let cases = [
        ("SQRT(16)", "4.0"),
        ("ABS(-5)", "5"),
        ("MAX(3, 9, 4)", "9"),
        ("MIN(3, 9, 4)", "3"),
        ("LEN(\"hello\")", "5"),
        ("INT(7.9)", "7"),
    ];
    for (expr, expected) in &cases {
        let v = h.runtime.evaluate_expression(expr).unwrap();
        assert_eq!(v.to_string(), *expected, "{}", expr);
    }
}

#[test]
fn test_variables_from_host() {
    let mut h = harness();
    h.runtime.variables_mut().store("X", Val::Int(21));
    assert_eq!(h.runtime.evaluate_expression("X * 2"), Ok(Val::Int(42)));
    assert_eq!(h.runtime.evaluate_expression("x + 1"), Ok(Val::Int(22)));
}

#[test]
fn test_division_by_zero() {
    let mut h = harness();
    let e = h.runtime.evaluate_expression("1 / 0").unwrap_err();
    assert_eq!(e.code(), ErrorCode::DivisionByZero);
}

#[test]
fn test_negative_sqrt_is_reported() {
    let mut h = harness();
    let e = h.runtime.evaluate_expression("SQRT(-1)").unwrap_err();
    assert_eq!(e.code(), ErrorCode::IllegalFunctionCall);
    assert_eq!(h.host.output(), vec!["SQRT requires non-negative value"]);
}

#[test]
fn test_undefined_variable() {
    let mut h = harness();
    let e = h.runtime.evaluate_expression("NOPE + 1").unwrap_err();
    assert_eq!(e.code(), ErrorCode::UndefinedVariable);
    assert!(h.host.output().is_empty());
}
