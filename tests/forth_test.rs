mod common;
use common::*;
use pretty_assertions::assert_eq;
use timewarp::lang::Language;
use timewarp::mach::Directive;

#[test]
fn test_arithmetic() {
    assert_eq!(run("forth", "2 3 + ."), vec!["5 "]);
    assert_eq!(run("forth", "2 3 + . CR 10 4 - . CR"), vec!["5 ", "6 "]);
    assert_eq!(run("forth", "7 2 / . 7 2 MOD ."), vec!["3 1 "]);
}

#[test]
fn test_stack_words() {
    assert_eq!(run("forth", "1 2 SWAP . ."), vec!["1 2 "]);
    assert_eq!(run("forth", "1 2 OVER . . ."), vec!["1 2 1 "]);
    assert_eq!(run("forth", "1 2 3 ROT . . ."), vec!["1 3 2 "]);
    assert_eq!(run("forth", "1 2 3 .S"), vec!["<3> 1 2 3 "]);
}

#[test]
fn test_colon_definition() {
    assert_eq!(run("forth", ": SQUARE DUP * ;\n7 SQUARE . CR"), vec!["49 "]);
}

#[test]
fn test_definition_across_lines() {
    assert_eq!(run("forth", ": CUBE\n  DUP DUP\n  * * ;\n3 CUBE ."), vec!["27 "]);
}

#[test]
fn test_if_else_then() {
    let source = ": SIGN 0 < IF .\" neg\" ELSE .\" pos\" THEN ;\n-5 SIGN CR 5 SIGN CR";
    assert_eq!(run("forth", source), vec!["neg", "pos"]);
}

#[test]
fn test_do_loop() {
    assert_eq!(run("forth", "5 0 DO I . LOOP"), vec!["0 1 2 3 4 "]);
    assert_eq!(run("forth", "10 0 DO I . 3 +LOOP"), vec!["0 3 6 9 "]);
    assert_eq!(
        run("forth", "2 0 DO 2 0 DO J I + . LOOP LOOP"),
        vec!["0 1 1 2 "]
    );
}

#[test]
fn test_variables_and_begin_until() {
    let source = "VARIABLE N\n0 N !\nBEGIN N @ 1+ DUP N ! DUP . 3 = UNTIL\n5 N +! N @ .";
    assert_eq!(run("forth", source), vec!["1 2 3 8 "]);
}

#[test]
fn test_constant() {
    assert_eq!(run("forth", "42 CONSTANT ANSWER\nANSWER ANSWER + ."), vec!["84 "]);
}

#[test]
fn test_emit_and_comments() {
    assert_eq!(
        run("forth", "\\ a comment line\n72 EMIT ( inline ) 105 EMIT"),
        vec!["Hi"]
    );
}

#[test]
fn test_case_insensitive_words() {
    assert_eq!(run("forth", ": double 2 * ;\n21 DOUBLE ."), vec!["42 "]);
}

#[test]
fn test_underflow_and_unknown_words_continue() {
    let mut h = harness();
    h.runtime.config_mut().debug = true;
    h.runtime.set_language(Language::Forth);
    assert_eq!(h.runtime.execute_line("DROP"), Directive::Continue);
    assert_eq!(h.runtime.execute_line("FOO"), Directive::Continue);
    assert!(h.host.output().is_empty());
    let debug = h.host.debug();
    assert_eq!(debug.len(), 2);
    assert!(debug[1].contains("FOO ?"), "{}", debug[1]);
}

#[test]
fn test_runaway_recursion_is_stopped() {
    assert_eq!(run("forth", ": LOOPY LOOPY ;\nLOOPY\n1 ."), vec!["1 "]);
}

#[test]
fn test_bye() {
    assert_eq!(run("forth", "1 . CR\nBYE\n2 . CR"), vec!["1 "]);
}

#[test]
fn test_deeply_nested_control_is_a_line_error() {
    let nested = format!("{}1 .{}", "1 IF ".repeat(5_000), " THEN".repeat(5_000));
    assert_eq!(run("forth", &format!("{}\n2 .", nested)), vec!["2 "]);
    assert_eq!(run("forth", "1 IF 1 IF 7 . THEN THEN"), vec!["7 "]);
}
