mod common;
use common::*;
use pretty_assertions::assert_eq;

#[test]
fn test_condition_gates_next_type() {
    let out = run("pilot", "T:Hello\nY:1=1\nT:yes\nY:1=2\nT:no");
    assert_eq!(out, vec!["Hello", "yes"]);
}

#[test]
fn test_condition_is_one_shot() {
    let out = run("pilot", "Y:1=2\nT:skipped\nT:printed");
    assert_eq!(out, vec!["printed"]);
}

#[test]
fn test_condition_waits_for_type_or_jump() {
    assert_eq!(run("pilot", "Y:1=2\nC:X=1\nT:no"), Vec::<String>::new());
    assert_eq!(run("pilot", "Y:1=2\nR:comment\nT:no"), Vec::<String>::new());
    assert_eq!(run("pilot", "Y:1=2\n*L\nT:no\nT:yes"), vec!["yes"]);
}

#[test]
fn test_condition_survives_accept() {
    let out = run_with_input("pilot", "Y:1=2\nA:$X\nT:hidden\nT:shown", &["5"]);
    assert_eq!(out, vec!["shown"]);
}

#[test]
fn test_no_inverts() {
    let out = run("pilot", "N:1=2\nT:shown\nN:1=1\nT:hidden");
    assert_eq!(out, vec!["shown"]);
}

#[test]
fn test_inline_condition() {
    let out = run("pilot", "C:X=5\nT(X>3):big\nT(X>9):huge");
    assert_eq!(out, vec!["big"]);
}

#[test]
fn test_labels_and_loop() {
    let out = run(
        "pilot",
        "C:X=0\n*LOOP\nC:X=X+1\nY:X<3\nJ:LOOP\nT:done *X*",
    );
    assert_eq!(out, vec!["done 3"]);
}

#[test]
fn test_missing_label() {
    let out = run("pilot", "J:NOWHERE\nT:after");
    assert_eq!(out, vec!["Label not found: NOWHERE", "after"]);
}

#[test]
fn test_use_and_end() {
    let out = run("pilot", "U:SUB\nT:back\nE:\n*SUB\nT:in sub\nE:");
    assert_eq!(out, vec!["in sub", "back"]);
}

#[test]
fn test_accept_and_interpolate() {
    let out = run_with_input("pilot", "T:Name?\nA:$NAME\nT:Hello $NAME", &["Bob"]);
    assert_eq!(out, vec!["Name?", "Hello Bob"]);
}

#[test]
fn test_match_yes() {
    let out = run_with_input("pilot", "A:\nM:yes,ok\nTY:agreed", &["OK then"]);
    assert_eq!(out, vec!["agreed"]);
}

#[test]
fn test_match_no() {
    let out = run_with_input("pilot", "A:\nM:yes\nTN:refused", &["nope"]);
    assert_eq!(out, vec!["refused"]);
}

#[test]
fn test_match_branches_both_ways() {
    let source = "A:\nM:yes\nTY:Good\nTN:Bad";
    assert_eq!(run_with_input("pilot", source, &["no"]), vec!["Bad"]);
    assert_eq!(run_with_input("pilot", source, &["yes please"]), vec!["Good"]);
}

#[test]
fn test_match_with_jumps() {
    let source = "A:\nM:yes\nJY:YES\nJN:NO\n*YES\nT:agreed\nE:\n*NO\nT:refused";
    assert_eq!(run_with_input("pilot", source, &["nah"]), vec!["refused"]);
    assert_eq!(run_with_input("pilot", source, &["yes"]), vec!["agreed"]);
}

#[test]
fn test_conditional_jump() {
    let source = "C:X=7\nJ(X>5):BIG\nT:small\nE:\n*BIG\nT:big";
    assert_eq!(run("pilot", source), vec!["big"]);
    let source = "C:X=2\nJ(X>5):BIG\nT:small\nE:\n*BIG\nT:big";
    assert_eq!(run("pilot", source), vec!["small"]);
}

#[test]
fn test_compute_alone_returns() {
    let out = run("pilot", "U:SUB\nT:back\nE:\n*SUB\nT:in sub\nC:\nT:not reached");
    assert_eq!(out, vec!["in sub", "back"]);
}

#[test]
fn test_unknown_command_is_skipped() {
    let out = run("pilot", "Q:what\nT:ok");
    assert_eq!(out, vec!["ok"]);
}

#[test]
fn test_unknown_variable_left_as_written() {
    let out = run("pilot", "T:cost is $PRICE");
    assert_eq!(out, vec!["cost is $PRICE"]);
}
