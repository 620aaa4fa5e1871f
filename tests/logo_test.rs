mod common;
use common::*;
use pretty_assertions::assert_eq;
use timewarp::lang::Language;
use timewarp::mach::{Directive, TurtleCall};

fn square_calls(side: f64) -> Vec<TurtleCall> {
    let mut calls = vec![];
    for _ in 0..4 {
        calls.push(TurtleCall::Forward(side));
        calls.push(TurtleCall::Turn(90.0));
    }
    calls
}

#[test]
fn test_repeat_square() {
    let mut h = harness();
    let ok = h.runtime.run_program("REPEAT 4 [ FORWARD 50 RIGHT 90 ]", "logo");
    assert_eq!(ok, Some(true));
    assert_eq!(h.canvas.calls(), square_calls(50.0));
    let pose = h.runtime.pose();
    assert!(close(pose.heading, 0.0), "heading {}", pose.heading);
    assert!(pose.x.abs() < 1e-6 && pose.y.abs() < 1e-6, "{:?}", pose);
}

#[test]
fn test_multiline_repeat_matches_single_line() {
    let mut h = harness();
    let ok = h.runtime.run_program("REPEAT 4 [\n FORWARD 50\n RIGHT 90\n]", "logo");
    assert_eq!(ok, Some(true));
    assert_eq!(h.canvas.calls(), square_calls(50.0));
}

#[test]
fn test_macro_recursion_is_caught() {
    let mut h = harness();
    h.runtime.set_language(Language::Logo);
    assert_eq!(h.runtime.execute_line("DEFINE A [ CALL A ]"), Directive::Continue);
    assert_eq!(h.runtime.execute_line("CALL A"), Directive::Continue);
    assert_eq!(h.host.output(), vec!["Recursion detected in macro A"]);
}

#[test]
fn test_mutual_macro_recursion_hits_depth_limit() {
    let mut h = harness();
    h.runtime.set_language(Language::Logo);
    h.runtime.execute_line("DEFINE A [ FD 1 CALL B ]");
    h.runtime.execute_line("DEFINE B [ CALL A ]");
    assert_eq!(h.runtime.execute_line("CALL A"), Directive::Continue);
    assert_eq!(h.host.output(), vec!["Macro depth limit of 16 exceeded"]);
    assert_eq!(h.canvas.calls().len(), 8);
}

#[test]
fn test_macro_reused_by_another() {
    let mut h = harness();
    h.runtime.set_language(Language::Logo);
    h.runtime.execute_line("DEFINE STEP [ FD 10 ]");
    h.runtime.execute_line("DEFINE TWICE [ CALL STEP CALL STEP ]");
    h.runtime.execute_line("CALL TWICE");
    assert!(h.host.output().is_empty());
    assert_eq!(h.canvas.calls().len(), 2);
}

#[test]
fn test_macro_runs_body() {
    let mut h = harness();
    h.runtime.set_language(Language::Logo);
    h.runtime.execute_line("DEFINE STEP [ FD 10 RT 45 ]");
    h.runtime.execute_line("CALL STEP");
    assert_eq!(
        h.canvas.calls(),
        vec![TurtleCall::Forward(10.0), TurtleCall::Turn(45.0)]
    );
}

#[test]
fn test_procedure_with_parameter() {
    let mut h = harness();
    let source = "TO SQUARE :SIZE\nREPEAT 4 [ FD :SIZE RT 90 ]\nEND\nSQUARE 30";
    assert_eq!(h.runtime.run_program(source, "logo"), Some(true));
    assert_eq!(h.canvas.calls(), square_calls(30.0));
}

#[test]
fn test_procedure_called_before_definition() {
    let mut h = harness();
    let source = "square 20\nto square :n\nrepeat 4 [ fd :n rt 90 ]\nend";
    assert_eq!(h.runtime.run_program(source, "logo"), Some(true));
    assert_eq!(h.canvas.calls(), square_calls(20.0));
}

#[test]
fn test_make_and_print() {
    let out = run("logo", "MAKE \"X 10\nPRINT :X * 2\nPRINT \"hello");
    assert_eq!(out, vec!["20", "hello"]);
}

#[test]
fn test_repcount() {
    let out = run("logo", "REPEAT 3 [ PRINT REPCOUNT ]");
    assert_eq!(out, vec!["1", "2", "3"]);
}

#[test]
fn test_ifelse() {
    let out = run(
        "logo",
        "MAKE \"X 7\nIFELSE :X > 5 [ PRINT \"big ] [ PRINT \"small ]\nIF :X < 5 [ PRINT \"tiny ]",
    );
    assert_eq!(out, vec!["big"]);
}

#[test]
fn test_repeat_expansion_guard() {
    let mut h = harness();
    let ok = h.runtime.run_program("REPEAT 10000 [ FD 1 ]\nPRINT 1", "logo");
    assert_eq!(ok, Some(true));
    assert_eq!(h.canvas.calls(), vec![]);
    assert_eq!(h.host.output(), vec!["REPEAT aborted: expansion too large", "1"]);
}

#[test]
fn test_left_and_back() {
    let mut h = harness();
    h.runtime.run_program("LT 90\nBK 10", "logo");
    assert_eq!(
        h.canvas.calls(),
        vec![TurtleCall::Turn(-90.0), TurtleCall::Forward(-10.0)]
    );
    let pose = h.runtime.pose();
    assert!(close(pose.heading, 270.0));
    assert!((pose.x - 10.0).abs() < 1e-9, "x {}", pose.x);
}

#[test]
fn test_unknown_command_continues() {
    let mut h = harness();
    h.runtime.set_language(Language::Logo);
    h.runtime.config_mut().debug = true;
    assert_eq!(h.runtime.execute_line("FROBNICATE 3"), Directive::Continue);
    assert!(h.host.output().is_empty());
    let debug = h.host.debug();
    assert_eq!(debug.len(), 1);
    assert!(debug[0].starts_with("Error executing 'FROBNICATE 3'"), "{}", debug[0]);
}

#[test]
fn test_bye_ends_program() {
    let out = run("logo", "PRINT 1\nBYE\nPRINT 2");
    assert_eq!(out, vec!["1"]);
}
