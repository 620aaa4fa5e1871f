mod common;
use common::*;
use pretty_assertions::assert_eq;

const FAMILY: &str = "\
% a small family tree
parent(tom, bob).
parent(tom, liz).
parent(bob, ann).
grandparent(X, Z) :- parent(X, Y), parent(Y, Z).
";

fn consult(query: &str) -> Vec<String> {
    run("prolog", &format!("{}{}", FAMILY, query))
}

#[test]
fn test_all_answers() {
    assert_eq!(consult("?- parent(tom, X)."), vec!["X = bob", "X = liz", "Yes"]);
}

#[test]
fn test_rule() {
    assert_eq!(consult("?- grandparent(tom, W)."), vec!["W = ann", "Yes"]);
}

#[test]
fn test_no_answers() {
    assert_eq!(consult("?- parent(ann, X)."), vec!["No"]);
}

#[test]
fn test_ground_query() {
    assert_eq!(consult("?- parent(bob, ann)."), vec!["Yes"]);
}

#[test]
fn test_negation() {
    assert_eq!(consult("?- \\+ parent(ann, _)."), vec!["Yes"]);
}

#[test]
fn test_arithmetic() {
    let out = run("prolog", "?- X is 2 + 3 * 4.\n?- 7 mod 3 =:= 1.");
    assert_eq!(out, vec!["X = 14", "Yes", "Yes"]);
}

#[test]
fn test_recursive_factorial() {
    let source = "\
fact(0, 1).
fact(N, F) :- N > 0, N1 is N - 1, fact(N1, F1), F is N * F1.
?- fact(5, F).";
    assert_eq!(run("prolog", source), vec!["F = 120", "Yes"]);
}

#[test]
fn test_lists() {
    let source = "\
member(X, [X|_]).
member(X, [_|T]) :- member(X, T).
?- member(b, [a, b, c]).
?- member(X, [1, 2]).
?- member(z, [a]).";
    assert_eq!(
        run("prolog", source),
        vec!["Yes", "X = 1", "X = 2", "Yes", "No"]
    );
}

#[test]
fn test_compound_answer() {
    assert_eq!(
        run("prolog", "?- X = f(a, [1, 2])."),
        vec!["X = f(a,[1,2])", "Yes"]
    );
}

#[test]
fn test_write_and_nl() {
    assert_eq!(run("prolog", "?- write(hello), nl."), vec!["hello", "Yes"]);
}

#[test]
fn test_directive_runs_silently() {
    assert_eq!(run("prolog", ":- write(hi), nl."), vec!["hi"]);
}

#[test]
fn test_clause_across_lines() {
    let out = run("prolog", "likes(mary,\n  wine).\n?- likes(mary, W).");
    assert_eq!(out, vec!["W = wine", "Yes"]);
}

#[test]
fn test_disjunction() {
    let out = run("prolog", "?- (X = 1 ; X = 2).");
    assert_eq!(out, vec!["X = 1", "X = 2", "Yes"]);
}

#[test]
fn test_unknown_procedure_fails() {
    assert_eq!(run("prolog", "?- nothing(1)."), vec!["No"]);
}

#[test]
fn test_halt_ends_program() {
    assert_eq!(run("prolog", "?- halt.\n?- write(x), nl."), Vec::<String>::new());
}

#[test]
fn test_deep_recursion() {
    let source = "\
count(500).
count(N) :- N < 500, N1 is N + 1, count(N1).
?- count(0).";
    assert_eq!(run("prolog", source), vec!["Yes"]);
}

#[test]
fn test_long_list() {
    let source = "\
range(N, N, [N]).
range(I, N, [I|T]) :- I < N, I1 is I + 1, range(I1, N, T).
len([], 0).
len([_|T], L) :- len(T, L0), L is L0 + 1.
?- range(1, 400, Xs), len(Xs, L).";
    let out = run("prolog", source);
    assert_eq!(out.last(), Some(&"Yes".to_string()));
    assert!(out.contains(&"L = 400".to_string()), "{:?}", out);
}

#[test]
fn test_runaway_recursion_is_pruned() {
    assert_eq!(run("prolog", "loop :- loop.\n?- loop."), vec!["No"]);
}
