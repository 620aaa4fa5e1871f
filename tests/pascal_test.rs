mod common;
use common::*;
use pretty_assertions::assert_eq;
use timewarp::mach::Val;

#[test]
fn test_hello() {
    let out = run("pascal", "program Hello;\nbegin\n  writeln('Hello, World!');\nend.");
    assert_eq!(out, vec!["Hello, World!"]);
}

#[test]
fn test_program() {
    let source = "\
program Answer;
var
  x, y: integer;
begin
  x := 6;
  y := x * 7;
  writeln('Answer: ', y);
  for x := 1 to 3 do write(x, ' ');
  writeln;
  if y > 40 then writeln('big') else writeln('small');
end.";
    assert_eq!(run("pascal", source), vec!["Answer: 42", "1 2 3 ", "big"]);
}

#[test]
fn test_downto() {
    let out = run("pascal", "var i: integer;\nbegin\nfor i := 3 downto 1 do write(i);\nwriteln;\nend.");
    assert_eq!(out, vec!["321"]);
}

#[test]
fn test_const_and_while() {
    let source = "\
const Limit = 3;
var i: integer;
begin
  i := 0;
  while i < Limit do i := i + 1;
  writeln('i=', i);
end.";
    assert_eq!(run("pascal", source), vec!["i=3"]);
}

#[test]
fn test_compound_else() {
    let source = "begin\nif 1 > 2 then writeln('no') else begin writeln('yes'); writeln('really') end;\nend.";
    assert_eq!(run("pascal", source), vec!["yes", "really"]);
}

#[test]
fn test_loop_with_block_body() {
    let source = "var i: integer;\nbegin\nfor i := 1 to 2 do begin write(i); write('!') end;\nwriteln;\nend.";
    assert_eq!(run("pascal", source), vec!["1!2!"]);
}

#[test]
fn test_format_width_and_decimals() {
    let out = run(
        "pascal",
        "begin\nwriteln(42:5);\nwriteln(3.14159:0:2);\nwriteln('[', 'ab':4, ']');\nend.",
    );
    assert_eq!(out, vec!["   42", "3.14", "[  ab]"]);
}

#[test]
fn test_readln_uses_declared_types() {
    let source = "\
var name: string; n: integer;
begin
readln(name);
readln(n);
writeln(name, ' ', n * 2);
end.";
    let out = run_with_input("pascal", source, &["Ada", "21"]);
    assert_eq!(out, vec!["Ada 42"]);
}

#[test]
fn test_real_promotion() {
    let mut h = harness();
    let ok = h
        .runtime
        .run_program("var r: real;\nbegin\nr := 2;\nwriteln(r:0:1);\nend.", "pascal");
    assert_eq!(ok, Some(true));
    assert_eq!(h.runtime.variables().fetch("R"), Some(&Val::Float(2.0)));
    assert_eq!(h.host.output(), vec!["2.0"]);
}

#[test]
fn test_halt() {
    let out = run("pascal", "begin\nwriteln('a');\nhalt;\nwriteln('b');\nend.");
    assert_eq!(out, vec!["a"]);
}

#[test]
fn test_comments() {
    let out = run(
        "pascal",
        "{ greeting }\nbegin\nwriteln('x'); // trailing\n(* block *)\nend.",
    );
    assert_eq!(out, vec!["x"]);
}

#[test]
fn test_case_insensitive_names() {
    let out = run("pascal", "var Total: integer;\nbegin\nTOTAL := 5;\nwriteln(total + 1);\nend.");
    assert_eq!(out, vec!["6"]);
}

#[test]
fn test_unknown_statement_is_skipped() {
    let out = run("pascal", "begin\nfrobnicate;\nwriteln('ok');\nend.");
    assert_eq!(out, vec!["ok"]);
}

#[test]
fn test_deeply_nested_statements_are_refused() {
    let nested = format!("begin\n{}writeln('deep'){}\nwriteln('after');\nend.", "if 1 < 2 then ".repeat(5_000), "");
    assert_eq!(run("pascal", &nested), vec!["after"]);
    let shallow = format!("begin\n{}writeln('ok');\nend.", "if 1 < 2 then ".repeat(10));
    assert_eq!(run("pascal", &shallow), vec!["ok"]);
}
