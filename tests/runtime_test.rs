mod common;
use common::*;
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;
use timewarp::lang::{ErrorCode, Language};
use timewarp::mach::{Directive, Event, Val};

#[test]
fn test_garbage_never_aborts() {
    let cases = [
        (Language::Pilot, "hello there"),
        (Language::Basic, "@@@ ###"),
        (Language::Logo, "] FD ["),
        (Language::Pascal, "%%% ???"),
        (Language::Prolog, "foo(( ."),
        (Language::Forth, "FROBNICATE"),
    ];
    for (language, line) in &cases {
        let mut h = harness();
        h.runtime.set_language(*language);
        assert_eq!(h.runtime.execute_line(line), Directive::Continue, "{}", language);
    }
}

#[test]
fn test_deep_nesting_is_a_line_error() {
    let parens = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
    let brackets = format!("{}{}", "[".repeat(200_000), "]".repeat(200_000));
    let cases = [
        (Language::Basic, format!("PRINT {}", parens)),
        (Language::Pilot, format!("C:X={}", parens)),
        (Language::Logo, format!("REPEAT 2 {}", brackets)),
        (Language::Pascal, format!("writeln({});", parens)),
        (Language::Prolog, format!("?- X is {}.", parens)),
    ];
    for (language, line) in &cases {
        let mut h = harness();
        h.runtime.set_language(*language);
        assert_eq!(h.runtime.execute_line(line), Directive::Continue, "{}", language);
    }
}

#[test]
fn test_errors_reach_debug_sink() {
    let mut h = harness();
    h.runtime.config_mut().debug = true;
    h.runtime.set_language(Language::Basic);
    h.runtime.execute_line("FROB 1");
    let debug = h.host.debug();
    assert_eq!(debug.len(), 1);
    assert!(debug[0].starts_with("Error executing 'FROB 1'"), "{}", debug[0]);
}

#[test]
fn test_debug_sink_off_by_default() {
    let mut h = harness();
    h.runtime.set_language(Language::Basic);
    h.runtime.execute_line("FROB 1");
    assert!(h.host.debug().is_empty());
    assert!(h.host.output().is_empty());
}

#[test]
fn test_unknown_tag() {
    let mut h = harness();
    assert_eq!(h.runtime.run_program("PRINT 1", "klingon"), None);
}

#[test]
fn test_tags_and_extensions() {
    assert_eq!("BASIC".parse(), Ok(Language::Basic));
    assert_eq!("Logo".parse(), Ok(Language::Logo));
    assert_eq!("fth".parse(), Ok(Language::Forth));
    assert_eq!("pas".parse(), Ok(Language::Pascal));
}

#[test]
fn test_external_language() {
    let mut h = harness();
    assert_eq!(h.runtime.run_program("print('hi')", "python"), Some(false));
    assert_eq!(
        h.host.output(),
        vec!["Python programs need an external Python runtime; not supported here"]
    );
}

#[test]
fn test_step_limit() {
    let mut h = harness();
    h.runtime.config_mut().max_steps = 50;
    assert_eq!(h.runtime.run_program("10 GOTO 10", "basic"), Some(false));
    assert_eq!(
        h.host.output(),
        vec!["Execution aborted: step limit of 50 exceeded"]
    );
    assert!(!h.runtime.is_running());
}

#[test]
fn test_stop_flag() {
    let mut h = harness();
    h.runtime.load("10 PRINT 1\n20 GOTO 10", Language::Basic);
    assert_eq!(h.runtime.execute(3), Event::Running);
    h.runtime.stop_handle().store(true, Ordering::SeqCst);
    match h.runtime.execute(100) {
        Event::Aborted(e) => assert_eq!(e.code(), ErrorCode::Break),
        other => panic!("expected abort, got {:?}", other),
    }
    assert_eq!(h.host.output(), vec!["1", "1", "Program stopped"]);
}

#[test]
fn test_interrupt() {
    let mut h = harness();
    h.runtime.load("10 GOTO 10", Language::Basic);
    h.runtime.interrupt();
    assert!(matches!(h.runtime.execute(10), Event::Aborted(_)));
    assert!(!h.runtime.is_running());
}

#[test]
fn test_execute_in_slices() {
    let mut h = harness();
    h.runtime.load("10 PRINT 1\n20 PRINT 2\n30 PRINT 3", Language::Basic);
    assert!(h.runtime.is_running());
    assert_eq!(h.runtime.execute(2), Event::Running);
    assert_eq!(h.host.output(), vec!["1", "2"]);
    assert_eq!(h.runtime.execute(10), Event::Stopped);
    assert_eq!(h.host.output(), vec!["1", "2", "3"]);
    assert!(!h.runtime.is_running());
    assert_eq!(h.runtime.execute(10), Event::Stopped);
}

#[test]
fn test_variables_persist_between_runs() {
    let mut h = harness();
    h.runtime.run_program("10 A = 5", "basic");
    h.runtime.run_program("10 PRINT A * 2", "basic");
    assert_eq!(h.host.output(), vec!["10"]);
    h.runtime.clear();
    assert!(h.runtime.variables().is_empty());
}

#[test]
fn test_variables_shared_across_languages() {
    let mut h = harness();
    h.runtime.run_program("10 LET SIZE = 40", "basic");
    h.runtime.run_program("FD :SIZE", "logo");
    assert_eq!(h.runtime.variables().fetch("SIZE"), Some(&Val::Int(40)));
    assert!((h.runtime.pose().y - 40.0).abs() < 1e-9);
}

#[test]
fn test_execute_line_directives() {
    let mut h = harness();
    h.runtime.set_language(Language::Basic);
    assert_eq!(h.runtime.execute_line("END"), Directive::End);
    assert_eq!(h.runtime.execute_line(""), Directive::Continue);
    assert_eq!(h.runtime.execute_line("PRINT \"partial\";"), Directive::Continue);
    assert_eq!(h.host.output(), vec!["partial"]);
}

#[test]
fn test_directive_strings() {
    assert_eq!(Directive::Continue.to_string(), "continue");
    assert_eq!(Directive::End.to_string(), "end");
    assert_eq!(Directive::Jump(4).to_string(), "jump:4");
    assert_eq!("jump:17".parse(), Ok(Directive::Jump(17)));
    assert_eq!("continue".parse(), Ok(Directive::Continue));
    assert!("jump".parse::<Directive>().is_err());
}

#[test]
fn test_detect_language() {
    assert_eq!(Language::detect("10 PRINT 1\n20 END"), Some(Language::Basic));
    assert_eq!(Language::detect("T:Hi\n*L\nJ:L"), Some(Language::Pilot));
    assert_eq!(Language::detect("REPEAT 4 [ FD 10 RT 90 ]"), Some(Language::Logo));
    assert_eq!(Language::detect("program p;\nbegin\nend."), Some(Language::Pascal));
    assert_eq!(Language::detect(": sq dup * ;\nvariable x\nx @ sq ."), Some(Language::Forth));
}
