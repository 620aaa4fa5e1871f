#![allow(dead_code)]
use timewarp::mach::{Capture, Recorder, Runtime};

pub struct Harness {
    pub runtime: Runtime,
    pub host: Capture,
    pub canvas: Recorder,
}

pub fn harness() -> Harness {
    harness_with_input(Vec::<String>::new())
}

pub fn harness_with_input<I, S>(input: I) -> Harness
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let host = Capture::with_input(input);
    let canvas = Recorder::new();
    let runtime = Runtime::new(Box::new(host.clone()), Box::new(canvas.clone()));
    Harness {
        runtime,
        host,
        canvas,
    }
}

/// Run `source` and return every output line.
pub fn run(tag: &str, source: &str) -> Vec<String> {
    let mut h = harness();
    assert_eq!(h.runtime.run_program(source, tag), Some(true));
    h.host.output()
}

pub fn run_with_input(tag: &str, source: &str, input: &[&str]) -> Vec<String> {
    let mut h = harness_with_input(input.iter().copied());
    assert_eq!(h.runtime.run_program(source, tag), Some(true));
    h.host.output()
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
