use super::{Config, Evaluator, Files, Host, Program, Stack, Turtle, Val, Var};
use crate::lang::{Error, ErrorCode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

/// A BASIC FOR loop waiting for its NEXT.
#[derive(Debug, Clone, PartialEq)]
pub struct ForFrame {
    pub var: String,
    pub end: i64,
    pub step: i64,
    /// Index of the FOR line; NEXT resumes one past it.
    pub line: usize,
}

/// ## Shared interpreter state
///
/// One per running program. Executors borrow it for the length of a single
/// line and never keep it.

pub struct Context {
    pub vars: Var,
    pub program: Program,
    pub current_line: usize,
    pub calls: Stack<usize>,
    pub loops: Stack<ForFrame>,
    pub macros: HashMap<String, Vec<String>>,
    pub turtle: Turtle,
    pub files: Files,
    pub config: Config,
    /// Condition handed to this statement by the one before it.
    condition: Option<bool>,
    /// Condition this statement hands to the next one.
    produced: Option<bool>,
    rng: StdRng,
    host: Box<dyn Host>,
    held: String,
}

impl Context {
    pub fn new(host: Box<dyn Host>, turtle: Turtle) -> Context {
        Context {
            vars: Var::new(),
            program: Program::new(),
            current_line: 0,
            calls: Stack::new("CALL STACK OVERFLOW"),
            loops: Stack::new("TOO MANY FOR LOOPS"),
            macros: HashMap::new(),
            turtle,
            files: Files::new(),
            config: Config::default(),
            condition: None,
            produced: None,
            rng: StdRng::from_entropy(),
            host,
            held: String::new(),
        }
    }

    /// Control state back to a fresh run. Variables survive so a host can
    /// seed them before running.
    pub fn reset(&mut self) {
        self.current_line = 0;
        self.calls.clear();
        self.loops.clear();
        self.macros.clear();
        self.turtle.reset();
        self.files.close_all();
        self.condition = None;
        self.produced = None;
        self.held.clear();
    }

    /// A line of program output. Text held by an unterminated PRINT goes
    /// in front of it.
    pub fn log(&mut self, text: &str) {
        if self.held.is_empty() {
            self.host.log_output(text);
        } else {
            let line = std::mem::take(&mut self.held) + text;
            self.host.log_output(&line);
        }
    }

    /// Output that waits for the rest of its line.
    pub fn print_partial(&mut self, text: &str) {
        self.held.push_str(text);
    }

    pub fn flush(&mut self) {
        if !self.held.is_empty() {
            let line = std::mem::take(&mut self.held);
            self.host.log_output(&line);
        }
    }

    /// A condition the program's user should see.
    pub fn report(&mut self, text: &str) {
        tracing::debug!(line = self.current_line, "{}", text);
        self.log(text);
    }

    /// A diagnostic for the debug sink only.
    pub fn debug(&mut self, text: &str) {
        tracing::debug!(line = self.current_line, "{}", text);
        if self.config.debug {
            self.host.debug_output(text);
        }
    }

    pub fn input(&mut self, prompt: &str) -> String {
        let prompt = std::mem::take(&mut self.held) + prompt;
        self.host.get_user_input(&prompt)
    }

    /// Evaluate against current variables. Function conditions such as a
    /// negative SQRT are reported to the user as well as returned.
    pub fn eval(&mut self, text: &str) -> Result<Val> {
        let result = Evaluator::new(&self.vars, &mut self.rng).eval_str(text);
        if let Err(e) = &result {
            if e.code() == ErrorCode::IllegalFunctionCall && !e.text().is_empty() {
                let message = e.text().to_string();
                self.report(&message);
            }
        }
        result
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
    }

    /// The pending condition, consumed.
    pub fn take_condition(&mut self) -> Option<bool> {
        self.condition.take()
    }

    /// The pending condition, left in place.
    pub fn condition(&self) -> Option<bool> {
        self.condition
    }

    /// Hand a condition to the next statement.
    pub fn set_condition(&mut self, value: bool) {
        self.produced = Some(value);
    }

    pub(crate) fn begin_statement(&mut self, condition: Option<bool>) {
        self.condition = condition;
        self.produced = None;
    }

    /// A new condition replaces the pending one; otherwise an unconsumed
    /// condition carries on to the following statement.
    pub(crate) fn end_statement(&mut self) -> Option<bool> {
        let pending = self.condition.take();
        self.produced.take().or(pending)
    }

    /// Label lookup for jumps.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.program.label(name)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("current_line", &self.current_line)
            .field("calls", &self.calls)
            .field("loops", &self.loops)
            .field("vars", &self.vars)
            .finish()
    }
}
