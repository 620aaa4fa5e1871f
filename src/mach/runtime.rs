use super::{Canvas, Config, Console, Context, Directive, Headless, Host, Pose, Program, Turtle, Val, Var};
use crate::error;
use crate::exec::Executors;
use crate::lang::{Error, Language};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a slice of execution ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Cycles ran out with the program still going.
    Running,
    /// The program ended, or nothing was loaded.
    Stopped,
    /// The step limit or the stop flag ended the program.
    Aborted(Error),
}

/// ## Line dispatcher
///
/// Feeds program lines to the executor for the current language and
/// applies the directive each one returns. A PILOT condition produced by
/// one statement is carried here and handed to the next statement only.

pub struct Runtime {
    ctx: Context,
    language: Language,
    executors: Executors,
    pending: Option<bool>,
    stop: Arc<AtomicBool>,
    steps: usize,
    running: bool,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Box::new(Console), Box::new(Headless))
    }
}

impl Runtime {
    pub fn new(host: Box<dyn Host>, canvas: Box<dyn Canvas>) -> Runtime {
        Runtime {
            ctx: Context::new(host, Turtle::new(canvas)),
            language: Language::Basic,
            executors: Executors::new(),
            pending: None,
            stop: Arc::new(AtomicBool::new(false)),
            steps: 0,
            running: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.ctx.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.ctx.config
    }

    /// Flag checked before every step. Safe to set from another thread.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn interrupt(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn variables(&self) -> &Var {
        &self.ctx.vars
    }

    pub fn variables_mut(&mut self) -> &mut Var {
        &mut self.ctx.vars
    }

    pub fn pose(&self) -> &Pose {
        self.ctx.turtle.pose()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Everything back to a fresh interpreter, variables included.
    pub fn clear(&mut self) {
        self.finish();
        self.ctx.reset();
        self.ctx.vars.clear();
        self.ctx.program.clear();
        self.executors.reset();
        self.pending = None;
    }

    /// Run the pre-pass and position at the first line.
    pub fn load(&mut self, source: &str, language: Language) {
        self.ctx.reset();
        self.executors.reset();
        self.ctx.program = Program::load(source, language);
        self.language = language;
        self.pending = None;
        self.steps = 0;
        self.stop.store(false, Ordering::SeqCst);
        self.running = true;
        tracing::info!(
            language = language.name(),
            lines = self.ctx.program.len(),
            "program loaded"
        );
    }

    /// Execute up to `cycles` lines of the loaded program.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if !self.running {
            return Event::Stopped;
        }
        for _ in 0..cycles {
            if self.stop.swap(false, Ordering::SeqCst) {
                self.ctx.report("Program stopped");
                tracing::warn!(line = self.ctx.current_line, "program stopped");
                self.finish();
                return Event::Aborted(error!(Break, self.ctx.current_line));
            }
            let text = match self.ctx.program.line(self.ctx.current_line) {
                Some(line) => line.text.clone(),
                None => {
                    self.finish();
                    return Event::Stopped;
                }
            };
            if self.steps >= self.ctx.config.max_steps {
                let limit = self.ctx.config.max_steps;
                self.ctx.report(&format!(
                    "Execution aborted: step limit of {} exceeded",
                    limit
                ));
                tracing::warn!(limit, "step limit exceeded");
                self.finish();
                return Event::Aborted(error!(StepLimit, self.ctx.current_line));
            }
            self.steps += 1;
            match self.step(&text) {
                Directive::Continue => self.ctx.current_line += 1,
                Directive::Jump(index) => self.ctx.current_line = index,
                Directive::End => {
                    self.finish();
                    return Event::Stopped;
                }
            }
        }
        Event::Running
    }

    /// One statement through the current executor. Errors become a debug
    /// diagnostic and `Continue`.
    fn step(&mut self, text: &str) -> Directive {
        self.ctx.begin_statement(self.pending.take());
        let result = match self.executors.get(self.language) {
            Some(executor) => executor.execute(&mut self.ctx, text),
            None => Err(error!(NotSupported; self.language.name())),
        };
        self.pending = self.ctx.end_statement();
        match result {
            Ok(directive) => directive,
            Err(e) => {
                let e = e.in_line(self.ctx.current_line);
                self.ctx.debug(&format!("Error executing '{}': {}", text, e));
                Directive::Continue
            }
        }
    }

    fn finish(&mut self) {
        if self.running {
            tracing::info!(steps = self.steps, "program finished");
        }
        self.ctx.flush();
        self.ctx.files.close_all();
        self.running = false;
    }

    /// Load and run to completion. False when aborted or when the language
    /// needs an external runtime.
    pub fn run(&mut self, source: &str, language: Language) -> bool {
        if language.is_external() {
            self.ctx.report(&format!(
                "{} programs need an external {} runtime; not supported here",
                language.name(),
                language.name()
            ));
            return false;
        }
        self.load(source, language);
        loop {
            match self.execute(1000) {
                Event::Running => continue,
                Event::Stopped => return true,
                Event::Aborted(_) => return false,
            }
        }
    }

    /// `None` when `tag` names no known language.
    pub fn run_program(&mut self, source: &str, tag: &str) -> Option<bool> {
        let language: Language = tag.parse().ok()?;
        Some(self.run(source, language))
    }

    /// Execute one line in the current language without touching the
    /// loaded program's position.
    pub fn execute_line(&mut self, line: &str) -> Directive {
        let text = line.trim();
        if text.is_empty() {
            return Directive::Continue;
        }
        let directive = self.step(text);
        self.ctx.flush();
        directive
    }

    pub fn evaluate_expression(&mut self, expr: &str) -> Result<Val, Error> {
        self.ctx.eval(expr)
    }
}
