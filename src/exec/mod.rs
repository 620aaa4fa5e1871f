/*!
# Rust Executor Module

One executor per built-in language. An executor runs a single logical
line against the shared `Context` and tells the dispatcher where to go
next. Errors come back as data; the dispatcher logs them and moves on.

*/

mod basic;
mod forth;
mod logo;
mod pascal;
mod pilot;
mod prolog;

pub use basic::Basic;
pub use forth::Forth;
pub use logo::Logo;
pub use pascal::Pascal;
pub use pilot::Pilot;
pub use prolog::Prolog;

use crate::lang::{Error, Language};
use crate::mach::{Context, Directive};

pub trait Executor {
    fn execute(&mut self, ctx: &mut Context, line: &str) -> Result<Directive, Error>;

    /// Drop per-program state before a new run.
    fn reset(&mut self) {}
}

/// Handler in a keyword table: receives the text after the keyword.
pub type Handler<E> = fn(&mut E, &mut Context, &str) -> Result<Directive, Error>;

#[derive(Default)]
pub struct Executors {
    pilot: Pilot,
    basic: Basic,
    logo: Logo,
    pascal: Pascal,
    prolog: Prolog,
    forth: Forth,
}

impl Executors {
    pub fn new() -> Executors {
        Executors::default()
    }

    /// `None` for languages that need an external runtime.
    pub fn get(&mut self, language: Language) -> Option<&mut dyn Executor> {
        match language {
            Language::Pilot => Some(&mut self.pilot),
            Language::Basic => Some(&mut self.basic),
            Language::Logo => Some(&mut self.logo),
            Language::Pascal => Some(&mut self.pascal),
            Language::Prolog => Some(&mut self.prolog),
            Language::Forth => Some(&mut self.forth),
            Language::Perl | Language::Python | Language::JavaScript => None,
        }
    }

    pub fn reset(&mut self) {
        self.pilot.reset();
        self.basic.reset();
        self.logo.reset();
        self.pascal.reset();
        self.prolog.reset();
        self.forth.reset();
    }
}

/// Split a line into its upper-cased leading word and the trimmed rest.
pub(crate) fn keyword(line: &str) -> (String, &str) {
    let line = line.trim();
    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'))
        .unwrap_or(line.len());
    (line[..end].to_ascii_uppercase(), line[end..].trim())
}
