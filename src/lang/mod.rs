/*!
# Rust Language Module

This Rust module holds the text-level side of the interpreters: the error
type, language tags, expression lexing and parsing, and the scanners the
executors use to pick statements apart.

*/

#[macro_use]
mod error;
mod language;
mod lex;
mod parse;

pub mod ast;
pub mod block;
pub mod split;
pub mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use language::Language;
pub use lex::lex;
pub use parse::parse;
