/*!
## Rust Machine Module

The state every interpreter shares and the dispatcher that drives them:
values and arithmetic, variable memory, the loaded program, the turtle and
host boundaries, and the `Runtime` that steps through lines.

*/

mod config;
mod context;
mod directive;
mod eval;
mod file;
mod function;
mod host;
mod operation;
mod program;
mod runtime;
mod stack;
mod turtle;
mod val;
mod var;

pub use config::Config;
pub use context::Context;
pub use context::ForFrame;
pub use directive::Directive;
pub use eval::Evaluator;
pub use file::Files;
pub use file::Mode;
pub use function::Function;
pub use host::Capture;
pub use host::Console;
pub use host::Host;
pub use operation::Operation;
pub use program::Program;
pub use program::ProgramLine;
pub use runtime::Event;
pub use runtime::Runtime;
pub use stack::Stack;
pub use turtle::Canvas;
pub use turtle::Headless;
pub use turtle::Pose;
pub use turtle::Recorder;
pub use turtle::Turtle;
pub use turtle::TurtleCall;
pub use val::Val;
pub use var::Var;
