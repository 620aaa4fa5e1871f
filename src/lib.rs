//! # Time Warp
//!
//! The interpreter core of an educational multi-language environment.
//! Six small languages share one set of variables, one turtle and one
//! output sink: PILOT, BASIC, Logo, Pascal, Prolog and Forth.
//!
//! A program is loaded into a [`Runtime`](mach::Runtime), which feeds it
//! one line at a time to the executor for its language and follows the
//! [`Directive`](mach::Directive) each line returns.
//!
//! ```
//! use timewarp::mach::{Capture, Recorder, Runtime};
//!
//! let host = Capture::new();
//! let mut runtime = Runtime::new(Box::new(host.clone()), Box::new(Recorder::new()));
//! assert_eq!(runtime.run_program("10 PRINT 1 + 2", "basic"), Some(true));
//! assert_eq!(host.output(), vec!["3"]);
//! ```
//!
//! Run a file with `timewarp program.bas`, or start the prompt with no
//! arguments. `TIMEWARP_LOG=debug` shows interpreter tracing.

pub mod exec;
pub mod lang;
pub mod mach;
pub mod term;
