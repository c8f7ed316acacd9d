//! A small Brainfuck interpreter library.
//!
//! Programs run against a byte tape that starts as a single zero cell and
//! grows to the right on demand. Input is a string supplied up front and
//! output is collected and returned as bytes once the program halts.
//!
//! Features and behaviors:
//! - Cells are `u8` and wrap in both directions (255 + 1 = 0, 0 - 1 = 255).
//! - Moving left from cell 0 is a no-op; moving right past the end adds a zero cell.
//! - Characters outside `><+-.,[]` are comments.
//! - Loops are paired before execution; an unclosed `[` is
//!   [`InterpretError::MalformedProgram`]. A stray `]` does nothing.
//! - A loop keeps testing the cell the pointer was on when the loop was
//!   entered, even if its body leaves the pointer somewhere else.
//! - `,` past the end of input is [`InterpretError::InputExhausted`] unless
//!   [`EofPolicy::Zero`] is selected.
//!
//! Quick start:
//!
//! ```
//! use bf_interpret::interpret;
//!
//! // 6 * 10 + 5 = 65 = 'A'
//! let out = interpret("++++++[>++++++++++<-]>+++++.", "").expect("program should run");
//! assert_eq!(out, b"A");
//!
//! // Read one byte and echo it back
//! assert_eq!(interpret(",.", "Z").unwrap(), b"Z");
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod io;
pub mod loops;
pub mod tape;
mod theme;

pub use error::InterpretError;
pub use interpreter::{Interpreter, StepControl, interpret};
pub use io::{EofPolicy, InputCursor};
pub use loops::{JumpTable, find_loop_end};
pub use tape::Tape;
