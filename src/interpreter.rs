//! The instruction dispatcher.
//!
//! An [`Interpreter`] holds a validated program. Every call to one of its
//! `run*` methods builds a fresh execution context (tape, input cursor,
//! output buffer, loop frames), so runs never observe each other.

use std::io::Write;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::error::{InterpretError, Result};
use crate::io::{EofPolicy, InputCursor};
use crate::loops::JumpTable;
use crate::tape::Tape;

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// A Brainfuck program ready to run.
///
/// Any character outside `><+-.,[]` is a comment. Loops are paired once, up
/// front; a `[` that is never closed is rejected here rather than when the
/// loop is reached. A stray `]` is kept and does nothing.
#[derive(Debug, Clone)]
pub struct Interpreter {
    code: Vec<char>,
    jumps: JumpTable,
    eof: EofPolicy,
}

/// Per-run state. Dropped when the run returns.
struct Machine<'a> {
    tape: Tape,
    input: InputCursor<'a>,
    output: Vec<u8>,
    // Tape index that governs each loop currently executing, innermost last.
    // Captured on loop entry and re-read on every iteration.
    frames: Vec<usize>,
}

impl<'a> Machine<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            tape: Tape::new(),
            input: InputCursor::new(input),
            output: Vec::new(),
            frames: Vec::new(),
        }
    }
}

fn is_instruction(c: char) -> bool {
    matches!(c, '>' | '<' | '+' | '-' | '.' | ',' | '[' | ']')
}

impl Interpreter {
    /// Prepare `source` for execution.
    ///
    /// Brackets are checked here, before anything runs: an unclosed `[`
    /// fails with [`InterpretError::MalformedProgram`] even when execution
    /// would have stopped earlier (input exhausted) or never reached it.
    pub fn new(source: &str) -> Result<Self> {
        let code: Vec<char> = source.chars().collect();
        let jumps = JumpTable::build(&code)?;
        Ok(Self {
            code,
            jumps,
            eof: EofPolicy::default(),
        })
    }

    pub fn with_eof_policy(mut self, eof: EofPolicy) -> Self {
        self.eof = eof;
        self
    }

    pub fn eof_policy(&self) -> EofPolicy {
        self.eof
    }

    /// Execute the program against `input` and return everything it printed.
    ///
    /// `input` is taken as raw bytes, one per `,`; `&str`, `&[u8]` and
    /// `Vec<u8>` all work.
    pub fn run<I: AsRef<[u8]> + ?Sized>(&self, input: &I) -> Result<Vec<u8>> {
        self.execute(input.as_ref(), None, None)
    }

    /// Execute with cooperative cancellation and optional step limit.
    pub fn run_with_control<I: AsRef<[u8]> + ?Sized>(
        &self,
        input: &I,
        step_control: &StepControl,
    ) -> Result<Vec<u8>> {
        self.execute(input.as_ref(), None, Some(step_control))
    }

    /// Execute while writing a step-by-step table of operations to `trace`.
    ///
    /// Effects are applied exactly as in [`run`](Self::run); the program's
    /// output is still collected and returned.
    pub fn run_debug<I: AsRef<[u8]> + ?Sized, W: Write>(
        &self,
        input: &I,
        trace: &mut W,
    ) -> Result<Vec<u8>> {
        self.execute(input.as_ref(), Some(trace as &mut dyn Write), None)
    }

    /// Debug-run with cooperative cancellation and optional step limit.
    pub fn run_debug_with_control<I: AsRef<[u8]> + ?Sized, W: Write>(
        &self,
        input: &I,
        trace: &mut W,
        step_control: &StepControl,
    ) -> Result<Vec<u8>> {
        self.execute(input.as_ref(), Some(trace as &mut dyn Write), Some(step_control))
    }

    /// Internal executor shared by every `run*` entry point.
    fn execute(
        &self,
        input: &[u8],
        mut trace: Option<&mut dyn Write>,
        step_control: Option<&StepControl>,
    ) -> Result<Vec<u8>> {
        let mut m = Machine::new(input);
        let mut code_ptr = 0;
        let code_len = self.code.len();
        let mut step: usize = 0;

        if let Some(w) = trace.as_deref_mut() {
            write_header(w).map_err(|source| InterpretError::Io { ip: 0, source })?;
        }

        while code_ptr < code_len {
            let instr = self.code[code_ptr];
            if !is_instruction(instr) {
                code_ptr += 1;
                continue;
            }

            if let Some(ctrl) = step_control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    return Err(InterpretError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if step >= max {
                        return Err(InterpretError::StepLimitExceeded { limit: max });
                    }
                }
            }

            let (ptr_before, cell_before) = (m.tape.pointer(), m.tape.read());
            let mut action: Option<String> = trace.as_ref().map(|_| String::new());
            let mut next = code_ptr + 1;

            match instr {
                '>' => {
                    m.tape.advance();
                    if let Some(a) = action.as_mut() {
                        *a = format!("Moved pointer head to index {}", m.tape.pointer());
                    }
                }
                '<' => {
                    m.tape.retreat();
                    if let Some(a) = action.as_mut() {
                        *a = if ptr_before == 0 {
                            "Pointer already at index 0; unchanged".to_string()
                        } else {
                            format!("Moved pointer head to index {}", m.tape.pointer())
                        };
                    }
                }
                '+' => {
                    let after = m.tape.increment();
                    if let Some(a) = action.as_mut() {
                        *a = format!(
                            "Increment cell[{}] from {} to {}",
                            ptr_before, cell_before, after
                        );
                    }
                }
                '-' => {
                    let after = m.tape.decrement();
                    if let Some(a) = action.as_mut() {
                        *a = format!(
                            "Decrement cell[{}] from {} to {}",
                            ptr_before, cell_before, after
                        );
                    }
                }
                '.' => {
                    m.output.push(cell_before);
                    if let Some(a) = action.as_mut() {
                        *a = format!("Output byte {} ({:?})", cell_before, cell_before as char);
                    }
                }
                ',' => {
                    let value = match (m.input.next_byte(), self.eof) {
                        (Some(b), _) => b,
                        (None, EofPolicy::Zero) => 0,
                        (None, EofPolicy::Error) => {
                            return Err(InterpretError::InputExhausted {
                                ip: code_ptr,
                                consumed: m.input.position(),
                            });
                        }
                    };
                    m.tape.write(value);
                    if let Some(a) = action.as_mut() {
                        *a = format!("Read input byte #{} -> {}", m.input.position(), value);
                    }
                }
                '[' => {
                    let Some(close) = self.jumps.target(code_ptr) else {
                        return Err(InterpretError::MalformedProgram { ip: code_ptr });
                    };
                    if cell_before == 0 {
                        next = close + 1;
                        if let Some(a) = action.as_mut() {
                            *a = format!("Cell is 0; skip loop to IP {}", next);
                        }
                    } else {
                        m.frames.push(ptr_before);
                        if let Some(a) = action.as_mut() {
                            *a = format!("Enter loop on cell[{}]", ptr_before);
                        }
                    }
                }
                ']' => match self.jumps.target(code_ptr) {
                    None => {
                        if let Some(a) = action.as_mut() {
                            *a = "Unmatched ']'; ignored".to_string();
                        }
                    }
                    Some(open) => {
                        // A matched ']' is only reached from inside its loop,
                        // so the '[' that opened it has pushed a frame.
                        let Some(&entry) = m.frames.last() else {
                            return Err(InterpretError::MalformedProgram { ip: open });
                        };
                        let value = m.tape.cell(entry);
                        if value != 0 {
                            next = open + 1;
                            if let Some(a) = action.as_mut() {
                                *a = format!(
                                    "cell[{}] = {}; repeat loop from IP {}",
                                    entry, value, next
                                );
                            }
                        } else {
                            m.frames.pop();
                            if let Some(a) = action.as_mut() {
                                *a = format!("Exit loop (cell[{}] is 0)", entry);
                            }
                        }
                    }
                },
                _ => {}
            }

            if let Some(w) = trace.as_deref_mut() {
                writeln!(
                    w,
                    "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
                    step,
                    code_ptr,
                    ptr_before,
                    cell_before,
                    instr,
                    action.unwrap_or_default()
                )
                .map_err(|source| InterpretError::Io { ip: code_ptr, source })?;
            }

            step += 1;
            code_ptr = next;
        }

        Ok(m.output)
    }
}

fn write_header(w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "STEP | IP  | PTR | CELL | INSTR | ACTION")?;
    writeln!(w, "-----+-----+-----+------+-------+------------------------------------------------")
}

/// Run `source` against `input` and return the bytes it printed.
///
/// Uses [`EofPolicy::Error`] and no step limit: a program that never halts
/// never returns.
///
/// ```
/// let out = bf_interpret::interpret("++++++[>++++++++++<-]>+++++.", "").unwrap();
/// assert_eq!(out, b"A");
/// ```
pub fn interpret(source: &str, input: &str) -> Result<Vec<u8>> {
    Interpreter::new(source)?.run(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_one_input_byte() {
        assert_eq!(interpret(",.", "A").unwrap(), b"A");
    }

    #[test]
    fn prints_raw_cell_value() {
        assert_eq!(interpret("+++.", "").unwrap(), vec![3]);
    }

    #[test]
    fn multiplication_loop_prints_a() {
        assert_eq!(interpret("++++++[>++++++++++<-]>+++++.", "").unwrap(), vec![65]);
    }

    #[test]
    fn hello_world() {
        let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
        assert_eq!(interpret(code, "").unwrap(), b"Hello World!\n");
    }

    #[test]
    fn comments_only_produce_nothing() {
        assert!(interpret("hello", "").unwrap().is_empty());
    }

    #[test]
    fn unmatched_open_bracket_returns_error() {
        let result = interpret("[", "");
        assert!(matches!(result, Err(InterpretError::MalformedProgram { ip: 0 })));
    }

    #[test]
    fn unclosed_loop_wins_over_input_exhaustion() {
        // Execution would run out of input at ',' first, but brackets are
        // checked before the first instruction runs.
        let result = interpret(",[", "");
        assert!(matches!(result, Err(InterpretError::MalformedProgram { ip: 1 })));
    }

    #[test]
    fn unreachable_unclosed_loop_is_still_rejected() {
        assert!(matches!(
            Interpreter::new("+[]+["),
            Err(InterpretError::MalformedProgram { ip: 4 })
        ));
    }

    #[test]
    fn input_is_read_as_raw_bytes() {
        let bf = Interpreter::new(",.,.").unwrap();
        assert_eq!(bf.run(&[0xff_u8, 0x00][..]).unwrap(), vec![0xff, 0x00]);
        assert_eq!(bf.run(&vec![b'o', b'k']).unwrap(), b"ok");
    }

    #[test]
    fn stray_close_bracket_is_ignored() {
        assert_eq!(interpret("+]+.", "").unwrap(), vec![2]);
    }

    #[test]
    fn empty_loop_on_zero_cell_is_ok() {
        assert!(interpret("[]", "").unwrap().is_empty());
    }

    #[test]
    fn loop_on_zero_cell_skips_body() {
        // The body would print and move the pointer if it ran.
        assert_eq!(interpret("[.>+++]+.", "").unwrap(), vec![1]);
    }

    #[test]
    fn nested_loops_run_to_completion() {
        // 3 outer iterations * 4 inner iterations = 12
        assert_eq!(interpret("+++[>++++[>+<-]<-]>>.", "").unwrap(), vec![12]);
    }

    #[test]
    fn loop_condition_stays_on_entry_cell() {
        // The body clears cell 0 and then steps onto cell 1 (= 5). The loop is
        // keyed on cell 0, so it exits after one pass even though the pointer
        // now sits on a non-zero cell.
        let out = interpret(">+++++<+[->.]", "").unwrap();
        assert_eq!(out, vec![5]);
    }

    #[test]
    fn classic_transfer_loop() {
        // Move cell 0 (= 2) into cell 1.
        let out = interpret("++[>+<-]>.", "").unwrap();
        assert_eq!(out, vec![2]);
    }

    #[test]
    fn wrapping_subtraction() {
        assert_eq!(interpret("-.", "").unwrap(), vec![255]);
    }

    #[test]
    fn wrapping_addition() {
        let code = format!("{}.", "+".repeat(256));
        assert_eq!(interpret(&code, "").unwrap(), vec![0]);
    }

    #[test]
    fn retreat_at_origin_is_noop() {
        assert_eq!(interpret("<<+.", "").unwrap(), vec![1]);
    }

    #[test]
    fn input_exhausted_by_default() {
        let result = interpret(",,", "x");
        assert!(matches!(
            result,
            Err(InterpretError::InputExhausted { ip: 1, consumed: 1 })
        ));
    }

    #[test]
    fn zero_policy_reads_zero_past_end() {
        let bf = Interpreter::new("+,.").unwrap().with_eof_policy(EofPolicy::Zero);
        assert_eq!(bf.run("").unwrap(), vec![0]);
    }

    #[test]
    fn runs_are_independent() {
        let bf = Interpreter::new(",+.").unwrap();
        assert_eq!(bf.run("a").unwrap(), b"b");
        assert_eq!(bf.run("a").unwrap(), b"b");
    }

    #[test]
    fn step_limit_aborts_infinite_loop() {
        let bf = Interpreter::new("+[]").unwrap();
        let ctrl = StepControl::new(Some(50), Arc::new(AtomicBool::new(false)));
        let result = bf.run_with_control("", &ctrl);
        assert!(matches!(result, Err(InterpretError::StepLimitExceeded { limit: 50 })));
    }

    #[test]
    fn comments_do_not_count_as_steps() {
        let bf = Interpreter::new("a+b+c+d.").unwrap();
        let ctrl = StepControl::new(Some(4), Arc::new(AtomicBool::new(false)));
        assert_eq!(bf.run_with_control("", &ctrl).unwrap(), vec![3]);
    }

    #[test]
    fn cancel_flag_stops_execution() {
        let bf = Interpreter::new("+[]").unwrap();
        let ctrl = StepControl::new(None, Arc::new(AtomicBool::new(true)));
        assert!(matches!(bf.run_with_control("", &ctrl), Err(InterpretError::Canceled)));
    }

    #[test]
    fn debug_trace_lists_each_step() {
        let bf = Interpreter::new(">+.").unwrap();
        let mut trace = Vec::new();
        let out = bf.run_debug("", &mut trace).unwrap();
        let text = String::from_utf8(trace).unwrap();
        assert_eq!(out, vec![1]);
        assert!(text.starts_with("STEP | IP"));
        assert!(text.contains("Moved pointer head to index 1"));
        assert!(text.contains("Increment cell[1] from 0 to 1"));
        assert_eq!(text.lines().count(), 2 + 3);
    }
}
