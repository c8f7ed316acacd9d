use std::io::{self, IsTerminal, Write};
use nu_ansi_term::Style;
use crate::InterpretError;
use crate::theme::catppuccin::Mocha;

/// Render an [`InterpretError`] as the one-line message the CLI prints.
/// If `program` is `Some("bfi")`, the message is prefixed with "bfi: ...".
pub fn error_message(program: Option<&str>, err: &InterpretError) -> String {
    let msg = match err {
        InterpretError::MalformedProgram { .. } => "Parse error: unmatched bracket '['".to_string(),
        InterpretError::InputExhausted { consumed, .. } => {
            format!("Runtime error: input exhausted after {consumed} byte(s)")
        }
        InterpretError::Io { source, .. } => format!("I/O error: {source}"),
        other => other.to_string(),
    };
    match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg,
    }
}

/// Pretty-print an [`InterpretError`] to stderr, with a caret under the
/// offending instruction when the error points at one.
pub fn print_interpret_error(program: Option<&str>, code: &str, err: &InterpretError) {
    let msg = error_message(program, err);
    match err.instruction() {
        Some(ip) => print_error_with_context(&msg, code, ip),
        None => {
            eprintln!("{}", paint(Style::new().fg(Mocha::RED), &msg));
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    let mut stderr = io::stderr().lock();
    let _ = write_error_with_context(&mut stderr, stderr_is_styled(), prefix, code, pos);
    let _ = stderr.flush();
}

/// Same as [`print_error_with_context`] but into any writer.
pub fn write_error_with_context<W: Write>(
    w: &mut W,
    styled: bool,
    prefix: &str,
    code: &str,
    pos: usize,
) -> io::Result<()> {
    let headline = format!("{prefix} at instruction {pos}");
    let caret_style = Style::new().fg(Mocha::PEACH).bold();
    let context_style = Style::new().fg(Mocha::SURFACE2);
    if styled {
        writeln!(w, "{}", Style::new().fg(Mocha::RED).paint(&headline))?;
    } else {
        writeln!(w, "{headline}")?;
    }

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    let slice = &code[start_byte..end_byte];

    // Caret under the exact position
    let caret_offset_chars = pos.saturating_sub(start_char);
    let underline = format!("{}^", " ".repeat(caret_offset_chars));

    if styled {
        writeln!(w, "  {}", context_style.paint(slice))?;
        writeln!(w, "  {}", caret_style.paint(&underline))
    } else {
        writeln!(w, "  {slice}")?;
        writeln!(w, "  {underline}")
    }
}

fn stderr_is_styled() -> bool {
    io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

fn paint(style: Style, msg: &str) -> String {
    if stderr_is_styled() {
        style.paint(msg).to_string()
    } else {
        msg.to_string()
    }
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_points_at_instruction() {
        let mut buf = Vec::new();
        write_error_with_context(&mut buf, false, "bfi: oops", "++[--", 2).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["bfi: oops at instruction 2", "  ++[--", "    ^"]);
    }

    #[test]
    fn context_window_handles_multibyte_chars() {
        let mut buf = Vec::new();
        write_error_with_context(&mut buf, false, "e", "é[", 1).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("  é[\n   ^"));
    }

    #[test]
    fn malformed_message_mentions_bracket() {
        let err = InterpretError::MalformedProgram { ip: 0 };
        assert_eq!(error_message(Some("bfi"), &err), "bfi: Parse error: unmatched bracket '['");
    }
}
