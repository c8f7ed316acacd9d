pub mod check;
pub mod run;

use std::fs;
use std::io::{self, Write};

/// Resolve the program text from either `--file` or the positional parts.
///
/// Exits through `usage` when neither or both are given. Returns `None`
/// (after reporting) when the file cannot be read.
pub(crate) fn load_code(
    program: &str,
    file: Option<String>,
    code: Vec<String>,
    usage: fn(&str, i32) -> !,
) -> Option<String> {
    if file.is_none() && code.is_empty() {
        usage(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage(program, 2);
    }

    match file {
        Some(path) => match fs::read_to_string(&path) {
            Ok(s) => Some(s),
            Err(e) => {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                None
            }
        },
        None => Some(code.join("")),
    }
}
