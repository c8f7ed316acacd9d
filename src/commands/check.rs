use clap::Args;
use std::io::{self, Write};
use crate::Interpreter;
use crate::cli_util::print_interpret_error;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct CheckArgs {
    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

/// Validate loop structure without executing anything.
pub fn run(program: &str, args: CheckArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let CheckArgs { file, code, .. } = args;

    let Some(code_str) = super::load_code(program, file, code, usage_and_exit) else {
        return 1;
    };

    match Interpreter::new(&code_str) {
        Ok(_) => {
            println!("ok");
            let _ = io::stdout().flush();
            0
        }
        Err(e) => {
            print_interpret_error(Some(program), &code_str, &e);
            1
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} check "<code>"
  {0} check --file <PATH>

Options:
  --file, -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --help, -h         Show this help

Notes:
- Reports the innermost '[' that is never closed. A stray ']' is not an error.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
