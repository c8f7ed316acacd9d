use clap::Args;
use std::{fs, thread};
use std::io::{self, IsTerminal, Read, Write};
use std::sync::{mpsc, Arc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use crate::{EofPolicy, InterpretError, Interpreter, StepControl};
use crate::cli_util::print_interpret_error;
use crate::config::settings;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print a step-by-step table of operations while executing
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Program input as TEXT (otherwise read from --input-file or STDIN)
    #[arg(short = 'i', long = "input", value_name = "TEXT", conflicts_with = "input_file")]
    pub input: Option<String>,

    /// Read program input from PATH
    #[arg(long = "input-file", value_name = "PATH")]
    pub input_file: Option<String>,

    /// What `,` does past the end of input (fallback BF_EOF; default error)
    #[arg(long = "eof", value_enum)]
    pub eof: Option<EofPolicy>,

    /// Wall-clock timeout in milliseconds (fallback BF_TIMEOUT_MS; default none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback BF_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<usize>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        debug,
        file,
        input,
        input_file,
        eof,
        timeout_ms,
        max_steps,
        code,
        ..
    } = args;

    let Some(code_str) = super::load_code(program, file, code, usage_and_exit) else {
        return 1;
    };

    // Input is raw bytes: cells are bytes, so nothing here requires UTF-8.
    let input_bytes: Vec<u8> = match (input, input_file) {
        (Some(text), _) => text.into_bytes(),
        (None, Some(path)) => match fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("{program}: failed to read input file: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        },
        // An interactive terminal has nothing queued up; treat it as empty input.
        (None, None) if io::stdin().is_terminal() => Vec::new(),
        (None, None) => {
            let mut buf = Vec::new();
            if let Err(e) = io::stdin().lock().read_to_end(&mut buf) {
                eprintln!("{program}: failed reading stdin: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
            buf
        }
    };

    // Resolve limits: flags -> env -> config file -> defaults
    let defaults = settings();
    let eof = eof.unwrap_or(defaults.eof);
    let timeout_ms = timeout_ms.or(defaults.timeout_ms);
    let max_steps = max_steps.or(defaults.max_steps);

    let bf = match Interpreter::new(&code_str) {
        Ok(bf) => bf.with_eof_policy(eof),
        Err(e) => {
            print_interpret_error(Some(program), &code_str, &e);
            return 1;
        }
    };

    // Execute on a worker thread with cooperative cancellation
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<Result<Vec<u8>, InterpretError>>();
    let cancel_clone = cancel.clone();

    let interrupted = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || interrupted.store(true, Ordering::Relaxed)) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
    }

    thread::spawn(move || {
        let ctrl = StepControl::new(max_steps, cancel_clone);
        let res = if debug {
            let mut stdout = io::stdout().lock();
            bf.run_debug_with_control(&input_bytes, &mut stdout, &ctrl)
        } else {
            bf.run_with_control(&input_bytes, &ctrl)
        };
        let _ = tx.send(res);
    });

    let received = match timeout_ms {
        Some(ms) => rx.recv_timeout(Duration::from_millis(ms)),
        None => rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected),
    };

    let exit_code = match received {
        Ok(Ok(output)) => {
            let mut stdout = io::stdout().lock();
            if stdout.write_all(&output).is_err() {
                return 1;
            }
            0
        }
        Ok(Err(InterpretError::StepLimitExceeded { limit })) => {
            eprintln!("Execution aborted: step limit exceeded ({limit})");
            let _ = io::stderr().flush();
            1
        }
        Ok(Err(InterpretError::Canceled)) => {
            eprintln!("Execution aborted: interrupted");
            let _ = io::stderr().flush();
            1
        }
        Ok(Err(other)) => {
            print_interpret_error(Some(program), &code_str, &other);
            1
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            cancel.store(true, Ordering::Relaxed);
            eprintln!(
                "Execution aborted: wall-clock timeout exceeded ({} ms)",
                timeout_ms.unwrap_or_default()
            );
            let _ = io::stderr().flush();
            1
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => 1,
    };

    println!();
    let _ = io::stdout().flush();
    exit_code
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] "<code>"
  {0} run [OPTIONS] --file <PATH>

Options:
  --file,  -f <PATH>     Read Brainfuck code from PATH instead of positional "<code>"
  --input, -i <TEXT>     Use TEXT as program input
  --input-file <PATH>    Read program input from PATH
  --eof <error|zero>     Behavior of `,` once input is exhausted (default: error)
  --timeout <MS>         Abort after MS milliseconds of wall-clock time
  --max-steps <N>        Abort after N executed instructions
  --debug, -d            Print a step-by-step table of operations
  --help,  -h            Show this help

Notes:
- Without --input or --input-file, piped STDIN is read up front as program input.
- Input is consumed as raw bytes, one per `,`; it does not need to be UTF-8.
- Any character outside of Brainfuck's ><+-.,[] is treated as a comment.
- Defaults can be set in $XDG_CONFIG_HOME/bfi.toml under [interpreter]
  or through BF_EOF, BF_TIMEOUT_MS and BF_MAX_STEPS.

Examples:
- Echo the first byte of input:
    {0} run --input "A" ",."
- Load Brainfuck code from a file and feed it a file as input:
    {0} run --file ./program.bf < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
