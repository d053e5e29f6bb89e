//! CLI command implementations.

use std::fs;
use std::io::{BufReader, Write};

use ipp_common::Program;
use ipp_interp::{InputSource, LabelTable, LineInput};

/// Execute an IPPcode24 source file. WRITE goes to stdout, DPRINT/BREAK to
/// stderr, READ takes stdin unless `--input FILE` is given.
pub fn run(args: &[String]) -> i32 {
    if args.is_empty() {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: ippint run <input.src> [--input FILE]");
        return 1;
    }

    let source = &args[0];

    // Parse --input flag
    let input_file = match args.get(1).map(String::as_str) {
        Some("--input") => match args.get(2) {
            Some(path) => Some(path.clone()),
            None => {
                eprintln!("error: --input requires a file argument");
                return 1;
            }
        },
        Some(other) => {
            eprintln!("error: unexpected argument '{other}'");
            return 1;
        }
        None => None,
    };

    let program = match load_program(source) {
        Ok(program) => program,
        Err(code) => return code,
    };

    match input_file {
        Some(path) => {
            let file = match fs::File::open(&path) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("error: cannot read '{path}': {e}");
                    return 1;
                }
            };
            execute(&program, LineInput::new(BufReader::new(file)))
        }
        None => execute(&program, LineInput::new(std::io::stdin().lock())),
    }
}

/// Parse and validate a source file without executing it: source grammar,
/// program structure, and the label pre-pass.
pub fn check(args: &[String]) -> i32 {
    if args.is_empty() {
        eprintln!("error: check requires an input file");
        eprintln!("Usage: ippint check <input.src>");
        return 1;
    }

    let source = &args[0];
    let program = match load_program(source) {
        Ok(program) => program,
        Err(code) => return code,
    };

    if let Err(e) = LabelTable::build(&program) {
        eprintln!("error: {e}");
        return e.exit_code();
    }

    println!("OK: {source} ({} instructions)", program.len());
    0
}

fn load_program(path: &str) -> Result<Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;
    ipp_parser::parse(&text).map_err(|e| {
        eprintln!("error: {e}");
        e.exit_code()
    })
}

fn execute<I: InputSource>(program: &Program, input: I) -> i32 {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let code = match ipp_interp::run(program, input, &mut out, std::io::stderr()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("runtime error: {e}");
            e.exit_code()
        }
    };
    if let Err(e) = out.flush() {
        eprintln!("error: cannot write output: {e}");
        return 1;
    }
    code
}
