//! IPPcode24 CLI — parse, check, and execute IPPcode24 programs.
//!
//! Exit codes:
//! - 0: Success (or the program's own EXIT code)
//! - 1: File/stream error
//! - 32: Malformed source (header, opcodes, operands, structure)
//! - 52-58: Runtime error taxonomy (labels, types, variables, frames,
//!   stacks, arithmetic, strings)

mod commands;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let code = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "check" => commands::check(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            0
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            1
        }
    };

    process::exit(code);
}

fn print_usage() {
    eprintln!("Usage: ippint <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <input.src> [--input FILE]   Execute an IPPcode24 program");
    eprintln!("                                   (READ uses FILE instead of stdin)");
    eprintln!("  check <input.src>                Parse and validate without executing");
}
