//! jet command-line entry point.

use std::io::{self, Write};
use std::process::ExitCode;

use jetc::{init_tracing, parse_args, run, Command, Exit, USAGE};

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let exit = match parse_args(&args) {
        Ok(Command::Help) => {
            print!("{USAGE}");
            Exit::Success
        }
        Ok(Command::Version) => {
            println!("jet {}", env!("CARGO_PKG_VERSION"));
            Exit::Success
        }
        Ok(Command::Run(options)) => {
            let stdout = io::stdout();
            let mut out = io::BufWriter::new(stdout.lock());
            let exit = run(&options, &mut io::stdin().lock(), &mut out, &mut io::stderr());
            // `run` already flushed; a failure here means stdout closed.
            let _ = out.flush();
            exit
        }
        Err(err) => {
            eprintln!("jet: {err}");
            eprintln!("Use jet --help for usage.");
            Exit::Usage
        }
    };
    ExitCode::from(exit.code())
}
