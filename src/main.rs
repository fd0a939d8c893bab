//! Binary entrypoint for the `prbridge` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match prbridge::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
