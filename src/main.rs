//! Spritemod - command-line tool for editing sprites across SVG animation frames

use std::process::ExitCode;

use spritemod::cli;

fn main() -> ExitCode {
    cli::run()
}
