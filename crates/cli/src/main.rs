use std::process::ExitCode;

fn main() -> ExitCode {
    flack_cli::run()
}
