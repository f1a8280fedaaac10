use std::process::ExitCode;

fn main() -> ExitCode {
    toolfinder_cli::run()
}
