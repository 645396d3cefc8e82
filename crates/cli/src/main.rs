use std::process::ExitCode;

fn main() -> ExitCode {
    shelfhook_cli::run()
}
