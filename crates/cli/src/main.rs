use std::process::ExitCode;

fn main() -> ExitCode {
    catalog_admin_cli::run()
}
