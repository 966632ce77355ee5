//! Generate minimal bitmap fonts for CircuitPython devices.

use cp_font_gen::core;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli_args = core::platform::get_cli_args();
    match core::run_app(cli_args).await {
        Ok(code) => code,
        Err(error) => core::platform::handle_error(error),
    }
}
