//! Entry point for the `reparto` command-line interface.
#![forbid(unsafe_code)]

use reparto_cli::{CliError, error_report};

fn main() {
    env_logger::init();
    if let Err(err) = reparto_cli::run() {
        if let CliError::ArgumentParsing(clap_err) = &err
            && !clap_err.use_stderr()
        {
            clap_err.exit();
        }
        eprintln!("{}", error_report(&err));
        std::process::exit(1);
    }
}
