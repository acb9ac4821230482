use std::process::ExitCode;

use clap::Parser;

mod cli;
mod signal;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let app = cli::App::parse();
    match cli::run(app) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", console::style("error:").red().bold());
            ExitCode::from(2)
        }
    }
}
