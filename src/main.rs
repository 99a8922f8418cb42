use std::process::ExitCode;

mod app;
mod catalog;
mod config;
mod cover;
mod downloads;
mod player;
mod remote;
mod runtime;
mod session;
mod ui;

fn main() -> ExitCode {
    match runtime::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("attacca: {e}");
            ExitCode::FAILURE
        }
    }
}
