//! Operator helper for session tokens
//!
//! `session-token create` prints a freshly minted token in the same format
//! the wiki issues at login.

use std::process::ExitCode;

const USAGE: &str = "usage: session-token create";

fn main() -> ExitCode {
    let command = std::env::args().nth(1);

    match command.as_deref() {
        Some("create") => match wiki::session::generate_token() {
            Ok(token) => {
                println!("{token}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("failed to generate token: {e}");
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
    }
}
