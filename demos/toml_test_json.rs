//! A toml-test decoder: reads TOML on stdin, prints the tagged JSON form.
//!
//! Run with: cargo run --example toml_test_json < file.toml

use std::io::{self, Read};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut input = Vec::new();
    if let Err(err) = io::stdin().read_to_end(&mut input) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    let text = match std::str::from_utf8(&input) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("invalid UTF-8: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match tomlutil::to_debug_json(text) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
