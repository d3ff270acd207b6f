//! Parse a TOML document, look around in it, and write it back.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use std::error::Error;
use tomlutil::{from_str, from_value, to_string};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Server {
    host: String,
    port: u16,
    tags: Vec<String>,
}

const CONFIG: &str = r#"
title = "simple"

[server]
host = "localhost"
port = 8080
tags = ["web", "internal"]
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let map = from_str(CONFIG)?;

    println!("Top-level keys, in file order:");
    for (key, value) in &map {
        println!("  {} ({})", key, value.type_name());
    }

    let section = map.get("server").cloned().ok_or("missing [server]")?;
    let server: Server = from_value(section)?;
    println!("\nTyped view: {:?}", server);

    println!("\nWritten back:\n{}", to_string(&map)?);
    Ok(())
}
