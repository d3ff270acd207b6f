//! Strict conversion and pretty output with Options.
//!
//! Run with: cargo run --example custom_options

use std::error::Error;
use tomlutil::document::{Node, Table};
use tomlutil::{to_string_with_options, toml_value, Converter, Options};

fn main() -> Result<(), Box<dyn Error>> {
    let config = toml_value!({
        "name": "MyApp",
        "ports": [8080, 8081, 8082],
        "matrix": [[1, 2], [3, 4]]
    });

    println!("Default:\n{}", to_string_with_options(&config, Options::new())?);
    println!(
        "Pretty, indent 2:\n{}",
        to_string_with_options(&config, Options::pretty().with_indent(2))?
    );

    // A hand-built tree with a node the converter cannot express.
    let mut root = Table::new();
    root.push("kept", Node::Integer(1));
    root.push("opaque", Node::Unsupported("<binary blob>".to_string()));

    let mut lenient = Converter::new(&Options::new());
    let map = lenient.convert(&root)?;
    println!("Best effort kept {} key(s)", map.len());
    for fault in lenient.skipped() {
        println!("  skipped: {}", fault);
    }

    let mut strict = Converter::new(&Options::strict());
    match strict.convert(&root) {
        Ok(_) => println!("Strict conversion unexpectedly succeeded"),
        Err(err) => println!("Strict: {} (code {})", err, err.code()),
    }
    Ok(())
}
