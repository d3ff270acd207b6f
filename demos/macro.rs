//! Building values with the toml_value! macro.
//!
//! Run with: cargo run --example macro

use std::error::Error;
use tomlutil::{to_string, toml_value, DateTime};

fn main() -> Result<(), Box<dyn Error>> {
    let flag = toml_value!(true);
    let number = toml_value!(42);
    let text = toml_value!("Hello, TOML!");
    println!("Scalars: {} {} {}", flag, number, text);

    let mixed = toml_value!([1, "two", 3.0, false]);
    println!("Inline array: {}", mixed);

    let document = toml_value!({
        "title": "Inventory",
        "updated": (DateTime::local_date(2024, 3, 1)),
        "owner": {
            "name": "Alice",
            "email": "alice@example.com"
        },
        "items": [
            { "sku": "A-1", "count": 3 },
            { "sku": "B-2", "count": 0 }
        ]
    });

    println!("\nAs TOML:\n{}", to_string(&document)?);
    Ok(())
}
