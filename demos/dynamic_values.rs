//! Walking a converted document whose shape is not known up front.
//!
//! Run with: cargo run --example dynamic_values

use std::error::Error;
use tomlutil::{from_str, Value};

const INPUT: &str = r#"
name = "cluster"
created = 2024-01-15T09:30:00Z

[[nodes]]
host = "alpha"
cores = 8
load = [0.5, 0.7, 0.2]

[[nodes]]
host = "beta"
cores = 16
load = []

[limits]
memory = "32G"
window = 08:00:00
"#;

fn walk(path: &str, value: &Value) {
    match value {
        Value::Map(map) => {
            for (key, child) in map {
                let next = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                walk(&next, child);
            }
        }
        Value::Array(items) if items.iter().all(Value::is_map) && !items.is_empty() => {
            for (i, item) in items.iter().enumerate() {
                walk(&format!("{}[{}]", path, i), item);
            }
        }
        Value::DateTime(dt) => {
            println!("{:<20} {:?} {}", path, dt.kind, dt);
        }
        other => println!("{:<20} {}", path, other),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let map = from_str(INPUT)?;
    walk("", &Value::Map(map.clone()));

    let total_cores: i64 = map
        .get("nodes")
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .filter_map(|n| n.get("cores").and_then(Value::as_i64))
                .sum()
        })
        .unwrap_or(0);
    println!("\nTotal cores: {}", total_cores);

    if let Some(created) = map.get("created").and_then(Value::as_datetime) {
        println!("Created (chrono): {:?}", created.to_fixed_offset());
    }
    Ok(())
}
