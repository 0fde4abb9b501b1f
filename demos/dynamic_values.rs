//! Working with documents whose shape is not known in advance.
//!
//! Run with: cargo run --example dynamic_values

use std::error::Error;
use yocton::{dumps, loads, yocton, Value};

fn main() -> Result<(), Box<dyn Error>> {
    let doc = loads("host: alpha\nhost: beta\nlimits { cpu: 2 mem: 512M }\nhost: gamma\n")?;

    // Repeated names are kept in document order.
    let hosts: Vec<&str> = doc.get_all("host").filter_map(Value::as_str).collect();
    println!("hosts: {hosts:?}");

    if let Some(limits) = doc.get("limits").and_then(Value::as_object) {
        let cpu: Option<u32> = limits.get("cpu").and_then(Value::parse);
        println!("cpu limit: {cpu:?}");
    }

    for (name, values) in doc.grouped() {
        println!("{name}: {} occurrence(s)", values.len());
    }

    let mut built = yocton!({
        "service": "api",
        "replica": 1,
        "replica": 2,
        "health": { "path": "/healthz", "interval": "10s" },
    });
    built.push("owner", "platform team");
    println!("\n{}", dumps(&built));

    // The tree converts to other serde formats too.
    println!("{}", serde_json::to_string_pretty(&built)?);

    Ok(())
}
