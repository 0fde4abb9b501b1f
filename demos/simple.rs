//! Loading a configuration struct from Yocton and writing it back.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use std::error::Error;
use yocton::{from_str, to_string};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Listener {
    address: String,
    port: u16,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Config {
    name: String,
    workers: u32,
    verbose: bool,
    listener: Vec<Listener>,
    motd: Option<String>,
}

const INPUT: &str = r#"
name: "edge proxy"
workers: 8
verbose: false
listener {
    address: 0.0.0.0
    port: 80
}
listener {
    address: 0.0.0.0
    port: 443
}
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let config: Config = from_str(INPUT)?;
    println!("Parsed: {:#?}\n", config);

    let text = to_string(&config)?;
    println!("Yocton output:\n{}", text);

    let config_back: Config = from_str(&text)?;
    assert_eq!(config, config_back);
    println!("✓ Round-trip successful");

    Ok(())
}
