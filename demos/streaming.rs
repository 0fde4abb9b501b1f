//! Walking a document with the pull parser, skipping what is not needed.
//!
//! Run with: cargo run --example streaming

use std::process::ExitCode;
use yocton::{PropertyKind, Stream};

const INPUT: &[u8] = br#"
window {
    title: "Main window"
    width: 640
    height: 480
    theme {
        colors { fg: white bg: black }
    }
}
log_level: warn
plugins {
    a { path: "/usr/lib/a.so" }
    b { path: "/usr/lib/b.so" }
}
"#;

fn main() -> ExitCode {
    let stream = Stream::from_slice(INPUT);
    let root = stream.root();

    let mut title = String::new();
    let mut area = 0u64;
    let mut level = None;

    while let Some(prop) = root.next_property() {
        match (&*prop.name(), prop.kind()) {
            ("window", PropertyKind::Object) => {
                let window = prop.inner();
                let mut width = 0u64;
                let mut height = 0u64;
                while let Some(field) = window.next_property() {
                    match &*field.name() {
                        "title" => title = field.to_value_string(),
                        "width" => width = field.parse(),
                        "height" => height = field.parse(),
                        // "theme" is left unread.
                        _ => {}
                    }
                }
                area = width * height;
            }
            ("log_level", _) => level = prop.enum_index(&["debug", "info", "warn", "error"]),
            // "plugins" is skipped without being read.
            _ => {}
        }
    }

    if let Some(err) = stream.error() {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    println!("title: {title}");
    println!("area:  {area}");
    println!("level: {level:?}");
    ExitCode::SUCCESS
}
