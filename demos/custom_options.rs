//! Reader and writer options.
//!
//! Run with: cargo run --example custom_options

use serde::Serialize;
use std::error::Error;
use yocton::{to_string_with_options, Indent, ReaderOptions, Stream, Writer, WriterOptions};

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct Window {
    title: String,
    size: Size,
}

fn main() -> Result<(), Box<dyn Error>> {
    let window = Window {
        title: "Hello, world".to_string(),
        size: Size { w: 640, h: 480 },
    };

    println!("Tab indent (default):");
    println!("{}", yocton::to_string(&window)?);

    println!("Two-space indent:");
    let options = WriterOptions::new().with_indent(Indent::Spaces(2));
    println!("{}", to_string_with_options(&window, options)?);

    // The low-level writer escapes control characters as needed.
    let mut writer = Writer::new(Vec::new());
    writer.field("bell", "ring\x07");
    writer.begin_subobject("empty");
    writer.end_subobject();
    println!("{}", String::from_utf8(writer.into_inner()?)?);

    // Comments are only accepted when enabled.
    let input = b"// window settings\nwidth: 640\n";
    let options = ReaderOptions::new().with_comments(true);
    let stream = Stream::from_slice_with_options(input, options);
    let root = stream.root();
    while let Some(prop) = root.next_property() {
        println!("{} = {}", prop.name(), prop.value());
    }
    if let Some(err) = stream.error() {
        return Err(err.into());
    }

    Ok(())
}
