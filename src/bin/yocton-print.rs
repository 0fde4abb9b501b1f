//! Prints the property tree of a Yocton file.
//!
//! ```text
//! yocton-print <file>
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use yocton::{ByteSource, Object, PropertyKind, Stream};

/// Print the property tree of a Yocton file
#[derive(Parser)]
#[command(name = "yocton-print")]
#[command(version)]
struct Args {
    /// File to read
    path: PathBuf,
}

fn print_object<S: ByteSource>(object: Object<'_, S>, indent: usize) {
    while let Some(prop) = object.next_property() {
        match prop.kind() {
            PropertyKind::String => {
                println!("{:indent$}{} = \"{}\"", "", prop.name(), prop.value());
            }
            PropertyKind::Object => {
                println!("{:indent$}{}:", "", prop.name());
                print_object(prop.inner(), indent + 4);
            }
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // --help and --version are not failures.
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let stream = match Stream::open(&args.path) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("Error opening {}: {e}", args.path.display());
            return ExitCode::FAILURE;
        }
    };

    print_object(stream.root(), 0);

    match stream.error() {
        Some(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
