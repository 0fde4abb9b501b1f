use std::path::Path;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yocton-print"))
        .args(args)
        .output()
        .unwrap()
}

fn data(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

#[test]
fn test_prints_tree() {
    let out = run(&[&data("sample.yocton")]);
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "title = \"Hello, world\"\n\
         window:\n    width = \"640\"\n    inner:\n        x = \"1\"\n\
         tag = \"a\"\n"
    );
    assert!(out.stderr.is_empty());
}

#[test]
fn test_reports_parse_error() {
    let out = run(&[&data("truncated.yocton")]);
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "a = \"1\"\nb:\n    c = \"2\"\n"
    );
    assert_eq!(String::from_utf8(out.stderr).unwrap(), "4: unexpected EOF\n");
}

#[test]
fn test_missing_file() {
    let out = run(&[&data("does-not-exist.yocton")]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.starts_with("Error opening "), "{stderr}");
}

#[test]
fn test_missing_argument_prints_usage() {
    let out = run(&[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("Usage: yocton-print <PATH>"), "{stderr}");
}

#[test]
fn test_help_succeeds() {
    let out = run(&["--help"]);
    assert!(out.status.success());
    assert!(String::from_utf8(out.stdout).unwrap().contains("Usage:"));
}
