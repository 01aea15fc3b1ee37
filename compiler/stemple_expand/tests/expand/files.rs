//! File and stream entry points, and `include`.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use pretty_assertions::assert_eq;
use stemple_expand::{ExpandError, Expander};

fn write(dir: &Path, name: &str, text: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn expand_file(expander: &mut Expander, path: &Path) -> String {
    let mut out = Vec::new();
    expander.expand_file(path, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn expand_file_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "in.txt", "$(A)\n");

    let mut expander = Expander::new();
    expander.set_macro("A", "aaa", false).unwrap();
    assert_eq!(expand_file(&mut expander, &dir.path().join("in.txt")), "aaa\n");
}

#[test]
fn missing_input_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut expander = Expander::new();
    let mut out = Vec::new();
    let err = expander
        .expand_file(dir.path().join("absent.txt"), &mut out)
        .unwrap_err();
    assert!(matches!(err, ExpandError::Open { .. }));
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn expand_stream_matches_expand() {
    let input = "$(A=aaa)\n\t$(A) and $$(A)\n";
    let mut expander = Expander::new();
    let mut out = Vec::new();
    expander
        .expand_stream(Cursor::new(input.as_bytes().to_vec()), "stdin", &mut out)
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "\taaa and $(A)\n");
    assert_eq!(Expander::new().expand(input).unwrap(), "\taaa and $(A)\n");
}

#[test]
fn include_resolves_relative_to_including_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.txt", "$(include part.txt,x)\n");
    write(dir.path(), "part.txt", "part $(1)");

    let mut expander = Expander::new();
    assert_eq!(expand_file(&mut expander, &dir.path().join("main.txt")), "part x\n");
}

#[test]
fn included_text_passes_arguments_to_its_calls() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.txt", "$(include part.txt,x)|$(include part.txt)\n");
    write(dir.path(), "part.txt", "$(show)");

    let mut expander = Expander::new();
    expander.set_macro("show", "[$(1)]", false).unwrap();
    assert_eq!(expand_file(&mut expander, &dir.path().join("main.txt")), "[x]|[]\n");
}

#[test]
fn nested_includes_resolve_against_their_own_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.txt", "$(include sub/inner.txt)\n");
    write(dir.path(), "sub/inner.txt", "[$(include leaf.txt)]");
    write(dir.path(), "sub/leaf.txt", "leaf");

    let mut expander = Expander::new();
    assert_eq!(expand_file(&mut expander, &dir.path().join("main.txt")), "[leaf]\n");
}

#[test]
fn included_definitions_are_visible_afterwards() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.txt", "$(include defs.txt)name=$(NAME)\n");
    write(dir.path(), "defs.txt", "$(NAME=stemple)\n");

    let mut expander = Expander::new();
    assert_eq!(expand_file(&mut expander, &dir.path().join("main.txt")), "name=stemple\n");
}

#[test]
fn absolute_include_path() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "abs.txt", "absolute");
    let path = dir.path().join("abs.txt");

    let mut expander = Expander::new();
    expander
        .set_macro("P", &path.display().to_string(), false)
        .unwrap();
    assert_eq!(expander.expand("<$(include $(P))>").unwrap(), "<absolute>");
}

#[test]
fn missing_include_expands_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.txt", "a$(include nope.txt)b\n$(include nope.txt)\nc\n");

    let mut expander = Expander::new();
    assert_eq!(expand_file(&mut expander, &dir.path().join("main.txt")), "ab\nc\n");
}

#[test]
fn quoted_include_is_literal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.txt", "$(include:q raw.txt)");
    write(dir.path(), "raw.txt", "$(A)");

    let mut expander = Expander::new();
    expander.set_macro("A", "aaa", false).unwrap();
    assert_eq!(expand_file(&mut expander, &dir.path().join("main.txt")), "$(A)");
}
