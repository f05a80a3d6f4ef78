//! End-to-end tests for the `tree-sitter-lean` binary.
#![cfg(feature = "cli")]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn cli() -> Command {
    Command::cargo_bin("tree-sitter-lean").unwrap()
}

fn grammar_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn lean_grammar_loads() {
    cli()
        .assert()
        .success()
        .stdout(predicate::str::starts_with("lean:"))
        .stdout(predicate::str::contains("22 external tokens"))
        .stdout(predicate::str::contains("start rule 'module'"));
}

#[test]
fn strict_mode_accepts_lean() {
    cli().arg("--strict").assert().success();
}

#[test]
fn json_flag_prints_grammar() {
    cli()
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("raw_str_content"));
}

#[test]
fn json_output_loads_back() {
    let output = cli().arg("--json").output().unwrap();
    assert!(output.status.success());
    let json = String::from_utf8(output.stdout).unwrap();
    assert!(json.contains(r#""value":"theorem""#), "{json}");

    let file = grammar_file(&json);
    cli()
        .arg("--grammar")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("22 external tokens"))
        .stdout(predicate::str::contains("start rule 'module'"));
}

#[test]
fn external_grammar_loads() {
    let file = grammar_file(
        r#"{
            "name": "words",
            "rules": {
                "source_file": {
                    "type": "REPEAT",
                    "content": { "type": "SYMBOL", "name": "word" }
                },
                "word": { "type": "PATTERN", "value": "[a-z]+" }
            }
        }"#,
    );
    cli()
        .arg("--grammar")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("words:"))
        .stdout(predicate::str::contains("start rule 'source_file'"));
}

#[test]
fn malformed_grammar_fails() {
    let file = grammar_file("{ not json");
    cli()
        .arg("--grammar")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error loading"))
        .stderr(predicate::str::contains("caused by"))
        .stderr(predicate::str::contains("ERROR").not())
        .stderr(predicate::str::contains("grammar unavailable").not());
}

#[test]
fn undefined_symbol_fails() {
    let file = grammar_file(
        r#"{
            "name": "broken",
            "rules": {
                "source_file": { "type": "SYMBOL", "name": "missing" }
            }
        }"#,
    );
    cli()
        .arg("--grammar")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("undefined symbol 'missing'"));
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    cli()
        .arg("--grammar")
        .arg(dir.path().join("grammar.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error loading"));
}
