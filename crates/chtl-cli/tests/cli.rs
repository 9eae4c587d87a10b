use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn compiles_a_minimal_source_to_stdout() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("demo.chtl");
    fs::write(&input, "div { text { Hello } }").unwrap();

    Command::cargo_bin("chtl-simple")
        .unwrap()
        .arg(&input)
        .arg("-")
        .assert()
        .success()
        .stdout(predicate::str::contains("<div>Hello</div>"));
}

#[test]
fn writes_to_default_output_html_when_no_output_given() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("demo.chtl");
    fs::write(&input, "div { text { Hi } }").unwrap();

    Command::cargo_bin("chtl-simple").unwrap().current_dir(&tmp).arg("demo.chtl").assert().success();

    let generated = fs::read_to_string(tmp.path().join("output.html")).unwrap();
    assert!(generated.contains("<div>Hi</div>"));
}

#[test]
fn missing_input_file_exits_with_failure() {
    Command::cargo_bin("chtl-simple").unwrap().arg("does-not-exist.chtl").assert().failure().code(1);
}
