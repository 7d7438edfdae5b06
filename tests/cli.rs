use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn caretpad() -> Command {
    let mut cmd = Command::cargo_bin("caretpad").unwrap();
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn shows_help() {
    caretpad()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn shows_version() {
    caretpad()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn runs_script_from_stdin() {
    caretpad()
        .write_stdin("@0 insert 0 draft\n@5000 insert 5 \\sone\n@5200 insert 9 \\stwo\nundo\n")
        .assert()
        .success()
        .stdout("draft one\n");
}

#[test]
fn prints_json_frame() {
    let mut doc = NamedTempFile::new().unwrap();
    write!(doc, "to be or not to be").unwrap();
    caretpad()
        .args(["--json", "--text"])
        .arg(doc.path())
        .write_stdin("find be\nnext\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"matches\": 2"))
        .stdout(predicate::str::contains("\"caret\": 5"));
}

#[test]
fn print_command_echoes_text() {
    caretpad()
        .write_stdin("@0 insert 0 abc\nprint\n@0 delete 0 1\n")
        .assert()
        .success()
        .stdout("abc\nbc\n");
}

#[test]
fn malformed_script_exits_with_error() {
    caretpad()
        .write_stdin("insert\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn zero_capacity_is_rejected() {
    caretpad()
        .args(["--capacity", "0"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--capacity"));
}

#[test]
fn empty_insert_keeps_redo_available() {
    Command::cargo_bin("caretpad")
        .unwrap()
        .env("RUST_LOG", "warn")
        .write_stdin("@0 insert 0 a\n@5000 insert 1 b\nundo\n@10000 insert 0\nredo\n")
        .assert()
        .success()
        .stdout("ab\n")
        .stderr(predicate::str::contains("nothing to redo").not());
}
