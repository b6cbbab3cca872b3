use std::{fs, path::PathBuf};

use assert_cmd::Command;

fn sexpi() -> Command {
    Command::cargo_bin("sexpi").unwrap()
}

#[test]
fn eval_flag() {
    sexpi()
        .args(&["-e", "(+ 1 2 3)", "-e", "(setq y 10) y"])
        .assert()
        .success()
        .stdout("6\n10\n10\n");
}

#[test]
fn eval_errors_are_values() {
    sexpi()
        .args(&["-e", "(+ 1 'a)"])
        .assert()
        .success()
        .stdout("<error: wrong type>\n");
}

#[test]
fn max_depth_flag() {
    sexpi()
        .args(&["--max-depth", "50", "-e", "(defun f (n) (f n)) (f 1)"])
        .assert()
        .success()
        .stdout("f\n<error: recursion depth exceeded (50)>\n");
}

#[test]
fn run_file() {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("double.lisp");
    fs::write(&path, "(defun double (x) (+ x x))\n(double 21)\n(1 2\n").unwrap();
    sexpi()
        .arg(&path)
        .assert()
        .success()
        .stdout("double\n42\n<error: unfinished parenthesis>\n");
}

#[test]
fn missing_file() {
    sexpi().arg("no/such/file.lisp").assert().failure();
}
