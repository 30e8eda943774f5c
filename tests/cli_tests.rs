// Integration tests for the cmini binary

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

const FIXTURE: &str = include_str!("fixtures/program.txt");

fn cmini() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cmini"));
    command.env_remove("RUST_LOG");
    command
}

/// Run with `args`, feeding `stdin` to the process.
fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = cmini()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start cmini");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_trace_to_output_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("testfile.txt");
    let output = dir.path().join("output.txt");
    fs::write(&input, "void main() { }").unwrap();

    let status = cmini()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();

    assert!(status.success());
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("VOIDTK void\nMAINTK main\n"));
    assert!(text.ends_with("<主函数>\n<程序>\n"));
}

#[test]
fn test_default_file_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("testfile.txt"), FIXTURE).unwrap();

    let status = cmini().current_dir(dir.path()).status().unwrap();

    assert!(status.success());
    let text = fs::read_to_string(dir.path().join("output.txt")).unwrap();
    assert_eq!(text.lines().last(), Some("<程序>"));
}

#[test]
fn test_stdin_to_stdout() {
    let out = run_with_stdin(&["-", "-o", "-"], "void main() { ; }");

    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("SEMICN ;\n<语句>\n<语句列>\n"));
}

#[test]
fn test_tokens_mode() {
    let out = run_with_stdin(&["-", "-o", "-", "--tokens"], "int a; a<=b");

    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "INTTK int\nIDENFR a\nSEMICN ;\nIDENFR a\nLEQ <=\nIDENFR b\n"
    );
}

#[test]
fn test_tree_mode() {
    let out = run_with_stdin(&["-", "-o", "-", "--tree"], "void main() { }");

    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("<程序>\n  <主函数>\n    VOIDTK void\n"));
}

#[test]
fn test_parse_error_exits_with_status_1() {
    let out = run_with_stdin(&["-", "-o", "-"], "void main( { }");

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.starts_with("error: parse error at line 1, column 12"), "{stderr}");
}

#[test]
fn test_missing_input_exits_with_status_1() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.txt");

    let out = cmini()
        .arg(&missing)
        .arg("-o")
        .arg(dir.path().join("out.txt"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8(out.stderr).unwrap().contains("cannot read"));
}
