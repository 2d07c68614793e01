use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("argline-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn argline() -> Command {
    Command::new(env!("CARGO_BIN_EXE_argline"))
}

const DEFINITION: &str = r#"{
    "flags": [
        {"long": "verbose", "short": "v", "description": "Chatty output"},
        {"long": "output", "short": "o", "description": "Output file",
         "value": {"name": "FILE", "required": true}},
        {"long": "level", "value": {"default": "1"}}
    ],
    "args": [
        {"name": "input", "description": "Input file", "required": true}
    ]
}"#;

fn write_definition(dir: &Path) -> PathBuf {
    let path = dir.join("definition.json");
    fs::write(&path, DEFINITION).expect("failed to write definition");
    path
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn help_works() {
    let out = argline()
        .arg("--help")
        .output()
        .expect("failed to run argline --help");
    assert!(
        out.status.success(),
        "argline --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        stderr(&out),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("argline") && stdout.contains("--definition"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn json_report_has_bound_values() {
    let dir = make_temp_dir("json-report");
    let definition = write_definition(&dir);

    let out = argline()
        .arg("--definition")
        .arg(&definition)
        .arg("--json")
        .args(["--", "tool", "-v", "--output", "out.txt", "in.txt", "extra"])
        .output()
        .expect("failed to run argline");
    assert!(
        out.status.success(),
        "argline failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        stderr(&out),
    );

    let report: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("report is not valid JSON");
    assert_eq!(report["program"], "tool");
    assert_eq!(report["success"], true);
    assert_eq!(report["errors"].as_array().map(Vec::len), Some(0));

    let flags = report["flags"].as_array().expect("flags is not an array");
    let output = flags
        .iter()
        .find(|f| f["long-name"] == "--output")
        .expect("--output missing from report");
    assert_eq!(output["value"]["text"], "out.txt");
    assert!(flags.iter().any(|f| f["short-name"] == "-v"));

    assert_eq!(report["args"][0]["text"], "in.txt");
    assert_eq!(report["args"][1]["text"], "extra");
    assert_eq!(report["args"][1]["user-defined"], false);
    assert_eq!(report["counts"]["args"]["undefined"], 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_required_argument_exits_with_two() {
    let dir = make_temp_dir("missing-arg");
    let definition = write_definition(&dir);

    let out = argline()
        .arg("--definition")
        .arg(&definition)
        .args(["--", "tool", "-v"])
        .output()
        .expect("failed to run argline");
    assert_eq!(out.status.code(), Some(2), "stderr:\n{}", stderr(&out));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("RequiredArgumentMissing"),
        "unexpected report:\n{stdout}"
    );
    assert!(
        stderr(&out).contains("error: Required argument missing: <input>"),
        "unexpected stderr:\n{}",
        stderr(&out)
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn help_text_renders_definition() {
    let dir = make_temp_dir("help-text");
    let definition = write_definition(&dir);

    let out = argline()
        .arg("--definition")
        .arg(&definition)
        .arg("--help-text")
        .args(["--", "tool"])
        .output()
        .expect("failed to run argline");
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with("usage: tool [options] <input>\n"),
        "unexpected help:\n{stdout}"
    );
    assert!(stdout.contains("-o, --output <FILE>"));
    assert!(stdout.contains("--level [<VALUE>]"));
    assert!(stdout.contains("[default: 1]"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_definition_file_is_a_harness_error() {
    let dir = make_temp_dir("no-definition");

    let out = argline()
        .arg("--definition")
        .arg(dir.join("absent.json"))
        .args(["--", "tool"])
        .output()
        .expect("failed to run argline");
    assert_eq!(out.status.code(), Some(1));
    assert!(
        stderr(&out).contains("failed to read definition"),
        "unexpected stderr:\n{}",
        stderr(&out)
    );

    let _ = fs::remove_dir_all(&dir);
}
