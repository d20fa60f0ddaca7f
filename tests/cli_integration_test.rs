//! End-to-end checks of the `groundwork` binary.

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn groundwork() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_groundwork"));
    for var in [
        "GROUNDWORK_CONFIG",
        "GROUNDWORK_LOG_LEVEL",
        "GROUNDWORK_LOG_MODULE_LEVELS",
        "GROUNDWORK_RATE_LIMITS",
        "GROUNDWORK_HEADERS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_levels_numeric_with_fallback() {
    let out = stdout_of(groundwork().args(["levels", "numeric", "invalid", "--fallback", "999"]));
    assert_eq!(out.trim(), "999");

    let out = stdout_of(groundwork().args(["levels", "numeric", "debug"]));
    assert_eq!(out.trim(), "10");
}

#[test]
fn test_levels_check_rejects_unknown() {
    groundwork()
        .args(["levels", "check", "shouting"])
        .assert()
        .failure();
    let out = stdout_of(groundwork().args(["levels", "check", "  warning "]));
    assert_eq!(out.trim(), "WARNING");
}

#[test]
fn test_config_parse_commands_are_lenient() {
    let out = stdout_of(groundwork().args([
        "config",
        "parse-modules",
        "api:INFO,bad:INVALID,db:ERROR",
    ]));
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, serde_json::json!({"api": "INFO", "db": "ERROR"}));

    let out = stdout_of(groundwork().args(["config", "parse-headers", "valid=ok,broken"]));
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, serde_json::json!({"valid": "ok"}));
}

#[test]
fn test_config_show_reads_file_and_env() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("groundwork.toml");
    fs::write(
        &config,
        "log_level = \"error\"\nheaders = \"x-team=core\"\n",
    )
    .unwrap();

    let out = stdout_of(
        groundwork()
            .env("GROUNDWORK_RATE_LIMITS", "api:10:100,junk")
            .args(["config", "show", "--config"])
            .arg(&config),
    );
    let shown: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(shown["log_level"], "ERROR");
    assert_eq!(shown["headers"]["x-team"], "core");
    assert_eq!(shown["rate_limits"]["api"]["capacity"], 100.0);
}

#[test]
fn test_files_touch_size_and_backup() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("new/file.txt");

    groundwork().args(["files", "touch"]).arg(&file).assert().success();
    assert!(file.is_file());

    groundwork()
        .args(["files", "touch", "--no-clobber"])
        .arg(&file)
        .assert()
        .failure();

    fs::write(&file, "abc").unwrap();
    let out = stdout_of(groundwork().args(["files", "size"]).arg(&file));
    assert_eq!(out.trim(), "3");

    let out = stdout_of(groundwork().args(["files", "backup"]).arg(&file));
    assert!(out.trim().ends_with("file.txt.bak"));
}

#[test]
fn test_files_find_alias() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("a")).unwrap();
    fs::write(temp.path().join("a/one.rs"), "").unwrap();

    let out = stdout_of(
        groundwork()
            .args(["files", "glob", "*.rs", "--recursive", "--root"])
            .arg(temp.path()),
    );
    assert!(out.trim().ends_with("one.rs"));
}

#[test]
fn test_util_commands() {
    let out = stdout_of(groundwork().args(["util", "duration", "3661"]));
    assert_eq!(out.trim(), "1h 1m 1s");

    let out = stdout_of(groundwork().args(["util", "duration", "45"]));
    assert_eq!(out.trim(), "45.0s");
}

#[test]
fn test_attrs_merges_json_and_pairs() {
    let out = stdout_of(groundwork().args([
        "attrs",
        "--json",
        r#"{"env":"dev","n":1}"#,
        "env=prod",
        "offset=-5",
    ]));
    let attrs: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        attrs,
        serde_json::json!({"env": "prod", "n": 1, "offset": "-5"})
    );
}

#[test]
fn test_attrs_invalid_pair_exits_with_one() {
    groundwork()
        .args(["attrs", "novalue"])
        .assert()
        .code(1)
        .stderr("Error: Invalid attribute format 'novalue'. Use key=value.\n");
}

#[test]
fn test_attrs_from_stdin() {
    let out = stdout_of(
        groundwork()
            .args(["attrs", "--stdin", "ready=yes"])
            .write_stdin("  {\"service\": \"api\"}\n"),
    );
    let attrs: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(attrs, serde_json::json!({"service": "api", "ready": true}));
}

#[test]
fn test_attrs_empty_stdin_fails() {
    groundwork()
        .args(["attrs", "--stdin"])
        .write_stdin("   \n")
        .assert()
        .code(1)
        .stderr("Error: Message is empty.\n");
}
