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
    let dir = std::env::temp_dir().join(format!("argroute-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn argroute() -> Command {
    Command::new(env!("CARGO_BIN_EXE_argroute"))
}

fn run_ok(cmd: &mut Command, what: &str) -> Output {
    let out = cmd
        .output()
        .unwrap_or_else(|e| panic!("failed to run {what}: {e}"));
    assert!(
        out.status.success(),
        "{what} failed:\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
    out
}

fn init_project(prefix: &str) -> PathBuf {
    let dir = make_temp_dir(prefix);
    run_ok(argroute().arg("init").arg(&dir), "argroute init");
    dir
}

fn write_manifest(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("tree.json");
    fs::write(&path, json).expect("failed to write manifest");
    path
}

#[test]
fn help_works() {
    let out = run_ok(argroute().arg("--help"), "argroute --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("argroute") && stdout.contains("init") && stdout.contains("route"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn init_creates_manifest_and_refuses_to_overwrite() {
    let dir = init_project("init");
    assert!(
        dir.join("argroute.json").is_file(),
        "argroute.json (manifest) not created"
    );

    let out = argroute()
        .arg("init")
        .arg(&dir)
        .output()
        .expect("failed to run argroute init");
    assert!(!out.status.success(), "second init should fail");
    assert!(String::from_utf8_lossy(&out.stderr).contains("--force"));

    run_ok(argroute().arg("init").arg(&dir).arg("--force"), "argroute init --force");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn route_reports_json() {
    let dir = init_project("route-json");

    let out = run_ok(
        argroute()
            .current_dir(&dir)
            .args(["route", "--json", "--"])
            .args(["--v", "remote", "add", "--tag", "a", "--TAG=b", "origin"]),
        "argroute route",
    );
    let json: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("route output is not JSON");
    let name = dir.file_name().unwrap().to_string_lossy().to_string();
    assert_eq!(json["ok"], true);
    assert_eq!(json["command"], serde_json::json!([name, "remote", "add"]));
    assert_eq!(json["flags"]["tag"]["raw"], "a, b");
    assert_eq!(json["flags"]["tag"]["value"], serde_json::json!(["a", "b"]));
    assert_eq!(json["args"], serde_json::json!(["origin"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn route_prints_text_with_restricted_flag() {
    let dir = init_project("route-text");

    let out = run_ok(
        argroute()
            .current_dir(&dir)
            .args(["route", "--", "r", "add", "--timeout", "90s", "origin"]),
        "argroute route",
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("remote add"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("<duration> \"1m 30s\""), "unexpected output:\n{stdout}");
    assert!(stdout.contains("args:\n  origin\n"), "unexpected output:\n{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn route_rejects_unknown_flag() {
    let dir = init_project("route-unknown");

    let out = argroute()
        .current_dir(&dir)
        .args(["route", "--", "remote", "--nope"])
        .output()
        .expect("failed to run argroute route");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unexpected flag \"nope\""), "stderr:\n{stderr}");

    let out = argroute()
        .current_dir(&dir)
        .args(["route", "--json", "--", "help", "surplus"])
        .output()
        .expect("failed to run argroute route");
    assert!(!out.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("error output is not JSON");
    assert_eq!(json["ok"], false);
    assert_eq!(json["kind"], "input");
    assert_eq!(json["extra-input"], serde_json::json!(["surplus"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_detects_duplicate_flags() {
    let dir = make_temp_dir("check");
    let clean = init_project("check-clean");
    run_ok(argroute().current_dir(&clean).arg("check"), "argroute check");

    let manifest = write_manifest(
        &dir,
        r#"{
  "root": {
    "name": "app",
    "flags": [{ "name": "verbose", "type": "bool" }],
    "subcommands": [
      { "name": "a", "flags": [{ "name": "Verbose", "type": "bool" }] }
    ]
  }
}"#,
    );
    let out = argroute()
        .arg("check")
        .arg("--json")
        .arg("--manifest")
        .arg(&manifest)
        .output()
        .expect("failed to run argroute check");
    assert!(!out.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("check output is not JSON");
    assert_eq!(json["conflicts"][0]["command"], serde_json::json!(["app"]));
    assert_eq!(json["conflicts"][0]["duplicates"], serde_json::json!(["verbose"]));

    let _ = fs::remove_dir_all(&dir);
    let _ = fs::remove_dir_all(&clean);
}

#[test]
fn help_lists_commands_and_flags() {
    let dir = init_project("help");

    let out = run_ok(argroute().current_dir(&dir).arg("help"), "argroute help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Commands:"), "unexpected help:\n{stdout}");
    assert!(stdout.contains("remote  Manage remotes"), "unexpected help:\n{stdout}");
    assert!(stdout.contains("--verbose  <bool>"), "unexpected help:\n{stdout}");

    let out = run_ok(
        argroute().current_dir(&dir).args(["help", "r", "add"]),
        "argroute help r add",
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("--tag      <[]string>"), "unexpected help:\n{stdout}");
    assert!(stdout.contains("--timeout  <duration>"), "unexpected help:\n{stdout}");

    let _ = fs::remove_dir_all(&dir);
}
