use std::fs;
use std::path::Path;

use assert_cmd::Command;

const GEO: &str = r#"{
  "name": "Geo",
  "types": [
    { "namespace": "Geo", "name": "Point", "constructible": true,
      "fields": [ { "name": "x", "default": 0 }, { "name": "y", "default": 0 } ] },
    { "namespace": "Geo", "name": "Bag`1" },
    { "namespace": "Geo", "name": "Internal", "public": false },
    { "namespace": "Geo.Shapes", "name": "Circle" },
    { "namespace": "Geo.Shapes", "name": "Circle" }
  ]
}"#;

fn pyhost() -> Command {
    let mut cmd = Command::cargo_bin("pyhost").unwrap();
    cmd.env_remove("PYHOST_HOME")
        .env_remove("PYHOST_BASE_LIB")
        .env_remove("PYHOST_TRACE_IMPORT");
    cmd
}

fn write(dir: &Path, rel: &str, text: &str) -> String {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout_of(out: &std::process::Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr_of(out: &std::process::Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn usage_without_args() {
    let out = pyhost().output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr_of(&out).contains("Usage: pyhost"));
}

#[test]
fn unknown_command_is_a_usage_error() {
    let out = pyhost().arg("explode").output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr_of(&out).contains("Unknown command: explode"));
}

#[test]
fn resolve_requires_a_name() {
    let out = pyhost().arg("resolve").output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr_of(&out).contains("Missing <name>"));
}

#[test]
fn resolve_prefers_current_directory_source() {
    let dir = tempfile::tempdir().unwrap();
    let cwd = dir.path().join("cwd");
    let home = dir.path().join("home");
    write(&cwd, "util.py", "");
    write(&home, "lib/util.py", "");
    write(&home, "lib/extra.py", "");

    let out = pyhost()
        .arg("resolve")
        .arg(format!("cwd={}", cwd.display()))
        .arg(format!("home={}", home.display()))
        .arg("util")
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    let stdout = stdout_of(&out);
    assert!(stdout.starts_with("tier 2 (cwd-source): "), "stdout: {stdout}");
    assert!(stdout.trim_end().ends_with("util.py"));

    let out = pyhost()
        .arg("resolve")
        .arg(format!("cwd={}", cwd.display()))
        .arg(format!("home={}", home.display()))
        .arg("extra")
        .output()
        .unwrap();
    assert!(stdout_of(&out).starts_with("tier 4 (install-lib): "));
}

#[test]
fn resolve_reports_missing_modules() {
    let dir = tempfile::tempdir().unwrap();
    let out = pyhost()
        .arg("resolve")
        .arg(format!("cwd={}", dir.path().display()))
        .arg(format!("home={}", dir.path().display()))
        .arg("nowhere")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(
        stderr_of(&out).contains("ModuleNotFoundError: No module named 'nowhere'"),
        "stderr: {}",
        stderr_of(&out)
    );
}

#[test]
fn verbose_resolve_is_quiet_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "geo.nlib", GEO);
    let out = pyhost()
        .arg("resolve")
        .arg("verbose")
        .arg(format!("cwd={}", dir.path().display()))
        .arg("geo")
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(stdout_of(&out).lines().count(), 1);
    assert!(stdout_of(&out).starts_with("tier 3 (cwd-native): "));
}

#[test]
fn tree_renders_public_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "geo.nlib", GEO);
    let out = pyhost().arg("tree").arg(&path).output().unwrap();
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    assert_eq!(
        stdout_of(&out),
        "Geo/\n  Bag [1]\n  Point\n  Shapes/\n    Circle\n"
    );
    let stderr = stderr_of(&out);
    assert!(stderr.contains("Geo.Shapes.Circle"), "stderr: {stderr}");
}

#[test]
fn types_lists_visibility_and_arity() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "geo.nlib", GEO);
    let out = pyhost().arg("types").arg(&path).output().unwrap();
    assert!(out.status.success());
    let stdout = stdout_of(&out);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "public\tGeo.Point\tarity=0",
            "public\tGeo.Bag`1\tarity=1",
            "private\tGeo.Internal\tarity=0",
            "public\tGeo.Shapes.Circle\tarity=0",
        ]
    );

    let out = pyhost().arg("types").arg("verbose").arg(&path).output().unwrap();
    assert!(stdout_of(&out).contains("public\tGeo.Point\tarity=0\tfields=x,y\n"));
}

#[test]
fn malformed_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.nlib", "{ not json");
    let out = pyhost().arg("tree").arg(&path).output().unwrap();
    assert_eq!(out.status.code(), Some(1));

    let out = pyhost()
        .arg("types")
        .arg(dir.path().join("absent.nlib").to_string_lossy().as_ref())
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_of(&out).contains("Read failed"));
}
