//! CLI smoke tests for cbs.
//!
//! These tests run the binary against throwaway projects and verify exit codes,
//! terminal output, and the files it writes.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the cbs binary.
fn cbs_cmd() -> Command {
  cargo_bin_cmd!("cbs")
}

/// Create a temp project with the given manifest and source files.
fn temp_project(manifest: &str, files: &[&str]) -> TempDir {
  let temp = TempDir::new().unwrap();
  fs::write(temp.path().join("cbs.json"), manifest).unwrap();
  for file in files {
    let path = temp.path().join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "int x;\n").unwrap();
  }
  fs::create_dir_all(temp.path().join("build")).unwrap();
  temp
}

fn manifest_arg(temp: &TempDir) -> std::path::PathBuf {
  temp.path().join("cbs.json")
}

/// Two modules with two and three sources.
const TWO_MODULES: &str = r#"{
  "shared": { "compiler_flags": ["Wall"], "include_paths": ["include"] },
  "modules": [
    { "name": "util", "compiler": "cc", "source_directory": "util",
      "output_directory": "build", "output_file_name": "libutil.a",
      "compiler_flags": ["c"] },
    { "name": "app", "compiler": "cc", "source_directory": "app",
      "output_directory": "build", "output_file_name": "app",
      "linker_flags": ["m"] }
  ],
  "commands": [
    { "name": "tooling", "description": "Refresh editor tooling", "modules": [] }
  ]
}"#;

const TWO_MODULE_FILES: &[&str] = &["util/a.c", "util/b.c", "app/main.c", "app/model.c", "app/view/view.c"];

fn single_module(compiler: &str) -> String {
  format!(
    r#"{{
  "modules": [
    {{ "name": "app", "compiler": "{compiler}", "source_directory": "src",
      "output_directory": "build", "output_file_name": "app" }}
  ],
  "commands": [
    {{ "name": "release", "modules": ["app"], "compile_db": true }}
  ]
}}"#
  )
}

fn read_database(root: &Path) -> Vec<serde_json::Value> {
  let content = fs::read_to_string(root.join("compile_commands.json")).unwrap();
  serde_json::from_str(&content).unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  cbs_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  cbs_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("cbs"));
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn missing_manifest_fails() {
  let temp = TempDir::new().unwrap();

  cbs_cmd()
    .arg("--manifest")
    .arg(temp.path().join("nope.json"))
    .arg("list")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to read manifest"));
}

#[test]
fn invalid_manifest_fails() {
  let temp = temp_project(r#"{ "modules": [ { "nam": "x" } ] }"#, &[]);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("list")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid manifest"));
}

#[test]
fn no_command_lists_available_commands() {
  let temp = temp_project(TWO_MODULES, TWO_MODULE_FILES);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .assert()
    .failure()
    .stderr(predicate::str::contains("No command given"))
    .stderr(predicate::str::contains("compile-db"))
    .stderr(predicate::str::contains("Refresh editor tooling"));
}

#[test]
fn unknown_command_lists_available_commands() {
  let temp = temp_project(TWO_MODULES, TWO_MODULE_FILES);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("deploy")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Command [deploy] not found"))
    .stderr(predicate::str::contains("build"))
    .stderr(predicate::str::contains("tooling"));

  assert!(!temp.path().join("compile_commands.json").exists());
}

// =============================================================================
// list
// =============================================================================

#[test]
fn list_shows_synthesized_commands() {
  let temp = temp_project(TWO_MODULES, TWO_MODULE_FILES);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("cc -Wall -c -Iinclude"))
    .stdout(predicate::str::contains("cc -Wall -Iinclude -lm"));
}

// =============================================================================
// compile-db
// =============================================================================

#[test]
fn compile_db_writes_one_record_per_source() {
  let temp = temp_project(TWO_MODULES, TWO_MODULE_FILES);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("compile-db")
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote 5 record(s)"));

  let records = read_database(temp.path());
  assert_eq!(records.len(), 5);
  let files: Vec<&str> = records.iter().map(|r| r["file"].as_str().unwrap()).collect();
  assert_eq!(files, ["a.c", "b.c", "main.c", "model.c", "view.c"]);
  assert_eq!(records[0]["command"], "cc -Wall -c -Iinclude");
}

#[test]
#[serial]
fn compile_db_resolves_against_manifest_directory() {
  let temp = temp_project(TWO_MODULES, TWO_MODULE_FILES);
  let elsewhere = TempDir::new().unwrap();

  cbs_cmd()
    .current_dir(elsewhere.path())
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("compile-db")
    .assert()
    .success();

  assert!(temp.path().join("compile_commands.json").exists());
  assert!(!elsewhere.path().join("compile_commands.json").exists());
}

#[test]
fn compile_db_with_invalid_module_writes_nothing() {
  let temp = temp_project(&single_module(" "), &["src/main.c"]);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("compile-db")
    .assert()
    .failure()
    .stderr(predicate::str::contains("[compiler] in module [app]"));

  assert!(!temp.path().join("compile_commands.json").exists());
}

// =============================================================================
// build
// =============================================================================

#[test]
fn build_unknown_module_fails() {
  let temp = temp_project(TWO_MODULES, TWO_MODULE_FILES);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("build")
    .arg("ghost")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Unknown module [ghost]"));
}

#[test]
fn build_missing_output_directory_fails() {
  let temp = temp_project(&single_module("cc"), &["src/main.c"]);
  fs::remove_dir(temp.path().join("build")).unwrap();

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("output directory"));
}

#[cfg(unix)]
#[test]
fn build_with_succeeding_compiler() {
  let temp = temp_project(&single_module("true"), &["src/main.c"]);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Compiled 1 module(s)"));
}

#[cfg(unix)]
#[test]
fn build_with_failing_compiler_exits_non_zero() {
  let temp = temp_project(&single_module("false"), &["src/main.c"]);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("compiler exited with code 1"));
}

#[cfg(unix)]
#[test]
fn build_times_out_slow_compiler() {
  let temp = temp_project(&single_module("sleep 2;"), &["src/main.c"]);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("--timeout")
    .arg("200ms")
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("timed out"));
}

#[cfg(unix)]
#[test]
fn manifest_command_compiles_and_writes_database() {
  let temp = temp_project(&single_module("true"), &["src/main.c", "src/util.c"]);

  cbs_cmd()
    .arg("--manifest")
    .arg(manifest_arg(&temp))
    .arg("release")
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote 2 record(s)"));

  assert_eq!(read_database(temp.path()).len(), 2);
}
