//! End-to-end runs of the itemprop binary

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn itemprop(workspace: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_itemprop"))
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .env("HOME", workspace)
        .env("XDG_CONFIG_HOME", workspace.join("xdg"))
        .env_remove("ITEMPROP_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_binary_batch_exit_code_and_stderr() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path();

    for item in ["HKCU:\\A", "HKCU:\\B"] {
        let out = itemprop(ws, &["new-item", "--path", item]);
        assert!(out.status.success());
    }

    let out = itemprop(
        ws,
        &[
            "new", "--path", "HKCU:\\A", "HKCU:\\Missing", "HKCU:\\B", "--name", "Ver",
            "--type", "DWord", "--value", "1", "--format", "json",
        ],
    );
    assert_eq!(out.status.code(), Some(1));

    let stdout: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(stdout["succeeded"], 2);
    assert_eq!(stdout["failed"], 1);

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.lines().count(), 1);
    assert!(stderr.contains("HKCU:\\Missing"));

    assert!(ws.join(".itemprop").join("namespace.json").exists());
}

#[test]
fn test_binary_completion_output() {
    let temp = TempDir::new().unwrap();
    let out = itemprop(temp.path(), &["complete", "--lp", "HKLM:\\", "--word", "q"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("QWord\t"));

    let out = itemprop(temp.path(), &["complete"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).trim().is_empty());
}

#[test]
fn test_binary_prints_properties_created_before_abort() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path();
    for item in ["HKCU:\\A", "HKCU:\\B"] {
        assert!(itemprop(ws, &["new-item", "--path", item]).status.success());
    }
    let out = itemprop(ws, &["new", "--path", "HKCU:\\B", "--name", "Ver", "--value", "1"]);
    assert!(out.status.success());

    let out = itemprop(
        ws,
        &["new", "--path", "HKCU:\\A", "HKCU:\\B", "--name", "Ver", "--value", "2"],
    );
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("HKCU:\\A"));
    assert!(!stdout.contains("HKCU:\\B"));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("already exists"));
}
