//! Configuration loading from workspace files

use itemprop::cli::{Commands, RunContext};
use itemprop::config::{ConfigLoader, ItempropConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_explicit_config_file_round_trips() {
    let temp = TempDir::new().unwrap();
    let mut config = ItempropConfig::default();
    config.namespace.current_location = Some("HKCU:\\".to_string());
    config.namespace.state_file = "ns.json".into();
    config.completion.distinguished_provider = "OfflineHive".to_string();

    let path = temp.path().join("itemprop.toml");
    fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

    let loaded = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(loaded.namespace.current_location.as_deref(), Some("HKCU:\\"));
    assert_eq!(loaded.completion.distinguished_provider, "OfflineHive");
    assert!(loaded.ensure_valid().is_ok());
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    assert!(ConfigLoader::load_from_file(&temp.path().join("absent.toml")).is_err());
}

#[test]
fn test_workspace_config_drives_run_context() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("config")).unwrap();
    fs::write(
        temp.path().join("config").join("config.toml"),
        r#"
[namespace]
state_file = "state/custom.json"
current_location = "HKLM:\\"
"#,
    )
    .unwrap();

    let ctx = RunContext::new(temp.path().to_path_buf(), None, None).unwrap();
    let output = ctx
        .execute(&Commands::NewItem {
            path: "Software".to_string(),
            what_if: false,
        })
        .unwrap();
    assert_eq!(output.exit_code, 0);
    assert!(temp.path().join("state").join("custom.json").exists());

    let shown = ctx
        .execute(&Commands::Show {
            literal_path: "HKLM:\\Software".to_string(),
            format: "text".to_string(),
        })
        .unwrap();
    assert_eq!(shown.stdout, "No properties.");
}

#[test]
fn test_invalid_location_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "[namespace]\ncurrent_location = \"nodrive\"\n").unwrap();
    assert!(RunContext::new(temp.path().to_path_buf(), Some(path), None).is_err());
}
