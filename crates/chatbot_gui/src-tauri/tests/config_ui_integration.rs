//! Integration tests for the config form backend: real files in temp dirs.

use chatbot_gui_lib::commands::{do_load_config, do_save_config, resolve_config_path, ConfigForm};
use predicates::prelude::*;
use std::io::Write as _;

/// Load config from a real YAML file in a temp dir; verify all form fields
/// populated.
#[test]
fn load_config_from_real_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(
        f,
        r#"server:
  port: 9000
upstream:
  base_url: "http://127.0.0.1:4000"
  model: "gemini-2.0-flash""#
    )
    .unwrap();

    let form = do_load_config(path.to_str().unwrap()).expect("load should succeed");

    assert_eq!(form.relay_port, 9000);
    assert_eq!(form.upstream_base_url, "http://127.0.0.1:4000");
    assert_eq!(form.model, "gemini-2.0-flash");
}

/// Fields absent from the file come back as form defaults.
#[test]
fn load_config_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "server: {}\n").unwrap();

    let form = do_load_config(path.to_str().unwrap()).expect("load should succeed");
    assert_eq!(form, ConfigForm::default());
}

/// Save config creates directory and file when both are missing.
#[test]
fn save_creates_directory_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("new-dir").join("config.yaml");

    // Directory doesn't exist yet.
    let parent_exists = predicate::path::exists();
    assert!(!parent_exists.eval(nested.parent().unwrap()));

    let form = ConfigForm {
        relay_port: 7777,
        upstream_base_url: "http://127.0.0.1:4000".into(),
        model: "gemini-2.0-flash".into(),
    };

    do_save_config(nested.to_str().unwrap(), &form).expect("save should succeed");

    // File should now exist.
    assert!(parent_exists.eval(nested.as_path()));
    let contents = std::fs::read_to_string(&nested).unwrap();
    assert!(predicate::str::contains("7777").eval(&contents));
}

/// Round-trip: save then load preserves all form field values.
#[test]
fn round_trip_preserves_form_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let original = ConfigForm {
        relay_port: 8123,
        upstream_base_url: "http://localhost:9001".into(),
        model: "gemini-2.0-flash".into(),
    };

    do_save_config(path.to_str().unwrap(), &original).expect("save should succeed");
    let reloaded = do_load_config(path.to_str().unwrap()).expect("load should succeed");

    assert_eq!(reloaded, original);
}

/// Explicit override takes precedence over env and default resolution.
#[test]
fn resolve_config_path_prefers_explicit_override() {
    let path = resolve_config_path(Some("/tmp/explicit.yaml")).unwrap();
    assert_eq!(path, std::path::PathBuf::from("/tmp/explicit.yaml"));
}
