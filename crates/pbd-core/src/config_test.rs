use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("recursive: false").unwrap();
    assert!(!config.recursive);
    assert_eq!(config.table_confidence_threshold, 0.8);
    assert_eq!(config.element_confidence_threshold, 0.0);
    assert_eq!(config.output_suffix, "_updated");
    assert!(config.ignore_dirs.is_empty());
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
table_confidence_threshold: 0.6
element_confidence_threshold: 0.5
output_suffix: "_documented"
recursive: true
ignore_dirs:
  - .pbi
  - cultures
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.table_confidence_threshold, 0.6);
    assert_eq!(config.element_confidence_threshold, 0.5);
    assert_eq!(config.output_suffix, "_documented");
    assert_eq!(config.ignore_dirs, vec![".pbi", "cultures"]);
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("threshold: 0.5");
    assert!(result.is_err());
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let err = Config::load(&dir.path().join("pbidoc.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir_defaults_without_file() {
    let dir = tempdir().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("pbidoc.yml"), "output_suffix: _a").unwrap();
    fs::write(dir.path().join("pbidoc.yaml"), "output_suffix: _b").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.output_suffix, "_a");
}

#[test]
fn test_load_empty_file_is_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("pbidoc.yaml"), "\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_threshold_out_of_range_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pbidoc.yml");
    fs::write(&path, "table_confidence_threshold: 80").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    assert!(err.to_string().contains("table_confidence_threshold"));
}

#[test]
fn test_empty_suffix_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pbidoc.yml");
    fs::write(&path, "output_suffix: \"\"").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_output_dir_for() {
    let config = Config::default();
    let out = config.output_dir_for(Path::new("/models/Store Sales.SemanticModel"));
    assert_eq!(
        out,
        PathBuf::from("/models/Store Sales.SemanticModel_updated")
    );
}

// These tests modify environment variables and must run serially
use serial_test::serial;

fn with_threshold_env<F: FnOnce()>(value: Option<&str>, f: F) {
    let original = std::env::var(TABLE_THRESHOLD_ENV).ok();
    match value {
        Some(v) => std::env::set_var(TABLE_THRESHOLD_ENV, v),
        None => std::env::remove_var(TABLE_THRESHOLD_ENV),
    }
    f();
    match original {
        Some(v) => std::env::set_var(TABLE_THRESHOLD_ENV, v),
        None => std::env::remove_var(TABLE_THRESHOLD_ENV),
    }
}

#[test]
#[serial]
fn test_resolve_threshold_cli_takes_precedence() {
    with_threshold_env(Some("0.3"), || {
        assert_eq!(Config::default().resolve_table_threshold(Some(0.9)), 0.9);
    });
}

#[test]
#[serial]
fn test_resolve_threshold_uses_env_var() {
    with_threshold_env(Some("0.3"), || {
        assert_eq!(Config::default().resolve_table_threshold(None), 0.3);
    });
}

#[test]
#[serial]
fn test_resolve_threshold_falls_back_to_config() {
    with_threshold_env(None, || {
        assert_eq!(Config::default().resolve_table_threshold(None), 0.8);
    });
}

#[test]
#[serial]
fn test_resolve_threshold_ignores_garbage_env() {
    with_threshold_env(Some("high"), || {
        assert_eq!(Config::default().resolve_table_threshold(None), 0.8);
    });
}
