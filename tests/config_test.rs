//! Integration tests for Settings layered loading.
//!
//! These tests run without a global config (temp directories only),
//! so they effectively test explicit config files merged over defaults.

use std::fs;

use tempfile::TempDir;

use treestr::application::services::TransformService;
use treestr::application::ApplicationError;
use treestr::config::{Settings, DEFAULT_MAX_DEPTH};
use treestr::{DuplicatePolicy, Format};

#[test]
fn given_explicit_config_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treestr.toml");
    fs::write(
        &path,
        r#"
[render]
indent = "  "
format = "mapping"

[parse]
duplicates = "reject"
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    assert_eq!(settings.render.indent, "  ");
    assert_eq!(settings.render.format, Format::Mapping);
    assert_eq!(settings.parse.duplicates, DuplicatePolicy::Reject);
    // Not specified: keeps default
    assert_eq!(settings.parse.max_depth, DEFAULT_MAX_DEPTH);
}

#[test]
fn given_escaped_tab_indent_when_load_then_unescaped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treestr.toml");
    // TOML literal string keeps the backslash
    fs::write(&path, "[render]\nindent = '\\t\\t'\n").unwrap();

    let settings = Settings::load(Some(path.as_path())).expect("load settings");
    assert_eq!(settings.render.indent, "\t\t");
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let result = Settings::load(Some(dir.path().join("absent.toml").as_path()));
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treestr.toml");
    fs::write(&path, "[parse]\nduplicates = \"sometimes\"\n").unwrap();

    let err = Settings::load(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("treestr.toml"));
}

#[test]
fn given_loaded_settings_when_building_service_then_settings_applied() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treestr.toml");
    fs::write(&path, "[parse]\nmax_depth = 1\n").unwrap();

    let settings = Settings::load(Some(path.as_path())).unwrap();
    let service = TransformService::new(settings);
    assert_eq!(service.settings().parse.max_depth, 1);
    assert!(service.parse("1:(2:(3))").is_err());
}
