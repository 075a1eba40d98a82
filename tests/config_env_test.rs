//! Environment-variable layer of Settings loading.
//!
//! Kept in its own test binary with a single test: the process environment
//! is shared by every test thread, and nothing else here reads it.

use std::env;

use treestr::application::ApplicationError;
use treestr::config::Settings;
use treestr::{DuplicatePolicy, Format};

const OVERRIDES: [(&str, &str); 4] = [
    ("TREESTR_RENDER__INDENT", "\\t\\t"),
    ("TREESTR_RENDER__FORMAT", "notation"),
    ("TREESTR_PARSE__DUPLICATES", "last-wins"),
    ("TREESTR_PARSE__MAX_DEPTH", "3"),
];

fn clear_overrides() {
    for (name, _) in OVERRIDES {
        env::remove_var(name);
    }
}

#[test]
fn given_treestr_env_vars_when_load_then_overrides_applied_and_invalid_rejected() {
    for (name, value) in OVERRIDES {
        env::set_var(name, value);
    }
    let loaded = Settings::load(None);

    env::set_var("TREESTR_RENDER__FORMAT", "sideways");
    let invalid_format = Settings::load(None);
    env::set_var("TREESTR_RENDER__FORMAT", "notation");
    env::set_var("TREESTR_PARSE__MAX_DEPTH", "deep");
    let invalid_depth = Settings::load(None);

    clear_overrides();
    let defaults = Settings::load(None);

    let settings = loaded.expect("load settings from environment");
    assert_eq!(settings.render.indent, "\t\t");
    assert_eq!(settings.render.format, Format::Notation);
    assert_eq!(settings.parse.duplicates, DuplicatePolicy::LastWins);
    assert_eq!(settings.parse.max_depth, 3);
    assert_eq!(settings.parser().max_depth(), Some(3));

    let err = invalid_format.unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("TREESTR_RENDER__FORMAT"));

    let err = invalid_depth.unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("TREESTR_PARSE__MAX_DEPTH"));

    // only the environment changed between the two loads
    let defaults = defaults.expect("load settings without overrides");
    assert_ne!(defaults.render.format, Format::Notation);
    assert_ne!(defaults.parse.max_depth, 3);
}
