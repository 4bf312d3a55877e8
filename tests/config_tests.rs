//! Integration tests for configuration loading

use dashboard::prelude::*;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_load_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
server:
  bind: "0.0.0.0:8080"
auth:
  session_cookie: "authjs.session-token"
search:
  debounce_ms: 500
"#
    )
    .unwrap();

    let config = DashboardConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.auth.session_cookie, "authjs.session-token");
    assert_eq!(config.auth.protected_prefix, "/dashboard");
    assert_eq!(config.search.debounce(), Duration::from_millis(500));
    assert!(config.database.url.is_none());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yaml");

    let err = DashboardConfig::from_yaml_file(path.to_str().unwrap()).unwrap_err();

    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_parse_error_names_the_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "auth: [not, a, map]").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let err = DashboardConfig::from_yaml_file(&path).unwrap_err();

    match err {
        ConfigError::ParseError { file, .. } => assert_eq!(file.as_deref(), Some(path.as_str())),
        other => panic!("expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_custom_guard_paths_drive_authorize() {
    let config = DashboardConfig::from_yaml_str(
        r#"
auth:
  protected_prefix: "/app"
  login_path: "/signin"
  home_path: "/app/home"
"#,
    )
    .unwrap();

    assert_eq!(authorize(false, "/app/invoices", &config.auth), GuardDecision::Deny);
    assert_eq!(
        authorize(true, "/signin", &config.auth),
        GuardDecision::Redirect("/app/home".to_string())
    );
    assert_eq!(authorize(false, "/dashboard", &config.auth), GuardDecision::Allow);
}

#[test]
fn test_home_path_outside_prefix_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "auth:\n  protected_prefix: \"/app\"\n  home_path: \"/home\"").unwrap();

    let err = DashboardConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap_err();

    match err {
        ConfigError::InvalidValue { key, .. } => assert_eq!(key, "auth.home_path"),
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}
