use langrag_web::config::{AppConfig, LOCAL_API_URL, PRODUCTION_API_URL};
use serial_test::serial;
use std::env;
use std::fs;

const VARS: &[&str] = &[
    "CONFIG_FILE",
    "PORT",
    "LANGRAG_HOST",
    "LANGRAG_API_URL",
    "LANGRAG_STATIC_DIR",
    "LANGRAG_SERVER__PORT",
    "LANGRAG_UPLOAD__MAX_FILES",
    "LANGRAG_UPLOAD__ACCEPTED_TYPES",
    "LANGRAG_BACKEND__API_URL",
];

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    for var in VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

// Parse with a bare program name so the test runner's own args are ignored
fn load() -> Result<AppConfig, config::ConfigError> {
    AppConfig::load_from_args(["langrag-web"])
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load().expect("defaults should load");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.upload.max_files, 5);
    assert_eq!(config.upload.accepted_types, vec![".pdf", ".docx", ".txt"]);
    assert_eq!(config.upload.max_file_size, 10 * 1024 * 1024);
    assert_eq!(config.session.idle_timeout_secs, 1800);
    assert!(config.backend.api_url.is_none());

    let resolved = config.backend.resolved_api_url();
    if option_env!("LANGRAG_API_URL").is_none() {
        let expected = if cfg!(debug_assertions) {
            LOCAL_API_URL
        } else {
            PRODUCTION_API_URL
        };
        assert_eq!(resolved, expected);
    }
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("LANGRAG_SERVER__PORT", "9090");
        env::set_var("LANGRAG_UPLOAD__MAX_FILES", "3");
        env::set_var("LANGRAG_UPLOAD__ACCEPTED_TYPES", ".pdf,.md");
    }

    let config = load().expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.upload.max_files, 3);
    assert_eq!(config.upload.accepted_types, vec![".pdf", ".md"]);
    assert!(config.upload.policy().accepts_extension("md"));

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("langrag.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
backend:
  api_url: "http://backend.internal:5000/api"
session:
  idle_timeout_secs: 60
"#,
    )
    .expect("Failed to write temp config");

    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = load().expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.session.idle_timeout_secs, 60);
    assert_eq!(
        config.backend.resolved_api_url(),
        "http://backend.internal:5000/api"
    );
    // untouched keys keep their defaults
    assert_eq!(config.upload.max_files, 5);

    clear_env_vars();
}

#[test]
#[serial]
fn test_precedence_file_env_cli() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("langrag.yaml");
    fs::write(&file_path, "server:\n  port: 7070\n").expect("write config");

    unsafe {
        env::set_var("LANGRAG_SERVER__PORT", "8080");
    }

    let path = file_path.to_string_lossy().into_owned();
    let config = AppConfig::load_from_args(["langrag-web", "--config", path.as_str()])
        .expect("load");
    assert_eq!(config.server.port, 8080, "env beats file");

    let config = AppConfig::load_from_args([
        "langrag-web",
        "--config",
        path.as_str(),
        "--port",
        "4000",
        "--api-url",
        "http://cli:1/api",
    ])
    .expect("load");
    assert_eq!(config.server.port, 4000, "flag beats env");
    assert_eq!(config.backend.resolved_api_url(), "http://cli:1/api");

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["langrag-web", "--config", "/nonexistent/langrag.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_invalid_upload_limits_rejected() {
    clear_env_vars();
    unsafe {
        env::set_var("LANGRAG_UPLOAD__MAX_FILES", "0");
    }

    assert!(load().is_err());

    clear_env_vars();
}
