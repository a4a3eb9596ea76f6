use crate::config::{Config, ConfigError};
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

#[test]
#[serial]
fn test_missing_env_yields_defaults() {
    env::remove_var("PLANLINE_PORT");
    env::remove_var("CORS_ORIGIN");
    env::remove_var("PLANLINE_DB");

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 4400);
    assert_eq!(config.cors_origin, "http://localhost:5173");
    assert_eq!(config.database_path, None);
}

#[test]
#[serial]
fn test_planline_port_override() {
    env::set_var("PLANLINE_PORT", "8080");
    env::remove_var("CORS_ORIGIN");

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.cors_origin, "http://localhost:5173");

    env::remove_var("PLANLINE_PORT");
}

#[test]
#[serial]
fn test_cors_origin_override() {
    env::remove_var("PLANLINE_PORT");
    env::set_var("CORS_ORIGIN", "https://example.com");

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 4400);
    assert_eq!(config.cors_origin, "https://example.com");

    env::remove_var("CORS_ORIGIN");
}

#[test]
#[serial]
fn test_planline_db_override() {
    env::remove_var("PLANLINE_PORT");
    env::set_var("PLANLINE_DB", "/tmp/planline-test.db");

    let config = Config::from_env().unwrap();

    assert_eq!(
        config.database_path,
        Some(PathBuf::from("/tmp/planline-test.db"))
    );

    env::remove_var("PLANLINE_DB");
}

#[test]
#[serial]
fn test_non_numeric_port_is_rejected() {
    env::set_var("PLANLINE_PORT", "not-a-number");

    let result = Config::from_env();

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), ConfigError::InvalidPort(_)));

    env::remove_var("PLANLINE_PORT");
}

#[test]
#[serial]
fn test_port_zero_is_rejected() {
    env::set_var("PLANLINE_PORT", "0");

    let result = Config::from_env();

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), ConfigError::PortOutOfRange(0)));

    env::remove_var("PLANLINE_PORT");
}

#[rstest]
#[case("1", 1)]
#[case("80", 80)]
#[case("443", 443)]
#[case("8080", 8080)]
#[case("65535", 65535)]
#[serial]
fn test_ports_in_range_are_accepted(#[case] port_str: &str, #[case] expected: u16) {
    env::set_var("PLANLINE_PORT", port_str);

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, expected);

    env::remove_var("PLANLINE_PORT");
}

#[rstest]
#[case("-1")]
#[case("65536")]
#[case("99999")]
#[case("1.5")]
#[case("0x1234")]
#[serial]
fn test_malformed_ports_are_rejected(#[case] port_str: &str) {
    env::set_var("PLANLINE_PORT", port_str);

    let result = Config::from_env();

    assert!(result.is_err());

    env::remove_var("PLANLINE_PORT");
}

#[test]
fn test_error_messages_name_the_variable() {
    let error = ConfigError::PortOutOfRange(0);
    assert_eq!(
        error.to_string(),
        "PLANLINE_PORT 0 is outside the usable range (1-65535)"
    );

    let parse_error = "123abc".parse::<u16>().unwrap_err();
    let error = ConfigError::InvalidPort(parse_error);
    assert!(error.to_string().contains("Invalid PLANLINE_PORT"));
}

#[tokio::test]
#[serial]
async fn test_open_database_honors_planline_db() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("cli-test.db");
    env::set_var("PLANLINE_DB", db_path.to_str().unwrap());
    env::remove_var("PLANLINE_PORT");

    let db = crate::open_database().await.unwrap();
    assert!(db_path.exists());

    // Migrations ran through the CLI path
    let admin = db.user_storage.get_user("default-admin").await.unwrap();
    assert_eq!(admin.email, "admin@planline.local");

    env::remove_var("PLANLINE_DB");
}
