//! Loading manager configuration from disk.

use std::io::Write;
use std::time::Duration;

use courier_net::{ApiConfig, ApiEndpoint, NetworkError, RequestManager};

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        base_url = "https://staging.example.com/api/"
        timeout_secs = 7
        proxy = "http://127.0.0.1:3128"

        [default_headers]
        Accept = "application/json"
        X-Client = "courier-tests"
        "#
    )
    .unwrap();

    let config = ApiConfig::load(file.path()).unwrap();
    assert_eq!(config.timeout_secs, 7);
    assert_eq!(config.connect_timeout_secs, 10);
    assert_eq!(config.default_headers.len(), 2);

    let manager = RequestManager::from_config(&config).unwrap();
    assert_eq!(
        manager.registry().url_string(&ApiEndpoint::Login),
        "https://staging.example.com/api/login"
    );
    assert_eq!(manager.client().config().timeout, Some(Duration::from_secs(7)));
    assert_eq!(
        manager.client().config().proxy.as_deref(),
        Some("http://127.0.0.1:3128")
    );
    assert_eq!(manager.default_headers().get("X-Client"), Some("courier-tests"));
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ApiConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, NetworkError::Config(ref msg) if msg.contains("absent.toml")));
}

#[test]
fn zero_timeout_disables_it() {
    let config = ApiConfig::from_toml_str("timeout_secs = 0").unwrap();
    let client = config.client_builder().build().unwrap();
    assert_eq!(client.config().timeout, None);
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("courier.toml");

    let mut config = ApiConfig::default();
    config.base_url = "http://localhost:8080/".to_string();
    config.user_agent = Some("Courier-Test/1.0".to_string());
    std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    assert_eq!(ApiConfig::load(&path).unwrap(), config);
}
