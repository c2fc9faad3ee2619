use std::io::Write;
use telegraph::module::ApplicationConfig;

#[test]
fn loads_application_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "boot_timeout_secs": 15,
            "modules": [
                {{"name": "storage", "config": {{"path": "/var/lib/records"}}}},
                {{"name": "trace", "config": {{"min_duration_ms": 10}}}}
            ]
        }}"#
    )
    .unwrap();

    let config = ApplicationConfig::from_file(file.path()).unwrap();
    assert_eq!(config.module_list(), vec!["storage", "trace"]);
    assert_eq!(config.boot_timeout_secs, Some(15));
    assert_eq!(
        config.module_config("trace").unwrap()["min_duration_ms"],
        10
    );
}

#[test]
fn rejects_malformed_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json at all").unwrap();
    assert!(ApplicationConfig::from_file(file.path()).is_err());

    assert!(ApplicationConfig::from_file("/nonexistent/config.json").is_err());
}

#[test]
fn empty_config_boots_nothing() {
    let config = ApplicationConfig::from_json(serde_json::json!({})).unwrap();
    assert!(config.module_list().is_empty());
    assert!(config.boot_timeout().is_none());
}
