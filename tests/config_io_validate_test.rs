use enode_bridge::config::{Config, EntryConfig};
use std::fs;

fn entry(id: &str) -> EntryConfig {
    EntryConfig {
        id: id.to_string(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        sandbox: false,
        user_id: Some("user-1".to_string()),
        language: "nb-NO".to_string(),
    }
}

#[test]
fn save_and_load_yaml_roundtrip() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("config.yaml");

    let mut cfg = Config::default();
    cfg.web.external_url = Some("https://home.example.com".to_string());
    cfg.entries.push(entry("home"));
    cfg.logging.file = path.with_extension("log").to_string_lossy().to_string();

    cfg.save_to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();

    assert_eq!(loaded.web.external_url.as_deref(), Some("https://home.example.com"));
    assert_eq!(loaded.logging.file, cfg.logging.file);
    let home = loaded.entry("home").unwrap();
    assert_eq!(home.language, "nb-NO");
    assert_eq!(home.user_id.as_deref(), Some("user-1"));
}

#[test]
fn config_validation_errors() {
    let mut cfg = Config::default();

    cfg.web.host.clear();
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.web.external_url = Some("home.example.com".to_string());
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.poll_interval_secs = 0;
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    let mut missing = entry("home");
    missing.client_id = "  ".to_string();
    cfg.entries.push(missing);
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.entries.push(entry(""));
    assert!(cfg.validate().is_err());
}

#[test]
fn from_file_with_invalid_yaml_fails() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), b"bad: [unclosed").unwrap();
    let err = Config::from_file(tmp.path()).unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("Serialization error"));
}
