#![cfg(test)]

use super::config::*;

fn sample_entry(id: &str) -> EntryConfig {
    EntryConfig {
        id: id.to_string(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        sandbox: true,
        user_id: None,
        language: "en-US".to_string(),
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.web.port, 8099);
    assert_eq!(config.poll_interval_secs, 300);
    assert!(config.entries.is_empty());
    assert!(config.web.external_url.is_none());
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.web.port = 0;
    assert!(config.validate().is_err());

    config = Config::default();
    config.entries = vec![sample_entry("home"), sample_entry("home")];
    assert!(config.validate().is_err());

    config = Config::default();
    config.logging.level = "loud".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_entry_defaults_from_yaml() {
    let yaml = r#"
entries:
  - id: home
    client_id: abc
    client_secret: def
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    let entry = config.entry("home").unwrap();
    assert!(!entry.sandbox);
    assert_eq!(entry.language, "en-US");
    assert!(entry.user_id.is_none());
    assert_eq!(config.poll_interval_secs, 300);
}
