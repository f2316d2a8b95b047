use super::*;

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8099,
            external_url: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/enode-bridge.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            logging: LoggingConfig::default(),
            poll_interval_secs: 300,
            storage_dir: "/data/enode-bridge".to_string(),
            entries: Vec::new(),
        }
    }
}
