//! Per-entry persisted state
//!
//! Each configured entry owns a small JSON file under the storage directory
//! holding the webhook registration. The webhook id and secret are always
//! written and cleared together.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::logging::{StructuredLogger, get_logger};

/// Persisted fields of one entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryData {
    #[serde(default)]
    pub webhook_id: Option<String>,
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

/// Stored webhook registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRegistration {
    pub id: String,
    pub secret: String,
}

/// JSON-file backed entry state
pub struct EntryStore {
    file_path: PathBuf,
    data: RwLock<EntryData>,
    logger: StructuredLogger,
}

impl EntryStore {
    /// Open the store for `entry_id` under `storage_dir`, loading existing state
    pub fn open<P: AsRef<Path>>(storage_dir: P, entry_id: &str) -> Result<Self> {
        let file_path = storage_dir.as_ref().join(format!("{}.json", entry_id));
        let store = Self {
            file_path,
            data: RwLock::new(EntryData::default()),
            logger: get_logger("entry").for_entry(entry_id),
        };
        store.load()?;
        Ok(store)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load state from disk
    pub fn load(&self) -> Result<()> {
        if !self.file_path.exists() {
            self.logger.info("No entry state file found, using defaults");
            return Ok(());
        }

        let contents = std::fs::read_to_string(&self.file_path)?;
        let loaded: EntryData = serde_json::from_str(&contents)?;
        *self.write_lock()? = loaded;
        self.logger.info("Loaded entry state from disk");
        Ok(())
    }

    fn save(&self, data: &EntryData) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.file_path, contents)?;
        self.logger.debug("Saved entry state to disk");
        Ok(())
    }

    pub fn data(&self) -> EntryData {
        self.data
            .read()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Current webhook registration, if both fields are present
    pub fn webhook(&self) -> Option<WebhookRegistration> {
        let data = self.data.read().ok()?;
        match (&data.webhook_id, &data.webhook_secret) {
            (Some(id), Some(secret)) => Some(WebhookRegistration {
                id: id.clone(),
                secret: secret.clone(),
            }),
            _ => None,
        }
    }

    pub fn webhook_id(&self) -> Option<String> {
        self.data.read().ok()?.webhook_id.clone()
    }

    pub fn webhook_secret(&self) -> Option<String> {
        self.data.read().ok()?.webhook_secret.clone()
    }

    /// Store a new webhook id and secret
    pub fn set_webhook(&self, id: &str, secret: &str) -> Result<()> {
        let mut data = self.write_lock()?;
        let mut next = data.clone();
        next.webhook_id = Some(id.to_string());
        next.webhook_secret = Some(secret.to_string());
        self.save(&next)?;
        *data = next;
        Ok(())
    }

    /// Remove the webhook fields, returning the previous id
    pub fn clear_webhook(&self) -> Result<Option<String>> {
        let mut data = self.write_lock()?;
        let previous = data.webhook_id.clone();
        let mut next = data.clone();
        next.webhook_id = None;
        next.webhook_secret = None;
        self.save(&next)?;
        *data = next;
        Ok(previous)
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, EntryData>> {
        self.data
            .write()
            .map_err(|_| BridgeError::generic("entry state lock poisoned"))
    }
}
