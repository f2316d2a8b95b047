//! Per-entry runtime context
//!
//! An [`Instance`] bundles everything one configured entry needs: its config,
//! the coordinator (which owns the API client and cache) and the entry store.
//! Components receive the instance explicitly.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{EnodeApi, EnodeClient};
use crate::config::{Config, EntryConfig};
use crate::coordinator::VehicleCoordinator;
use crate::entry::EntryStore;
use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};

pub struct Instance {
    config: EntryConfig,
    external_url: Option<String>,
    coordinator: Arc<VehicleCoordinator>,
    store: EntryStore,
    logger: StructuredLogger,
}

impl Instance {
    /// Assemble an instance around an existing API implementation
    pub fn new(
        config: EntryConfig,
        external_url: Option<String>,
        api: Arc<dyn EnodeApi>,
        store: EntryStore,
        poll_interval: Duration,
    ) -> Self {
        let coordinator = VehicleCoordinator::new(api, config.user_id.clone(), poll_interval)
            .with_entry_id(&config.id);
        let logger = get_logger("instance").for_entry(&config.id);
        Self {
            config,
            external_url: external_url.map(|u| u.trim_end_matches('/').to_string()),
            coordinator: Arc::new(coordinator),
            store,
            logger,
        }
    }

    /// Build an instance from configuration with the production HTTP client
    pub fn from_config(config: &Config, entry: &EntryConfig) -> Result<Self> {
        let client = EnodeClient::from_entry(entry)?;
        let store = EntryStore::open(Path::new(&config.storage_dir), &entry.id)?;
        Ok(Self::new(
            entry.clone(),
            config.web.external_url.clone(),
            Arc::new(client),
            store,
            Duration::from_secs(config.poll_interval_secs),
        ))
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    pub fn external_url(&self) -> Option<&str> {
        self.external_url.as_deref()
    }

    pub fn api(&self) -> &Arc<dyn EnodeApi> {
        self.coordinator.api()
    }

    pub fn coordinator(&self) -> &Arc<VehicleCoordinator> {
        &self.coordinator
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// First poll; a failure leaves an empty cache and is logged
    pub async fn start(&self) {
        match self.coordinator.refresh().await {
            Ok(vehicles) => self
                .logger
                .info(&format!("Initial refresh found {} vehicles", vehicles.len())),
            Err(e) => self
                .logger
                .warn(&format!("Initial refresh failed: {}", e)),
        }
    }
}

/// Instances keyed by entry id
#[derive(Default, Clone)]
pub struct InstanceRegistry {
    instances: BTreeMap<String, Arc<Instance>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::new();
        for entry in &config.entries {
            registry.insert(Instance::from_config(config, entry)?);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, instance: Instance) -> Arc<Instance> {
        let instance = Arc::new(instance);
        self.instances
            .insert(instance.id().to_string(), instance.clone());
        instance
    }

    pub fn get(&self, entry_id: &str) -> Option<Arc<Instance>> {
        self.instances.get(entry_id).cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        self.instances.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Instance>> {
        self.instances.values()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
