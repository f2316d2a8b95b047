//! Vehicle polling coordinator
//!
//! The coordinator owns the vehicle cache of one entry. It refreshes the cache
//! on a fixed interval, keeps the last good data when a poll fails, and accepts
//! single-vehicle patches pushed by webhooks. Every cache change is published
//! on a broadcast channel.

mod signal;

pub use signal::TestWebhookSignal;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::time::{MissedTickBehavior, interval};

use crate::api::EnodeApi;
use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};
use crate::models::Vehicle;

/// Outcome of the most recent poll
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoordinatorStatus {
    pub last_update_success: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Cache change notification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoordinatorUpdate {
    Refreshed { vehicles: usize },
    VehicleUpdated { vehicle_id: String },
    RefreshFailed { message: String },
}

pub struct VehicleCoordinator {
    api: Arc<dyn EnodeApi>,
    user_id: Option<String>,
    poll_interval: Duration,
    vehicles: RwLock<Vec<Vehicle>>,
    status: RwLock<CoordinatorStatus>,
    updates: broadcast::Sender<CoordinatorUpdate>,
    test_signal: TestWebhookSignal,
    logger: StructuredLogger,
}

impl VehicleCoordinator {
    pub fn new(api: Arc<dyn EnodeApi>, user_id: Option<String>, poll_interval: Duration) -> Self {
        let (updates, _) = broadcast::channel(64);
        Self {
            api,
            user_id,
            poll_interval,
            vehicles: RwLock::new(Vec::new()),
            status: RwLock::new(CoordinatorStatus::default()),
            updates,
            test_signal: TestWebhookSignal::new(),
            logger: get_logger("coordinator"),
        }
    }

    /// Attach the owning entry id to log lines
    pub fn with_entry_id(mut self, entry_id: &str) -> Self {
        self.logger = self.logger.for_entry(entry_id);
        self
    }

    pub fn api(&self) -> &Arc<dyn EnodeApi> {
        &self.api
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn test_signal(&self) -> &TestWebhookSignal {
        &self.test_signal
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorUpdate> {
        self.updates.subscribe()
    }

    /// Snapshot of the cached vehicles
    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.vehicles
            .read()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    pub fn vehicle(&self, vehicle_id: &str) -> Option<Vehicle> {
        self.vehicles
            .read()
            .ok()?
            .iter()
            .find(|v| v.id == vehicle_id)
            .cloned()
    }

    pub fn status(&self) -> CoordinatorStatus {
        self.status
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Poll Enode once and replace the cache on success
    pub async fn refresh(&self) -> Result<Vec<Vehicle>> {
        let result = match &self.user_id {
            Some(user_id) => self.api.list_user_vehicles(user_id).await,
            None => self.api.list_vehicles().await,
        };

        match result {
            Ok(vehicles) => {
                let count = vehicles.len();
                {
                    let mut cache = self.vehicles.write().unwrap_or_else(|e| e.into_inner());
                    *cache = vehicles.clone();
                }
                self.set_status(CoordinatorStatus {
                    last_update_success: true,
                    last_updated: Some(Utc::now()),
                    last_error: None,
                });
                self.logger
                    .debug(&format!("Fetched {} vehicles", count));
                self.publish(CoordinatorUpdate::Refreshed { vehicles: count });
                Ok(vehicles)
            }
            Err(err) => {
                let message = err.to_string();
                {
                    let mut status = self.status.write().unwrap_or_else(|e| e.into_inner());
                    status.last_update_success = false;
                    status.last_error = Some(message.clone());
                }
                self.publish(CoordinatorUpdate::RefreshFailed { message });
                Err(err)
            }
        }
    }

    /// Replace a cached vehicle by id, or append it when unknown
    pub fn update_vehicle(&self, vehicle: Vehicle) {
        let vehicle_id = vehicle.id.clone();
        {
            let mut cache = self.vehicles.write().unwrap_or_else(|e| e.into_inner());
            match cache.iter_mut().find(|v| v.id == vehicle.id) {
                Some(slot) => *slot = vehicle,
                None => cache.push(vehicle),
            }
        }
        self.logger
            .debug(&format!("Updated vehicle {} from push", vehicle_id));
        self.publish(CoordinatorUpdate::VehicleUpdated { vehicle_id });
    }

    /// Poll every `poll_interval` until `shutdown` flips to true
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; startup already refreshed
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh().await {
                        self.logger.warn(&format!("Vehicle poll failed: {}", e));
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.logger.info("Coordinator stopping");
                        break;
                    }
                }
            }
        }
    }

    fn set_status(&self, status: CoordinatorStatus) {
        *self.status.write().unwrap_or_else(|e| e.into_inner()) = status;
    }

    fn publish(&self, update: CoordinatorUpdate) {
        // No subscribers is fine
        let _ = self.updates.send(update);
    }
}
