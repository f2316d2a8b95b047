//! # Enode Bridge - vehicle state and webhooks from the Enode API
//!
//! Polls the Enode device-aggregation API for linked vehicles, receives
//! signed webhook deliveries about them, and exposes their state as entity
//! snapshots over HTTP.
//!
//! ## Architecture
//!
//! - `config`: YAML configuration and validation
//! - `logging`: structured logging and tracing
//! - `models` / `events`: typed API payloads and webhook events
//! - `api`: authenticated Enode REST client
//! - `coordinator`: polling cache with push updates
//! - `webhook`: signature checks, event dispatch and subscription setup
//! - `entities`: capability-gated entity adapters
//! - `instance`: per-entry runtime context
//! - `linking`: user link flow
//! - `entry`: persisted per-entry state
//! - `web`: HTTP server

pub mod api;
pub mod config;
pub mod coordinator;
pub mod entities;
pub mod entry;
pub mod error;
pub mod events;
pub mod instance;
pub mod linking;
pub mod logging;
pub mod models;
pub mod web;
pub mod webhook;

#[cfg(test)]
mod config_tests;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::VehicleCoordinator;
pub use error::{BridgeError, Result};
pub use instance::{Instance, InstanceRegistry};
