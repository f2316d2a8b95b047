use crate::coordinator::VehicleCoordinator;
use crate::events::{WebhookEvent, decode_batch};
use crate::logging::{StructuredLogger, get_logger};

/// Counts from processing one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub handled: usize,
    pub skipped: usize,
}

/// Applies decoded webhook events to a coordinator
pub struct WebhookProcessor<'a> {
    coordinator: &'a VehicleCoordinator,
    logger: StructuredLogger,
}

impl<'a> WebhookProcessor<'a> {
    pub fn new(coordinator: &'a VehicleCoordinator) -> Self {
        Self {
            coordinator,
            logger: get_logger("webhook"),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Handle events in delivery order
    pub fn process(&self, events: Vec<WebhookEvent>) -> ProcessSummary {
        let mut summary = ProcessSummary::default();
        for event in events {
            if self.dispatch(event) {
                summary.handled += 1;
            } else {
                summary.skipped += 1;
            }
        }
        summary
    }

    fn dispatch(&self, event: WebhookEvent) -> bool {
        match event {
            WebhookEvent::VehicleUpdated(e) => {
                self.coordinator.update_vehicle(e.vehicle);
                true
            }
            WebhookEvent::Heartbeat(e) => {
                self.logger.debug(&format!(
                    "Received system heartbeat event with {} pending events",
                    e.pending_events
                ));
                true
            }
            WebhookEvent::Test(_) => {
                if !self.coordinator.test_signal().resolve() {
                    self.logger
                        .debug("Received test event with no test in progress");
                }
                true
            }
            other @ (WebhookEvent::VehicleDiscovered(_)
            | WebhookEvent::VehicleDeleted(_)
            | WebhookEvent::SmartChargingStatusUpdated(_)
            | WebhookEvent::CredentialsInvalidated(_)
            | WebhookEvent::VendorActionUpdated(_)
            | WebhookEvent::ScheduleExecutionUpdated(_)) => {
                self.logger.debug(&format!(
                    "Received unsupported webhook event: {}",
                    other.event_type()
                ));
                false
            }
        }
    }
}

/// Decode an authenticated body and apply it. Decode failures are logged.
pub fn process_body(coordinator: &VehicleCoordinator, logger: &StructuredLogger, body: &[u8]) {
    match decode_batch(body) {
        Ok(events) => {
            let count = events.len();
            let summary = WebhookProcessor::new(coordinator)
                .with_logger(logger.clone())
                .process(events);
            logger.debug(&format!(
                "Processed {} webhook events ({} handled, {} skipped)",
                count, summary.handled, summary.skipped
            ));
        }
        Err(e) => logger.warn(&format!("Discarding webhook batch: {}", e)),
    }
}
