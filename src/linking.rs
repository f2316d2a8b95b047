//! User link flow
//!
//! Starting a link asks Enode for a hosted link URL whose redirect points back
//! at `/api/enode/done?flow_id=<id>`. The flow stays pending until that
//! callback arrives.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{BridgeError, Result};
use crate::instance::Instance;
use crate::models::VendorType;

pub const CALLBACK_PATH: &str = "/api/enode/done";

/// Returned to the caller that started a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStart {
    pub flow_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLink {
    pub entry_id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
}

/// How long a started link may wait for its callback
pub const FLOW_TTL_MINUTES: i64 = 30;

/// Link flows awaiting their redirect
pub struct LinkFlows {
    pending: Mutex<HashMap<String, PendingLink>>,
    ttl: Duration,
}

impl Default for LinkFlows {
    fn default() -> Self {
        Self::with_ttl(Duration::minutes(FLOW_TTL_MINUTES))
    }
}

impl PendingLink {
    fn expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.started_at >= ttl
    }
}

impl LinkFlows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PendingLink>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drop flows whose callback never arrived. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Utc::now();
        let mut pending = self.lock();
        let before = pending.len();
        pending.retain(|_, link| !link.expired(now, self.ttl));
        before - pending.len()
    }

    pub fn register(&self, entry_id: &str, user_id: &str) -> String {
        self.sweep();
        let flow_id = Uuid::new_v4().simple().to_string();
        self.lock().insert(
            flow_id.clone(),
            PendingLink {
                entry_id: entry_id.to_string(),
                user_id: user_id.to_string(),
                started_at: Utc::now(),
            },
        );
        flow_id
    }

    /// Drop a flow that never reached Enode
    pub fn abandon(&self, flow_id: &str) {
        self.lock().remove(flow_id);
    }

    /// Resolve a pending flow, removing it. Expired flows resolve as unknown.
    pub fn complete(&self, flow_id: &str) -> Result<PendingLink> {
        self.sweep();
        self.lock()
            .remove(flow_id)
            .ok_or_else(|| BridgeError::not_found(format!("unknown link flow '{}'", flow_id)))
    }

    pub fn is_pending(&self, flow_id: &str) -> bool {
        let now = Utc::now();
        self.lock()
            .get(flow_id)
            .is_some_and(|link| !link.expired(now, self.ttl))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn redirect_uri(external_url: &str, flow_id: &str) -> String {
    format!(
        "{}{}?flow_id={}",
        external_url.trim_end_matches('/'),
        CALLBACK_PATH,
        flow_id
    )
}

/// Start linking vehicles for `user_id`, or the entry's configured user
pub async fn start_link(
    instance: &Instance,
    flows: &LinkFlows,
    user_id: Option<&str>,
    vendor: Option<&str>,
) -> Result<LinkStart> {
    let user_id = user_id
        .or(instance.config().user_id.as_deref())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| BridgeError::validation("user_id", "A user id is required to link"))?;
    let external_url = instance.external_url().ok_or_else(|| {
        BridgeError::validation("web.external_url", "An external URL is required for linking")
    })?;

    let flow_id = flows.register(instance.id(), user_id);
    let redirect = redirect_uri(external_url, &flow_id);
    let link = instance
        .api()
        .user_link(
            user_id,
            &instance.config().language,
            &redirect,
            vendor,
            Some(VendorType::Vehicle),
        )
        .await;

    match link {
        Ok(link) => {
            instance
                .logger()
                .info(&format!("Started link flow {} for user {}", flow_id, user_id));
            Ok(LinkStart {
                flow_id,
                url: link.url,
            })
        }
        Err(e) => {
            flows.abandon(&flow_id);
            Err(e)
        }
    }
}
