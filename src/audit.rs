// ============================================================
// src/audit.rs - Activity trail helper
// Every mutating handler records what happened; the activity page
// only ever reads these entries back.
// ============================================================

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::models::ActivityLog;
use crate::repo::Collection;
use crate::store::{DocumentStore, StoreError};

/// Append one activity entry.
pub async fn log_activity(
    store: &Arc<dyn DocumentStore>,
    user: &str,
    action: &str,
    details: Option<Map<String, Value>>,
) -> Result<ActivityLog, StoreError> {
    let logs: Collection<ActivityLog> = Collection::new(Arc::clone(store));
    logs.create(ActivityLog::new(user, action, details)).await
}

/// Fire-and-forget variant for handlers: a failed audit write must never
/// fail the operation it describes.
pub async fn audit(
    store: &Arc<dyn DocumentStore>,
    user: &str,
    action: &str,
    details: Option<Map<String, Value>>,
) {
    if let Err(e) = log_activity(store, user, action, details).await {
        log::error!("Failed to write activity log: {}", e);
    }
}

/// Detail map builder for the common "which entity" case.
pub fn entity_details(kind: &str, id: &str, name: &str) -> Map<String, Value> {
    let mut details = Map::new();
    details.insert(format!("{}_id", kind), Value::from(id));
    details.insert(format!("{}_name", kind), Value::from(name));
    details
}

// ==================== TESTS ====================
