// src/models/activity.rs
//! Activity log entries. Append-only: every mutating handler records one,
//! and the activity page only reads, filters and exports them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActivityLog {
    pub id: String,
    /// Display name of the acting user, or "System".
    pub user: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    /// Open-ended context (entity ids, old/new values).
    pub details: Option<Map<String, Value>>,
}

impl ActivityLog {
    pub fn new(user: &str, action: &str, details: Option<Map<String, Value>>) -> Self {
        Self {
            id: String::new(),
            user: user.to_string(),
            action: action.to_string(),
            timestamp: Utc::now(),
            details,
        }
    }
}
