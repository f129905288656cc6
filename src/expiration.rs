// src/expiration.rs
//! Expiration monitoring: days-to-expiry math, severity tiers and the
//! derived alert list shown on the dashboard and the expiration tracker.
//!
//! Everything here is a pure function of (items, now); alerts are never
//! persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::InventoryItem;

pub const EXPIRY_CRITICAL_DAYS: i64 = 7;
pub const EXPIRY_WARNING_DAYS: i64 = 30;

// ==================== DERIVED ALERT ====================

/// Derived from an inventory item on demand; `id` is the source item's id.
#[derive(Debug, Serialize, Clone)]
pub struct ExpirationAlert {
    pub id: String,
    pub item_name: String,
    pub expiration_date: DateTime<Utc>,
    pub days_to_expiry: i64,
    pub severity: ExpirySeverity,
    pub label: String,
}

// ==================== DAY MATH ====================

/// Signed whole days between today and the expiry date, both normalized to
/// their UTC calendar date. Negative once expired, zero on the expiry day.
pub fn days_to_expiry(expiration_date: DateTime<Utc>, today: DateTime<Utc>) -> i64 {
    (expiration_date.date_naive() - today.date_naive()).num_days()
}

// ==================== SEVERITY ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirySeverity {
    Expired,
    Critical,
    Warning,
    Ok,
}

impl ExpirySeverity {
    pub fn classify(days: i64) -> Self {
        if days < 0 {
            ExpirySeverity::Expired
        } else if days < EXPIRY_CRITICAL_DAYS {
            ExpirySeverity::Critical
        } else if days < EXPIRY_WARNING_DAYS {
            ExpirySeverity::Warning
        } else {
            ExpirySeverity::Ok
        }
    }

    /// Expired and Critical share one visual tier.
    pub fn badge(&self) -> &'static str {
        match self {
            ExpirySeverity::Expired | ExpirySeverity::Critical => "destructive",
            ExpirySeverity::Warning => "secondary",
            ExpirySeverity::Ok => "default",
        }
    }
}

// ==================== LABELS ====================

pub fn label_for(days: i64) -> String {
    if days < 0 {
        format!("Expired {} days ago", days.abs())
    } else if days == 0 {
        "Expires today".to_string()
    } else {
        format!("Expires in {} days", days)
    }
}

// ==================== ALERT LIST ====================

/// One alert per item, soonest-or-most-overdue first. The sort is stable so
/// items sharing a days-to-expiry value keep their input order.
pub fn build_alerts(items: &[InventoryItem], today: DateTime<Utc>) -> Vec<ExpirationAlert> {
    let mut alerts: Vec<ExpirationAlert> = items
        .iter()
        .map(|item| {
            let days = days_to_expiry(item.expiration_date, today);
            ExpirationAlert {
                id: item.id.clone(),
                item_name: item.name.clone(),
                expiration_date: item.expiration_date,
                days_to_expiry: days,
                severity: ExpirySeverity::classify(days),
                label: label_for(days),
            }
        })
        .collect();
    alerts.sort_by_key(|alert| alert.days_to_expiry);
    alerts
}

// ==================== TRACKER FILTER ====================

/// Filter presets offered by the expiration tracker page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertFilter {
    All,
    Expired,
    /// Not yet expired and due within the given number of days (inclusive).
    Within(i64),
}

impl AlertFilter {
    /// Accepts "all", "expired" or a day-count preset ("7", "30", "90").
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => Some(AlertFilter::All),
            "expired" => Some(AlertFilter::Expired),
            other => other.parse::<i64>().ok().filter(|n| *n >= 0).map(AlertFilter::Within),
        }
    }

    pub fn matches(&self, alert: &ExpirationAlert) -> bool {
        match self {
            AlertFilter::All => true,
            AlertFilter::Expired => alert.days_to_expiry < 0,
            AlertFilter::Within(days) => {
                alert.days_to_expiry >= 0 && alert.days_to_expiry <= *days
            }
        }
    }
}

// ==================== TESTS ====================
