// src/export.rs
//! CSV export of the activity log.
//!
//! Contract: UTF-8, header row of field names, one row per entry. The
//! `details` map travels as an embedded JSON string (the writer doubles any
//! quotes); absent optionals become empty strings.

use crate::error::ApiError;
use crate::models::ActivityLog;

pub const ACTIVITY_EXPORT_FILENAME: &str = "activity_logs.csv";

const HEADERS: [&str; 5] = ["id", "user", "action", "timestamp", "details"];

pub fn activity_logs_csv(logs: &[ActivityLog]) -> Result<Vec<u8>, ApiError> {
    let mut csv_data = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut csv_data);

        writer
            .write_record(HEADERS)
            .map_err(|e| ApiError::InternalServerError(e.to_string()))?;

        for log in logs {
            let details = match &log.details {
                Some(map) => serde_json::to_string(map)
                    .map_err(|e| ApiError::InternalServerError(e.to_string()))?,
                None => String::new(),
            };
            writer
                .write_record(&[
                    log.id.clone(),
                    log.user.clone(),
                    log.action.clone(),
                    log.timestamp.to_rfc3339(),
                    details,
                ])
                .map_err(|e| ApiError::InternalServerError(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| ApiError::InternalServerError(e.to_string()))?;
    }
    Ok(csv_data)
}

// ==================== TESTS ====================
