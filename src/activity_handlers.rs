// src/activity_handlers.rs
//! Activity log endpoints: read-only listing (newest first by default) and
//! CSV export. Entries are appended elsewhere, by the mutating handlers.

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::export::{activity_logs_csv, ACTIVITY_EXPORT_FILENAME};
use crate::handlers::{apply_list_query, ApiResponse, ListQuery};
use crate::models::ActivityLog;
use crate::repo::Collection;
use crate::view::TableView;
use crate::AppState;

fn activity_logs(app_state: &AppState) -> Collection<ActivityLog> {
    Collection::new(Arc::clone(&app_state.store))
}

// ==================== LIST ====================

/// Search/sort plus an optional calendar-day filter; the day filter ANDs
/// with the free-text query.
#[derive(Debug, Deserialize, Default)]
pub struct ActivityQuery {
    pub search: Option<String>,
    pub q: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    /// YYYY-MM-DD, matched against the entry's UTC calendar day.
    pub date: Option<String>,
}

impl ActivityQuery {
    fn list_query(&self) -> ListQuery {
        ListQuery {
            search: self.search.clone(),
            q: self.q.clone(),
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
        }
    }
}

pub async fn get_activity_logs(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<ActivityQuery>,
) -> ApiResult<HttpResponse> {
    let day = query
        .date
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::bad_request("date must be formatted YYYY-MM-DD"))
        })
        .transpose()?;

    let records = activity_logs(&app_state).list().await?;
    let mut view = TableView::new(records);
    apply_list_query(&mut view, &query.list_query())?;

    let mut entries = view.displayed();
    if let Some(day) = day {
        entries.retain(|log| log.timestamp.date_naive() == day);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
}

// ==================== EXPORT ====================

pub async fn export_activity_logs(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    // Export follows the default view order: newest entries first.
    let records = activity_logs(&app_state).list().await?;
    let view = TableView::new(records);
    let csv_data = activity_logs_csv(&view.displayed())?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", ACTIVITY_EXPORT_FILENAME),
        ))
        .body(csv_data))
}

// ==================== TESTS ====================
