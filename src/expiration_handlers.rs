// src/expiration_handlers.rs
//! Expiration tracker endpoint: the derived alert list, soonest first,
//! with the page's filter presets (all / expired / next 7 / 30 / 90 days).

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::expiration::{build_alerts, AlertFilter};
use crate::handlers::ApiResponse;
use crate::models::InventoryItem;
use crate::repo::Collection;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    pub filter: Option<String>,
}

pub async fn get_expiration_alerts(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<AlertQuery>,
) -> ApiResult<HttpResponse> {
    let filter = match query.filter.as_deref() {
        None => AlertFilter::All,
        Some(raw) => AlertFilter::parse(raw).ok_or_else(|| {
            ApiError::bad_request("filter must be 'all', 'expired' or a number of days")
        })?,
    };

    let items: Vec<InventoryItem> =
        Collection::<InventoryItem>::new(Arc::clone(&app_state.store)).list().await?;

    let alerts: Vec<_> = build_alerts(&items, Utc::now())
        .into_iter()
        .filter(|alert| filter.matches(alert))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(alerts)))
}

// ==================== TESTS ====================
