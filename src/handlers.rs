// src/handlers.rs
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::expiration::{days_to_expiry, EXPIRY_WARNING_DAYS};
use crate::models::{DashboardStats, Employee, InventoryItem, StockStatus, Task, User};
use crate::repo::Collection;
use crate::session::resolve_user;
use crate::view::{SortDirection, TableRow, TableView};
use crate::AppState;
use chrono::Utc;

// ==================== COMMON STRUCTURES ====================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
        }
    }
}

/// List endpoint query: free-text search plus one optional sort key.
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub q: Option<String>, // frontend alias for search
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListQuery {
    /// Both `search` and `q` are accepted; blank means no filter.
    pub fn get_search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .or(self.q.as_deref())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn sort_direction(&self) -> ApiResult<Option<SortDirection>> {
        match self.sort_order.as_deref() {
            None => Ok(None),
            Some(raw) => SortDirection::from_str(raw)
                .map(Some)
                .map_err(|_| ApiError::bad_request("sort_order must be 'asc' or 'desc'")),
        }
    }
}

/// Applies search and sort parameters to a freshly loaded view. Unknown
/// sort fields are rejected instead of silently ignored.
pub fn apply_list_query<T>(view: &mut TableView<T>, query: &ListQuery) -> ApiResult<()>
where
    T: TableRow,
    T::Column: FromStr,
{
    if let Some(search) = query.get_search() {
        view.set_query(search);
    }

    if let Some(raw) = query.sort_by.as_deref() {
        let column = T::Column::from_str(raw)
            .map_err(|_| ApiError::bad_request(&format!("unknown sort field '{}'", raw)))?;
        let direction = query.sort_direction()?.unwrap_or(SortDirection::Asc);
        view.set_sort(column, direction);
    } else if let Some(direction) = query.sort_direction()? {
        let (column, _) = view.sort();
        view.set_sort(column, direction);
    }

    Ok(())
}

/// Display name used for the activity trail; "System" when nobody is
/// signed in.
pub async fn acting_user(app_state: &AppState) -> String {
    let users: Collection<User> = Collection::new(Arc::clone(&app_state.store));
    match resolve_user(app_state.identity.as_ref(), &users).await {
        Ok(Some(user)) => user.display_name,
        _ => "System".to_string(),
    }
}

// ==================== DASHBOARD ====================

pub async fn get_dashboard_stats(app_state: web::Data<Arc<AppState>>) -> ApiResult<HttpResponse> {
    let items: Vec<InventoryItem> =
        Collection::<InventoryItem>::new(Arc::clone(&app_state.store)).list().await?;
    let tasks: Vec<Task> = Collection::<Task>::new(Arc::clone(&app_state.store)).list().await?;
    let employees: Vec<Employee> =
        Collection::<Employee>::new(Arc::clone(&app_state.store)).list().await?;

    let now = Utc::now();
    let stats = DashboardStats {
        total_items: items.len() as i64,
        low_stock_items: items
            .iter()
            .filter(|i| i.status == StockStatus::LowStock)
            .count() as i64,
        out_of_stock_items: items
            .iter()
            .filter(|i| i.status == StockStatus::OutOfStock)
            .count() as i64,
        urgent_tasks: tasks.iter().filter(|t| t.is_urgent()).count() as i64,
        expiring_soon_items: items
            .iter()
            .filter(|i| days_to_expiry(i.expiration_date, now) < EXPIRY_WARNING_DAYS)
            .count() as i64,
        employees: employees.len() as i64,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(stats)))
}

// ==================== HEALTH ====================

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "pharmatrack",
    }))
}

// ==================== TESTS ====================
