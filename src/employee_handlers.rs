// src/employee_handlers.rs
//! Employee directory endpoints. Append-only: list, read and admin-gated
//! create; editing and removal are intentionally not exposed.

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::audit::{audit, entity_details};
use crate::error::{ApiError, ApiResult};
use crate::forms::FieldErrors;
use crate::handlers::{apply_list_query, ApiResponse, ListQuery};
use crate::models::{CreateEmployeeRequest, Employee, User, SUGGESTED_ROLES};
use crate::repo::Collection;
use crate::session::resolve_user;
use crate::view::TableView;
use crate::AppState;

fn employees(app_state: &AppState) -> Collection<Employee> {
    Collection::new(Arc::clone(&app_state.store))
}

// ==================== LIST ====================

pub async fn get_employees(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = employees(&app_state).list().await?;
    let mut view = TableView::new(records);
    apply_list_query(&mut view, &query)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(view.displayed())))
}

pub async fn get_suggested_roles() -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(SUGGESTED_ROLES)))
}

// ==================== CREATE (admin only) ====================

pub async fn create_employee(
    app_state: web::Data<Arc<AppState>>,
    request: web::Json<CreateEmployeeRequest>,
) -> ApiResult<HttpResponse> {
    let users: Collection<User> = Collection::new(Arc::clone(&app_state.store));
    let current = resolve_user(app_state.identity.as_ref(), &users)
        .await?
        .ok_or_else(ApiError::signed_in_required)?;
    if !current.role.is_admin() {
        return Err(ApiError::admin_required());
    }

    request
        .validate()
        .map_err(|e| FieldErrors::from(e).to_api_error())?;

    let employee = request.into_inner().into_employee(String::new());
    let created = employees(&app_state).create(employee).await?;

    audit(
        &app_state.store,
        &current.display_name,
        &format!("Added employee: {}", created.name),
        Some(entity_details("employee", &created.id, &created.name)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        created.clone(),
        format!("{} has been added to the directory", created.name),
    )))
}

// ==================== TESTS ====================
