// src/task_handlers.rs
//! Task endpoints. Status is set directly through create/edit; the service
//! does not force the Pending -> In Progress -> Completed ladder.

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::audit::{audit, entity_details};
use crate::error::{ApiError, ApiResult};
use crate::forms::FieldErrors;
use crate::handlers::{acting_user, apply_list_query, ApiResponse, ListQuery};
use crate::models::{CreateTaskRequest, Task, UpdateTaskRequest};
use crate::repo::Collection;
use crate::store::StoreError;
use crate::view::TableView;
use crate::AppState;

fn tasks(app_state: &AppState) -> Collection<Task> {
    Collection::new(Arc::clone(&app_state.store))
}

// ==================== LIST / READ ====================

pub async fn get_tasks(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = tasks(&app_state).list().await?;
    let mut view = TableView::new(records);
    apply_list_query(&mut view, &query)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(view.displayed())))
}

pub async fn get_task(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let task_id = path.into_inner();
    let task = tasks(&app_state).get(&task_id).await.map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::task_not_found(&task_id),
        other => other.into(),
    })?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(task)))
}

// ==================== CREATE ====================

pub async fn create_task(
    app_state: web::Data<Arc<AppState>>,
    request: web::Json<CreateTaskRequest>,
) -> ApiResult<HttpResponse> {
    request
        .validate()
        .map_err(|e| FieldErrors::from(e).to_api_error())?;

    let task = request.into_inner().into_task(String::new());
    let created = tasks(&app_state).create(task).await?;

    let user = acting_user(&app_state).await;
    audit(
        &app_state.store,
        &user,
        &format!("Created task: {}", created.title),
        Some(entity_details("task", &created.id, &created.title)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        created.clone(),
        format!("Task \"{}\" has been added", created.title),
    )))
}

// ==================== UPDATE ====================

pub async fn update_task(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    request: web::Json<UpdateTaskRequest>,
) -> ApiResult<HttpResponse> {
    request
        .validate()
        .map_err(|e| FieldErrors::from(e).to_api_error())?;

    let task_id = path.into_inner();
    let task = request.into_inner().into_task(task_id.clone());

    tasks(&app_state).update(&task).await.map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::task_not_found(&task_id),
        other => other.into(),
    })?;

    let user = acting_user(&app_state).await;
    audit(
        &app_state.store,
        &user,
        &format!("Updated task: {}", task.title),
        Some(entity_details("task", &task.id, &task.title)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        task.clone(),
        format!("Task \"{}\" has been updated", task.title),
    )))
}

// ==================== DELETE ====================

pub async fn delete_task(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let task_id = path.into_inner();
    let collection = tasks(&app_state);

    let task = collection.get(&task_id).await.map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::task_not_found(&task_id),
        other => other.into(),
    })?;

    collection.delete(&task_id).await.map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::task_not_found(&task_id),
        other => other.into(),
    })?;

    let user = acting_user(&app_state).await;
    audit(
        &app_state.store,
        &user,
        &format!("Deleted task: {}", task.title),
        Some(entity_details("task", &task.id, &task.title)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        task.id.clone(),
        format!("Task \"{}\" has been removed", task.title),
    )))
}

// ==================== TESTS ====================
