// src/inventory_handlers.rs
//! Inventory endpoints: list with search/sort, create, read, full-replace
//! update, delete. Every mutation is validated first, persisted second and
//! recorded in the activity trail last.

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::audit::{audit, entity_details};
use crate::error::{ApiError, ApiResult};
use crate::forms::FieldErrors;
use crate::handlers::{acting_user, apply_list_query, ApiResponse, ListQuery};
use crate::models::{CreateInventoryItemRequest, InventoryItem, UpdateInventoryItemRequest};
use crate::repo::Collection;
use crate::store::StoreError;
use crate::view::TableView;
use crate::AppState;

fn items(app_state: &AppState) -> Collection<InventoryItem> {
    Collection::new(Arc::clone(&app_state.store))
}

// ==================== LIST / READ ====================

pub async fn get_inventory_items(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = items(&app_state).list().await?;
    let mut view = TableView::new(records);
    apply_list_query(&mut view, &query)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(view.displayed())))
}

pub async fn get_inventory_item(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let item_id = path.into_inner();
    let item = items(&app_state).get(&item_id).await.map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::item_not_found(&item_id),
        other => other.into(),
    })?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(item)))
}

// ==================== CREATE ====================

pub async fn create_inventory_item(
    app_state: web::Data<Arc<AppState>>,
    request: web::Json<CreateInventoryItemRequest>,
) -> ApiResult<HttpResponse> {
    request
        .validate()
        .map_err(|e| FieldErrors::from(e).to_api_error())?;

    let item = request.into_inner().into_item(String::new());
    let created = items(&app_state).create(item).await?;

    let user = acting_user(&app_state).await;
    audit(
        &app_state.store,
        &user,
        &format!("Added inventory item: {}", created.name),
        Some(entity_details("item", &created.id, &created.name)),
    )
    .await;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        created.clone(),
        format!("{} has been added to the inventory", created.name),
    )))
}

// ==================== UPDATE ====================

pub async fn update_inventory_item(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    request: web::Json<UpdateInventoryItemRequest>,
) -> ApiResult<HttpResponse> {
    request
        .validate()
        .map_err(|e| FieldErrors::from(e).to_api_error())?;

    let item_id = path.into_inner();
    let item = request.into_inner().into_item(item_id.clone());

    items(&app_state).update(&item).await.map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::item_not_found(&item_id),
        other => other.into(),
    })?;

    let user = acting_user(&app_state).await;
    audit(
        &app_state.store,
        &user,
        &format!("Updated inventory item: {}", item.name),
        Some(entity_details("item", &item.id, &item.name)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        item.clone(),
        format!("{} has been updated", item.name),
    )))
}

// ==================== DELETE ====================

pub async fn delete_inventory_item(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let item_id = path.into_inner();
    let collection = items(&app_state);

    // Fetch first so the activity entry can name what was removed.
    let item = collection.get(&item_id).await.map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::item_not_found(&item_id),
        other => other.into(),
    })?;

    collection.delete(&item_id).await.map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::item_not_found(&item_id),
        other => other.into(),
    })?;

    let user = acting_user(&app_state).await;
    audit(
        &app_state.store,
        &user,
        &format!("Deleted inventory item: {}", item.name),
        Some(entity_details("item", &item.id, &item.name)),
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        item.id.clone(),
        format!("{} has been removed from the inventory", item.name),
    )))
}
