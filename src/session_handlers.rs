// src/session_handlers.rs
//! Session endpoints: who is signed in, profile updates passed through to
//! the identity provider, and sign-out.

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::audit::audit;
use crate::error::{ApiError, ApiResult};
use crate::handlers::ApiResponse;
use crate::models::{ProfileUpdate, User};
use crate::repo::Collection;
use crate::session::resolve_user;
use crate::AppState;

fn users(app_state: &AppState) -> Collection<User> {
    Collection::new(Arc::clone(&app_state.store))
}

// ==================== CURRENT USER ====================

pub async fn get_session(app_state: web::Data<Arc<AppState>>) -> ApiResult<HttpResponse> {
    let user = resolve_user(app_state.identity.as_ref(), &users(&app_state)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

// ==================== PROFILE ====================

pub async fn update_profile(
    app_state: web::Data<Arc<AppState>>,
    request: web::Json<ProfileUpdate>,
) -> ApiResult<HttpResponse> {
    let collection = users(&app_state);
    let current = resolve_user(app_state.identity.as_ref(), &collection)
        .await?
        .ok_or_else(ApiError::signed_in_required)?;

    let update = request.into_inner();
    app_state
        .identity
        .update_profile(&current.id, update.clone())
        .await?;

    // Keep the role record's copy of the profile in step.
    let mut record = current.clone();
    if let Some(name) = update.display_name {
        record.display_name = name;
    }
    if let Some(url) = update.photo_url {
        record.photo_url = Some(url);
    }
    collection.put(&record).await?;

    audit(
        &app_state.store,
        &record.display_name,
        "Updated profile",
        None,
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

// ==================== SIGN OUT ====================

pub async fn sign_out(app_state: web::Data<Arc<AppState>>) -> ApiResult<HttpResponse> {
    let current = resolve_user(app_state.identity.as_ref(), &users(&app_state)).await?;
    app_state.identity.sign_out().await?;

    if let Some(user) = current {
        audit(&app_state.store, &user.display_name, "Signed out", None).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message((), "Signed out".to_string())))
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AccountProfile, StaticIdentity};
    use crate::store::SqliteStore;
    use actix_web::{test, App};

    async fn signed_in_state() -> Arc<AppState> {
        Arc::new(AppState {
            store: Arc::new(SqliteStore::in_memory().await.unwrap()),
            identity: Arc::new(StaticIdentity::new(Some(AccountProfile {
                id: "uid-alice".to_string(),
                email: "alice.w@example.com".to_string(),
                display_name: None,
                photo_url: None,
            }))),
            config: crate::config::Config::default(),
        })
    }

    #[actix_rt::test]
    async fn test_session_reports_user_with_fallback_display_name() {
        let state = signed_in_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .route("/api/session", web::get().to(get_session)),
        )
        .await;

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/session").to_request(),
        )
        .await;
        assert_eq!(body["data"]["display_name"], "alice.w");
        assert_eq!(body["data"]["role"], "user");
    }

    #[actix_rt::test]
    async fn test_profile_update_flows_to_provider_and_record() {
        let state = signed_in_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .route("/api/session", web::get().to(get_session))
                .route("/api/session/profile", web::put().to(update_profile)),
        )
        .await;

        let response = test::TestRequest::put()
            .uri("/api/session/profile")
            .set_json(serde_json::json!({ "display_name": "Dr. Alice Wonderland" }))
            .send_request(&app)
            .await;
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/session").to_request(),
        )
        .await;
        assert_eq!(body["data"]["display_name"], "Dr. Alice Wonderland");
    }

    #[actix_rt::test]
    async fn test_sign_out_clears_session() {
        let state = signed_in_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::clone(&state)))
                .route("/api/session", web::get().to(get_session))
                .route("/api/session/signout", web::post().to(sign_out)),
        )
        .await;

        let response = test::TestRequest::post()
            .uri("/api/session/signout")
            .send_request(&app)
            .await;
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/session").to_request(),
        )
        .await;
        assert!(body["data"].is_null());
    }
}
