// src/main.rs
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Module declarations
mod activity_handlers;
mod audit;
mod config;
mod employee_handlers;
mod error;
mod expiration;
mod expiration_handlers;
mod export;
pub mod forms;
mod handlers;
mod inventory_handlers;
mod models;
pub mod repo;
mod session;
mod session_handlers;
pub mod store;
mod task_handlers;
pub mod view;

use config::{load_config, Config};
use models::User;
use repo::Collection;
use session::{AccountProfile, IdentityService, SessionContext, StaticIdentity};
use store::{DocumentStore, SqliteStore};

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityService>,
    pub config: Config,
}

fn setup_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn setup_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .max_age(3600);

    for origin in allowed_origins {
        if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}

fn operator_profile(config: &Config) -> Option<AccountProfile> {
    config.session.operator.as_ref().map(|operator| AccountProfile {
        id: operator.id.clone(),
        email: operator.email.clone(),
        display_name: operator.display_name.clone(),
        photo_url: operator.photo_url.clone(),
    })
}

fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health_check))
            .route("/dashboard", web::get().to(handlers::get_dashboard_stats))
            // Inventory
            .route("/inventory", web::get().to(inventory_handlers::get_inventory_items))
            .route("/inventory", web::post().to(inventory_handlers::create_inventory_item))
            .route("/inventory/{id}", web::get().to(inventory_handlers::get_inventory_item))
            .route("/inventory/{id}", web::put().to(inventory_handlers::update_inventory_item))
            .route("/inventory/{id}", web::delete().to(inventory_handlers::delete_inventory_item))
            // Tasks
            .route("/tasks", web::get().to(task_handlers::get_tasks))
            .route("/tasks", web::post().to(task_handlers::create_task))
            .route("/tasks/{id}", web::get().to(task_handlers::get_task))
            .route("/tasks/{id}", web::put().to(task_handlers::update_task))
            .route("/tasks/{id}", web::delete().to(task_handlers::delete_task))
            // Employees (create/list only)
            .route("/employees", web::get().to(employee_handlers::get_employees))
            .route("/employees", web::post().to(employee_handlers::create_employee))
            .route("/employees/roles", web::get().to(employee_handlers::get_suggested_roles))
            // Activity log
            .route("/activity", web::get().to(activity_handlers::get_activity_logs))
            .route("/activity/export", web::get().to(activity_handlers::export_activity_logs))
            // Expiration tracker
            .route("/expirations", web::get().to(expiration_handlers::get_expiration_alerts))
            // Session
            .route("/session", web::get().to(session_handlers::get_session))
            .route("/session/profile", web::put().to(session_handlers::update_profile))
            .route("/session/signout", web::post().to(session_handlers::sign_out)),
    );
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    setup_logging(&config);

    let store: Arc<dyn DocumentStore> = Arc::new(
        SqliteStore::connect(&config.store.database_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to open record store: {}", e))?,
    );

    let identity: Arc<dyn IdentityService> =
        Arc::new(StaticIdentity::new(operator_profile(&config)));

    // Explicit session lifecycle: resolve once on startup, cleared again on
    // the sign-out endpoint.
    let users: Collection<User> = Collection::new(Arc::clone(&store));
    let mut session = SessionContext::new();
    if let Err(e) = session.init(identity.as_ref(), &users).await {
        log::warn!("session init failed: {}", e);
    }
    match session.current() {
        Some(user) => log::info!("signed in as {} ({})", user.display_name, user.role),
        None => log::info!("starting signed out"),
    }

    let app_state = Arc::new(AppState {
        store,
        identity,
        config: config.clone(),
    });

    let bind_address = (config.server.host.clone(), config.server.port);
    log::info!(
        "pharmatrack listening on {}:{}",
        config.server.host,
        config.server.port
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(setup_cors(&app_state.config.security.allowed_origins))
            .app_data(web::Data::new(Arc::clone(&app_state)))
            .configure(configure_routes)
    });

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server.bind(bind_address)?.run().await?;
    Ok(())
}
