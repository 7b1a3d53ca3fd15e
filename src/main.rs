mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth::google::GoogleClient;
use config::Config;

pub struct AppState {
    pub db_pool: SqlitePool,
    pub google: GoogleClient,
    pub config: Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devrooms=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    // Set up database
    tracing::info!("Connecting to database: {}", config.database_url);
    let db_pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    // Apply the generated schema
    tracing::info!("Running database migrations");
    db::run_migrations(&db_pool)
        .await
        .context("Failed to run migrations")?;

    // Create OAuth client
    let google = GoogleClient::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.oauth_redirect_url.clone(),
    );

    let addr = format!("{}:{}", config.host, config.port);

    // Create shared application state
    let state = Arc::new(AppState {
        db_pool,
        google,
        config,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route(
            "/rooms",
            get(handlers::rooms::list_rooms).post(handlers::rooms::create_room),
        )
        .route("/rooms/mine", get(handlers::rooms::my_rooms))
        .route(
            "/rooms/:id",
            get(handlers::rooms::get_room)
                .put(handlers::rooms::update_room)
                .delete(handlers::rooms::delete_room),
        )
        .route("/auth/signin", get(handlers::session::sign_in))
        .route("/auth/callback", get(handlers::session::oauth_callback))
        .route("/auth/session", get(handlers::session::session))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
