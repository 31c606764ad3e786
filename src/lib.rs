pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

use config::{Config, Storage};
use models::user::{User, ROLE_ADMIN};
use repositories::{PgStore, RepoError, Repositories, Repository};
use services::auth::{AuthError, AuthService};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("DATABASE_URL must be set for postgres storage")]
    MissingDatabaseUrl,
    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("failed to bootstrap admin: {0}")]
    Auth(#[from] AuthError),
    #[error("failed to bootstrap admin: {0}")]
    Repo(#[from] RepoError),
}

// Shared state for every request
pub struct AppState {
    pub repos: Repositories,
    /// Present only with postgres storage.
    pub db: Option<database::Database>,
    pub auth: AuthService,
    pub config: Config,
}

impl AppState {
    /// Connects the configured store, runs migrations and creates the
    /// bootstrap admin if one is configured.
    pub async fn new(config: Config) -> Result<Arc<Self>, StartupError> {
        let (repos, db) = match config.database.storage {
            Storage::Postgres => {
                let url = config
                    .database
                    .url
                    .as_deref()
                    .ok_or(StartupError::MissingDatabaseUrl)?;
                let db = database::Database::connect(url, &config.database).await?;
                db.migrate().await?;
                (Repositories::postgres(PgStore::new(&db)), Some(db))
            }
            Storage::Memory => {
                info!("Using in-memory storage");
                (Repositories::in_memory(), None)
            }
        };

        let auth = AuthService::new(&config.jwt, &config.security);
        let state = Arc::new(Self { repos, db, auth, config });
        state.ensure_admin().await?;
        Ok(state)
    }

    /// State over the given repositories, without a database pool.
    pub fn with_repositories(config: Config, repos: Repositories) -> Arc<Self> {
        let auth = AuthService::new(&config.jwt, &config.security);
        Arc::new(Self { repos, db: None, auth, config })
    }

    async fn ensure_admin(&self) -> Result<(), StartupError> {
        let Some(admin) = &self.config.bootstrap else {
            return Ok(());
        };
        if self.repos.users.get_by_username(&admin.username).await?.is_some() {
            return Ok(());
        }

        let user = User {
            id: Uuid::nil(),
            username: admin.username.clone(),
            name: "Admin".to_string(),
            surname: "Admin".to_string(),
            phone: String::new(),
            password_hash: self.auth.hash_password(&admin.password).await?,
            role: ROLE_ADMIN.to_string(),
            reservation_count: 0,
        };
        let user = self.repos.users.create(user).await?;
        info!("Bootstrap admin {} created", user.username);
        Ok(())
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Theater Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .route("/ready", get(ready))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// 503 while the database cannot be reached
async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => (StatusCode::OK, "READY"),
            Err(e) => {
                tracing::warn!("readiness check failed: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "DATABASE UNAVAILABLE")
            }
        },
        None => (StatusCode::OK, "READY"),
    }
}
