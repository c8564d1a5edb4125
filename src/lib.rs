pub mod auth;
pub mod codes;
pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: config::AppConfig,
}
