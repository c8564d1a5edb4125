use crate::{auth, codes, db, error::LinkError, AppState};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ShortenRequest {
    pub original_url: String,
    /// Hours until the link expires; defaults to the configured value (24).
    pub expiry_hours: Option<i64>,
    /// Optional password gating both redirect and analytics.
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
}

/// POST /shorten
///
/// Validates the target URL, generates a collision-checked short code,
/// hashes the password if one was supplied, stores the record, and returns
/// the full short URL.
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, LinkError> {
    let url = req.original_url.trim().to_owned();
    if url.is_empty() {
        return Err(LinkError::Validation("original_url must not be empty".into()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(LinkError::Validation(
            "original_url must start with http:// or https://".into(),
        ));
    }

    let expiry_hours = req.expiry_hours.unwrap_or(state.config.default_expiry_hours);
    if expiry_hours < 0 {
        return Err(LinkError::Validation("expiry_hours must not be negative".into()));
    }
    let lifetime = chrono::Duration::try_hours(expiry_hours)
        .ok_or_else(|| LinkError::Validation("expiry_hours is out of range".into()))?;
    let expires_at = (chrono::Utc::now() + lifetime).naive_utc();

    let password_hash = match req.password.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    let code = codes::generate_unique_code(&state.db).await?;
    let link = db::create_link(&state.db, &code, &url, password_hash.as_deref(), expires_at).await?;

    tracing::info!("created short link '{}' -> {}", link.short_code, link.original_url);

    Ok(Json(ShortenResponse {
        short_url: format!("{}/{}", state.config.base_url, link.short_code),
    }))
}
