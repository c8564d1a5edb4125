use super::PasswordPromptTemplate;
use crate::{
    db,
    error::LinkError,
    gate,
    models::{Access, Link},
    AppState,
};
use askama::Template;
use axum::{
    extract::{Form, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Template)]
#[template(path = "analytics.html")]
struct AnalyticsTemplate {
    short_url: String,
    original_url: String,
    created_at: String,
    expires_at: String,
    access_count: i64,
    accesses: Vec<Access>,
}

#[derive(Deserialize)]
pub struct PasswordForm {
    pub password: String,
}

/// GET /analytics/:code
///
/// Analytics are gated exactly like the redirect: the link must exist and be
/// unexpired, and a protected link needs its password (here via the
/// `X-Password` header, or through the form served when it is absent).
/// Viewing analytics does not count as an access.
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Response {
    let password = headers.get("x-password").and_then(|v| v.to_str().ok());

    match gate::authorize(&state.db, &code, password).await {
        Ok(link) => render(&state, link).await,
        Err(LinkError::PasswordRequired) => {
            PasswordPromptTemplate::new(format!("/analytics/{code}/validate")).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// POST /analytics/:code/validate
///
/// Form-based password submission for the analytics page.
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Form(form): Form<PasswordForm>,
) -> Response {
    match gate::authorize(&state.db, &code, Some(&form.password)).await {
        Ok(link) => render(&state, link).await,
        Err(LinkError::WrongPassword) => (
            StatusCode::FORBIDDEN,
            PasswordPromptTemplate::with_error(
                format!("/analytics/{code}/validate"),
                "Password is incorrect.",
            ),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────

async fn render(state: &Arc<AppState>, link: Link) -> Response {
    let accesses = match db::get_accesses(&state.db, link.id).await {
        Ok(a) => a,
        Err(e) => {
            tracing::error!("failed to load access log for '{}': {:?}", link.short_code, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load analytics.")
                .into_response();
        }
    };

    AnalyticsTemplate {
        short_url: format!("{}/{}", state.config.base_url, link.short_code),
        original_url: link.original_url,
        created_at: link.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        expires_at: link.expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        access_count: link.access_count,
        accesses,
    }
    .into_response()
}
