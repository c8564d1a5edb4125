use super::PasswordPromptTemplate;
use crate::{db, error::LinkError, gate, models::Link, AppState};
use askama::Template;
use axum::{
    extract::{ConnectInfo, Form, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::{net::SocketAddr, sync::Arc};

#[derive(Template)]
#[template(path = "redirecting.html")]
struct RedirectingTemplate {
    original_url: String,
}

#[derive(Deserialize)]
pub struct PasswordForm {
    pub password: String,
}

/// GET /:code
///
/// Runs the gatekeeper, records the access in the background, and returns a
/// 302 redirect to the original URL. A protected link served without a
/// password gets the password form instead of a redirect.
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let link = match gate::authorize(&state.db, &code, None).await {
        Ok(link) => link,
        Err(LinkError::PasswordRequired) => {
            return PasswordPromptTemplate::new(format!("/{code}/validate")).into_response();
        }
        Err(e) => return e.into_response(),
    };

    record_access_in_background(&state, &link, extract_ip(&headers, addr));

    Redirect::to(&link.original_url).into_response()
}

/// POST /:code/validate
///
/// Password submission for a protected link. On success the visitor gets a
/// small page that auto-redirects to the original URL (and the access is
/// recorded); a wrong password re-renders the form at 403.
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Form(form): Form<PasswordForm>,
) -> Response {
    let link = match gate::authorize(&state.db, &code, Some(&form.password)).await {
        Ok(link) => link,
        Err(LinkError::WrongPassword) => {
            return (
                StatusCode::FORBIDDEN,
                PasswordPromptTemplate::with_error(
                    format!("/{code}/validate"),
                    "Password is incorrect.",
                ),
            )
                .into_response();
        }
        Err(e) => return e.into_response(),
    };

    record_access_in_background(&state, &link, extract_ip(&headers, addr));

    RedirectingTemplate {
        original_url: link.original_url,
    }
    .into_response()
}

// ── Helpers ────────────────────────────────────────────────────────────────

/// Append to the access log and bump the counter in a spawned task so the
/// redirect response is never blocked by the analytics write.
fn record_access_in_background(state: &Arc<AppState>, link: &Link, ip: String) {
    let state = state.clone();
    let link_id = link.id;
    let code = link.short_code.clone();
    let accessed_at = chrono::Utc::now().naive_utc();

    tokio::spawn(async move {
        if let Err(e) = db::record_access(&state.db, link_id, &ip, accessed_at).await {
            tracing::error!("failed to record access for '{}': {:?}", code, e);
        }
    });
}

/// Determine the real client IP, preferring common proxy headers.
pub fn extract_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    // X-Forwarded-For can be a comma-separated list; take the first entry.
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(ip) = xff.split(',').next().map(str::trim) {
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        if !real_ip.is_empty() {
            return real_ip.to_owned();
        }
    }

    addr.ip().to_string()
}
