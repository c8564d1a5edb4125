//! The gatekeeper: expiry and password checks shared by the redirect and
//! analytics paths.

use crate::{auth, db, error::LinkError, models::Link};
use sqlx::SqlitePool;

/// Authorize access to a short link.
///
/// Checks run in a fixed order: existence, then expiry, then password.
/// Expiry always wins — an expired link is refused even when the correct
/// password is supplied.
pub async fn authorize(
    pool: &SqlitePool,
    code: &str,
    password: Option<&str>,
) -> Result<Link, LinkError> {
    let link = db::get_link_by_code(pool, code)
        .await?
        .ok_or(LinkError::NotFound)?;

    if chrono::Utc::now().naive_utc() > link.expires_at {
        tracing::info!("short link '{}' has expired", code);
        return Err(LinkError::Expired);
    }

    if let Some(hash) = &link.password_hash {
        match password {
            None => return Err(LinkError::PasswordRequired),
            Some(candidate) if !auth::verify_password(hash, candidate) => {
                tracing::info!("incorrect password for short link '{}'", code);
                return Err(LinkError::WrongPassword);
            }
            Some(_) => {}
        }
    }

    Ok(link)
}
