use crate::models::{Access, Link};
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

// ── Links ──────────────────────────────────────────────────────────────────

/// Insert a new link and return the newly created row.
pub async fn create_link(
    pool: &SqlitePool,
    short_code: &str,
    original_url: &str,
    password_hash: Option<&str>,
    expires_at: NaiveDateTime,
) -> Result<Link, sqlx::Error> {
    let id = sqlx::query(
        "INSERT INTO links (short_code, original_url, password_hash, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(short_code)
    .bind(original_url)
    .bind(password_hash)
    .bind(chrono::Utc::now().naive_utc())
    .bind(expires_at)
    .execute(pool)
    .await?
    .last_insert_rowid();

    let link: Link = sqlx::query_as(
        "SELECT id, short_code, original_url, password_hash, created_at, expires_at, access_count
         FROM links WHERE id = ?1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(link)
}

/// Fetch a single link by its short code.
pub async fn get_link_by_code(
    pool: &SqlitePool,
    short_code: &str,
) -> Result<Option<Link>, sqlx::Error> {
    let link: Option<Link> = sqlx::query_as(
        "SELECT id, short_code, original_url, password_hash, created_at, expires_at, access_count
         FROM links WHERE short_code = ?1",
    )
    .bind(short_code)
    .fetch_optional(pool)
    .await?;

    Ok(link)
}

// ── Accesses ───────────────────────────────────────────────────────────────

/// Record one successful resolution: append to the access log and bump the
/// link's counter. Both writes run in a single transaction so the counter
/// always equals the log length, even under concurrent resolutions.
pub async fn record_access(
    pool: &SqlitePool,
    link_id: i64,
    ip_address: &str,
    accessed_at: NaiveDateTime,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO accesses (link_id, accessed_at, ip_address) VALUES (?1, ?2, ?3)")
        .bind(link_id)
        .bind(accessed_at)
        .bind(ip_address)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE links SET access_count = access_count + 1 WHERE id = ?1")
        .bind(link_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

/// Fetch the full access log for one link, oldest first.
pub async fn get_accesses(pool: &SqlitePool, link_id: i64) -> Result<Vec<Access>, sqlx::Error> {
    let accesses: Vec<Access> = sqlx::query_as(
        "SELECT id, link_id, accessed_at, ip_address
         FROM accesses
         WHERE link_id = ?1
         ORDER BY accessed_at ASC, id ASC",
    )
    .bind(link_id)
    .fetch_all(pool)
    .await?;

    Ok(accesses)
}
