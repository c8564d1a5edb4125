//! Integration tests for the link store, code generator, gatekeeper, and
//! access recorder, run against an in-memory SQLite database with the
//! embedded migrations applied.

use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use shortly::error::LinkError;
use shortly::models::Link;
use shortly::{auth, codes, db, gate};

async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}

/// Create a link the way the shorten handler does: fresh unique code,
/// hashed password, expiry relative to now.
async fn create(
    pool: &SqlitePool,
    original_url: &str,
    expiry_hours: i64,
    password: Option<&str>,
) -> Link {
    let code = codes::generate_unique_code(pool).await.unwrap();
    let password_hash = password.map(|p| auth::hash_password(p).unwrap());
    let expires_at = (Utc::now() + Duration::hours(expiry_hours)).naive_utc();

    db::create_link(pool, &code, original_url, password_hash.as_deref(), expires_at)
        .await
        .unwrap()
}

#[tokio::test]
async fn create_then_get_roundtrips_the_original_url() {
    let pool = test_pool().await;

    let link = create(&pool, "https://example.com/some/page", 24, None).await;
    assert_eq!(link.short_code.len(), codes::CODE_LEN);
    assert_eq!(link.access_count, 0);
    assert!(!link.is_protected());

    let fetched = db::get_link_by_code(&pool, &link.short_code)
        .await
        .unwrap()
        .expect("link should exist");
    assert_eq!(fetched.original_url, "https://example.com/some/page");
    assert_eq!(fetched.id, link.id);
}

#[tokio::test]
async fn unknown_code_is_absent() {
    let pool = test_pool().await;
    assert!(db::get_link_by_code(&pool, "nosuchcd")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn generated_codes_are_unique_across_creations() {
    let pool = test_pool().await;

    let mut seen = std::collections::HashSet::new();
    for i in 0..50 {
        let link = create(&pool, &format!("https://example.com/{i}"), 24, None).await;
        assert!(seen.insert(link.short_code), "duplicate short code generated");
    }
}

#[tokio::test]
async fn authorize_returns_the_original_url() {
    let pool = test_pool().await;
    let link = create(&pool, "https://example.com", 1, None).await;

    let authorized = gate::authorize(&pool, &link.short_code, None).await.unwrap();
    assert_eq!(authorized.original_url, "https://example.com");
}

#[tokio::test]
async fn missing_link_is_not_found() {
    let pool = test_pool().await;
    let err = gate::authorize(&pool, "abcd1234", None).await.unwrap_err();
    assert!(matches!(err, LinkError::NotFound));
}

#[tokio::test]
async fn zero_expiry_is_immediately_expired() {
    let pool = test_pool().await;
    let link = create(&pool, "https://example.com", 0, None).await;

    let err = gate::authorize(&pool, &link.short_code, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LinkError::Expired));
}

#[tokio::test]
async fn expired_link_is_refused_even_with_the_correct_password() {
    let pool = test_pool().await;
    let link = create(&pool, "https://example.com", 0, Some("secret")).await;

    let err = gate::authorize(&pool, &link.short_code, Some("secret"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkError::Expired));
}

#[tokio::test]
async fn password_gate_covers_all_outcomes() {
    let pool = test_pool().await;
    let link = create(&pool, "https://example.com", 1, Some("secret")).await;

    let err = gate::authorize(&pool, &link.short_code, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LinkError::PasswordRequired));

    let err = gate::authorize(&pool, &link.short_code, Some("wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkError::WrongPassword));

    let authorized = gate::authorize(&pool, &link.short_code, Some("secret"))
        .await
        .unwrap();
    assert_eq!(authorized.original_url, "https://example.com");
}

#[tokio::test]
async fn access_count_matches_log_length_and_order() {
    let pool = test_pool().await;
    let link = create(&pool, "https://example.com", 24, None).await;

    let base = Utc::now().naive_utc();
    let ips = ["203.0.113.1", "198.51.100.2", "203.0.113.1"];
    for (i, ip) in ips.iter().enumerate() {
        db::record_access(&pool, link.id, ip, base + Duration::seconds(i as i64))
            .await
            .unwrap();
    }

    let fetched = db::get_link_by_code(&pool, &link.short_code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.access_count, 3);

    let log = db::get_accesses(&pool, link.id).await.unwrap();
    assert_eq!(log.len(), 3);
    for pair in log.windows(2) {
        assert!(pair[0].accessed_at <= pair[1].accessed_at);
    }
    let logged_ips: Vec<&str> = log.iter().map(|a| a.ip_address.as_str()).collect();
    assert_eq!(logged_ips, ips);
}

#[tokio::test]
async fn access_log_is_scoped_to_its_link() {
    let pool = test_pool().await;
    let first = create(&pool, "https://example.com/a", 24, None).await;
    let second = create(&pool, "https://example.com/b", 24, None).await;

    let now = Utc::now().naive_utc();
    db::record_access(&pool, first.id, "203.0.113.1", now)
        .await
        .unwrap();

    assert_eq!(db::get_accesses(&pool, first.id).await.unwrap().len(), 1);
    assert!(db::get_accesses(&pool, second.id).await.unwrap().is_empty());

    let second = db::get_link_by_code(&pool, &second.short_code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.access_count, 0);
}
