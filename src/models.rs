use chrono::NaiveDateTime;

/// A shortened link record from the `links` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    /// Argon2 hash of the link password; `Some` iff the link is protected.
    pub password_hash: Option<String>,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub access_count: i64,
}

impl Link {
    pub fn is_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// A single access event from the `accesses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Access {
    pub id: i64,
    pub link_id: i64,
    pub accessed_at: NaiveDateTime,
    pub ip_address: String,
}
