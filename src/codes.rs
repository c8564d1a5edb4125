//! Short-code generation.

use crate::db;
use sqlx::SqlitePool;

/// Length of a freshly generated short code.
pub const CODE_LEN: usize = 8;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random alphanumeric string of the given length.
pub fn random_code(len: usize) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Generate a random short code that doesn't already exist in the database.
/// Tries up to 10 times at the standard length, then switches to a longer
/// code where collisions are vanishingly unlikely. Every candidate is
/// checked against the store; the UNIQUE constraint is the final guard.
pub async fn generate_unique_code(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    for _ in 0..10 {
        let code = random_code(CODE_LEN);
        if db::get_link_by_code(pool, &code).await?.is_none() {
            return Ok(code);
        }
    }

    loop {
        let code = random_code(CODE_LEN + 4);
        if db::get_link_by_code(pool, &code).await?.is_none() {
            return Ok(code);
        }
    }
}
