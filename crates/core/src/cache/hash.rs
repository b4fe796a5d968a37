//! Query-derived cache key generation.

use sha2::{Digest, Sha256};

/// Compute a logical cache key for a SQL statement and its bound parameters.
///
/// Every field is length-prefixed, so no split of the same bytes between the
/// statement and its parameters hashes alike.
pub fn query_key(sql: &str, params: &[serde_json::Value]) -> String {
    let mut hasher = Sha256::new();
    update_framed(&mut hasher, sql.as_bytes());
    hasher.update((params.len() as u64).to_le_bytes());
    for param in params {
        update_framed(&mut hasher, param.to_string().as_bytes());
    }
    hex::encode(hasher.finalize())
}

fn update_framed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
