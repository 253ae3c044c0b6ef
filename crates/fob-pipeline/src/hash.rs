//! Content hashing for cache-busted filenames.

use std::path::Path;

/// Default number of hex characters embedded in hashed filenames.
pub const DEFAULT_HASH_LENGTH: usize = 10;

/// Hex digest prefix of `bytes`, `len` characters long (max 64).
pub fn content_hash(bytes: &[u8], len: usize) -> String {
    let hex = blake3::hash(bytes).to_hex();
    hex[..len.min(hex.len())].to_string()
}

/// Insert `-<hash>` before the extension: `app.css` -> `app-<hash>.css`.
///
/// Names without an extension get the hash appended.
pub fn hashed_filename(name: &str, hash: &str) -> String {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, hash, ext),
        None => format!("{}-{}", stem, hash),
    }
}
