// Opaque session and reset token generation

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Lifetime of the `access_token` cookie, in minutes
pub const SESSION_COOKIE_TTL_MINUTES: i64 = 72_000;

/// Password-reset tokens are valid for this many minutes after issuance
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Token service for opaque bearer credentials
///
/// Tokens are 32 random bytes, hex-encoded. Only the SHA-256 digest of a
/// token is ever persisted; the raw value goes to the client (or into a
/// reset email) exactly once.
pub struct TokenService;

impl TokenService {
    /// Generate a new opaque token (64 hex chars)
    pub fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Hash a token with SHA-256 for storage and lookup
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Expiry timestamp for a reset token issued now
    pub fn reset_token_expiry() -> DateTime<Utc> {
        Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES)
    }
}
