//! Accounts and sessions.
//!
//! Passwords are hashed with PBKDF2-HMAC-SHA256 and a per-user random salt,
//! on the blocking thread pool so the work factor never stalls request tasks.
//! Sign-in creates a session row; the bearer token handed to the client is
//!
//! - 16 bytes: session id
//! - 32 bytes: HMAC-SHA256(secret, session id)
//!
//! encoded as unpadded URL-safe base64. Signing out deletes the row, which
//! revokes the token even though its signature stays valid.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sqlx::{Pool, Sqlite};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::db::queries::sessions::{self, SessionRow};
use crate::database::db::queries::{summaries, users};
use crate::database::models::{FinancialSummary, User};
use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;
pub const MIN_PASSWORD_LEN: usize = 8;
const TOKEN_LEN: usize = 16 + 32;
const HASH_SCHEME: &str = "pbkdf2-sha256";

/// A signed-in session as returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Authenticator {
    pool: Pool<Sqlite>,
    secret: Vec<u8>,
    ttl: chrono::Duration,
    default_currency: String,
    iterations: u32,
}

impl Authenticator {
    pub fn new(pool: Pool<Sqlite>, secret: Vec<u8>, config: &AppConfig) -> Self {
        let ttl = chrono::Duration::from_std(config.session_ttl)
            .unwrap_or_else(|_| chrono::Duration::hours(24));
        Self {
            pool,
            secret,
            ttl,
            default_currency: config.default_currency.clone(),
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }

    /// Overrides the PBKDF2 work factor for new hashes. Existing hashes keep
    /// the count they were created with.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Registers a user and creates their (zeroed) financial summary.
    pub async fn sign_up(&self, email: &str, password: &str, full_name: Option<&str>) -> AppResult<User> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            full_name: full_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            currency: Some(self.default_currency.clone()),
            created_at: now,
            updated_at: now,
        };
        let credentials = hash_blocking(password.to_string(), self.iterations).await?;

        let mut tx = self.pool.begin().await?;
        users::insert(&mut *tx, &user, &credentials)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict("email is already registered".into()),
                other => other,
            })?;
        summaries::insert(&mut *tx, &FinancialSummary::zeroed(user.id, now)).await?;
        tx.commit().await?;

        tracing::info!(user = %user.id, "user signed up");
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let rejected = || AppError::Unauthorized("invalid email or password".into());

        let email = normalize_email(email).map_err(|_| rejected())?;
        let Some((user, credentials)) = users::get_with_credentials(&self.pool, &email).await? else {
            tracing::warn!("sign-in for unknown email");
            return Err(rejected());
        };
        if !verify_blocking(password.to_string(), credentials).await? {
            tracing::warn!(user = %user.id, "sign-in with wrong password");
            return Err(rejected());
        }

        let now = Utc::now();
        let row = SessionRow {
            id: Uuid::new_v4(),
            user_id: user.id,
            created_at: now,
            expires_at: now + self.ttl,
        };
        sessions::delete_expired(&self.pool, now).await?;
        sessions::insert(&self.pool, &row).await?;

        Ok(Session {
            token: self.encode_token(row.id),
            user,
            expires_at: row.expires_at,
        })
    }

    /// Resolves a bearer token to its user.
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let session_id = self.decode_token(token)?;
        let session = sessions::get(&self.pool, session_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("session not found".into()))?;

        if session.expires_at <= Utc::now() {
            sessions::delete(&self.pool, session_id).await?;
            return Err(AppError::Unauthorized("session expired".into()));
        }

        users::get_by_id(&self.pool, session.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("user no longer exists".into()))
    }

    /// Revokes the session behind `token`. Signing out twice is not an error.
    pub async fn sign_out(&self, token: &str) -> AppResult<()> {
        let session_id = self.decode_token(token)?;
        sessions::delete(&self.pool, session_id).await?;
        Ok(())
    }

    fn sign(&self, data: &[u8]) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(data);
        mac
    }

    fn encode_token(&self, session_id: Uuid) -> String {
        let mut token = Vec::with_capacity(TOKEN_LEN);
        token.extend_from_slice(session_id.as_bytes());
        token.extend_from_slice(&self.sign(session_id.as_bytes()).finalize().into_bytes());
        URL_SAFE_NO_PAD.encode(token)
    }

    fn decode_token(&self, token: &str) -> AppResult<Uuid> {
        let invalid = || AppError::Unauthorized("invalid session token".into());

        let bytes = URL_SAFE_NO_PAD.decode(token.trim()).map_err(|_| invalid())?;
        if bytes.len() != TOKEN_LEN {
            return Err(invalid());
        }
        let (id, signature) = bytes.split_at(16);
        self.sign(id).verify_slice(signature).map_err(|_| invalid())?;

        Uuid::from_slice(id).map_err(|_| invalid())
    }
}

/// Trims and lowercases an email, rejecting anything without a local part
/// and a domain.
pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(AppError::validation("a valid email address is required"))
    }
}

fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut out = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    out
}

async fn hash_blocking(password: String, iterations: u32) -> AppResult<users::Credentials> {
    tokio::task::spawn_blocking(move || hash_password(&password, iterations))
        .await
        .map_err(|e| AppError::Internal(format!("password hashing task failed: {e}")))
}

async fn verify_blocking(password: String, credentials: users::Credentials) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &credentials))
        .await
        .map_err(|e| AppError::Internal(format!("password check task failed: {e}")))
}

pub fn hash_password(password: &str, iterations: u32) -> users::Credentials {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = pbkdf2_sha256(password.as_bytes(), &salt, iterations);

    users::Credentials {
        salt: STANDARD.encode(salt),
        hash: format!("{HASH_SCHEME}${iterations}${}", STANDARD.encode(digest)),
    }
}

pub fn verify_password(password: &str, credentials: &users::Credentials) -> bool {
    let mut parts = credentials.hash.splitn(3, '$');
    let (Some(HASH_SCHEME), Some(iterations), Some(expected)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let (Ok(iterations), Ok(salt), Ok(expected)) = (
        iterations.parse::<u32>(),
        STANDARD.decode(&credentials.salt),
        STANDARD.decode(expected),
    ) else {
        return false;
    };

    let actual = pbkdf2_sha256(password.as_bytes(), &salt, iterations.max(1));
    actual[..].ct_eq(&expected[..]).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pbkdf2_matches_rfc7914_vector() {
        // RFC 7914 section 11, first 32 bytes of PBKDF2-HMAC-SHA256("passwd", "salt", 1).
        let out = pbkdf2_sha256(b"passwd", b"salt", 1);
        let hex: String = out.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn password_hash_verifies() {
        let creds = hash_password("correct horse", 10);
        assert!(creds.hash.starts_with("pbkdf2-sha256$10$"));
        assert!(verify_password("correct horse", &creds));
        assert!(!verify_password("battery staple", &creds));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same password", 2);
        let b = hash_password("same password", 2);
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        let creds = users::Credentials {
            salt: "AAAA".into(),
            hash: "md5$1$abcd".into(),
        };
        assert!(!verify_password("anything", &creds));
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Ada@Example.COM ").unwrap(), "ada@example.com");
        assert!(normalize_email("ada.example.com").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("ada @example.com").is_err());
    }

    #[test]
    fn truncated_digest_never_verifies() {
        let mut creds = hash_password("correct horse", 3);
        creds.hash.truncate(creds.hash.len() - 4);
        assert!(!verify_password("correct horse", &creds));
    }

    #[tokio::test]
    async fn blocking_helpers_round_trip() {
        let creds = hash_blocking("correct horse".into(), 2).await.unwrap();
        assert!(verify_blocking("correct horse".into(), creds.clone()).await.unwrap());
        assert!(!verify_blocking("wrong horse".into(), creds).await.unwrap());
    }
}
