// src/auth/mod.rs
//
// Session-cookie login. A session is a random token stored in the
// `session` table; the browser only ever holds the token. Sessions older
// than SESSION_TTL_SECS are ignored and purged on the next login.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::models::User;
use crate::db::DbPool;
use crate::entities::Access;
use crate::error::{AppError, AppResult};
use crate::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Seven days.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Who is making the request. Passed explicitly into every handler.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user: Option<User>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The auth gate: anonymous callers get `LoginRequired` (302 to the login page).
    pub fn require_login(&self) -> AppResult<&User> {
        self.user.as_ref().ok_or(AppError::LoginRequired)
    }

    /// Apply an entity's access policy before any write-path work.
    pub fn check(&self, access: Access) -> AppResult<()> {
        match access {
            Access::Public => Ok(()),
            Access::LoginRequired => self.require_login().map(|_| ()),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(AuthContext::anonymous());
        };

        let user = load_session_user(&state.db, &token).await?;
        if user.is_none() {
            warn!("Ignoring unknown or expired session token");
        }

        Ok(AuthContext { user })
    }
}

/// Pull the `session` value out of the `Cookie` header(s), if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, SESSION_TTL_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

// ----------------------------
// Passwords
// ----------------------------

/// Argon2id with a fresh random salt, encoded as a PHC string.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(AppError::PasswordHash)?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(AppError::PasswordHash)
}

/// False for a wrong password and for anything that isn't a PHC string.
pub fn verify_password(stored: &str, password: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// ----------------------------
// Users & sessions
// ----------------------------

pub async fn find_user(pool: &DbPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, username, password FROM user WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Insert a user. Returns `Ok(None)` when the username is already taken.
pub async fn create_user(pool: &DbPool, username: &str, password: &str) -> AppResult<Option<i64>> {
    let hash = hash_password(password)?;
    let result = sqlx::query("INSERT INTO user (username, password) VALUES (?, ?)")
        .bind(username)
        .bind(hash)
        .execute(pool)
        .await;

    match result {
        Ok(done) => Ok(Some(done.last_insert_rowid())),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// SQLite `datetime('now', ?)` modifier for the oldest live session.
fn session_cutoff() -> String {
    format!("-{} seconds", SESSION_TTL_SECS)
}

/// Start a session for `user_id`, dropping any expired ones first.
pub async fn create_session(pool: &DbPool, user_id: i64) -> Result<String, sqlx::Error> {
    let purged = sqlx::query("DELETE FROM session WHERE created <= datetime('now', ?)")
        .bind(session_cutoff())
        .execute(pool)
        .await?
        .rows_affected();
    if purged > 0 {
        info!("Purged {} expired session(s)", purged);
    }

    let token = Uuid::new_v4().simple().to_string();

    sqlx::query("INSERT INTO session (token, user_id) VALUES (?, ?)")
        .bind(&token)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(token)
}

pub async fn load_session_user(pool: &DbPool, token: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT user.id, user.username, user.password
        FROM session
        JOIN user ON user.id = session.user_id
        WHERE session.token = ?
          AND session.created > datetime('now', ?)
        "#,
    )
    .bind(token)
    .bind(session_cutoff())
    .fetch_optional(pool)
    .await
}

pub async fn delete_session(pool: &DbPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM session WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}
