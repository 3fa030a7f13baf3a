use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

pub type DbPool = SqlitePool;

pub mod models;
pub mod store;

/// Open a pool for `database_url`, creating the file if it does not exist.
///
/// In-memory databases live and die with their connection, so they get
/// exactly one connection that is never recycled.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    pool_options.connect_with(options).await
}

const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS session",
    "DROP TABLE IF EXISTS contact",
    "DROP TABLE IF EXISTS lead",
    "DROP TABLE IF EXISTS user",
];

const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS user (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS session (
        token TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES user (id) ON DELETE CASCADE,
        created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contact (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL,
        rating TEXT NOT NULL,
        created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS lead (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        start_date TEXT,
        end_date TEXT,
        amount REAL,
        probability REAL
    )
    "#,
];

/// Create any missing tables. Existing data is left alone.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Drop every table and create them again (MODE=init-db).
pub async fn reset_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    for statement in DROP_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    ensure_schema(pool).await?;
    info!("Initialized the database");
    Ok(())
}
