// src/db/store.rs
//
// Single-statement CRUD for any `Entity`. Each call runs one statement on
// a pooled connection and commits immediately; nothing here retries.

use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;
use tracing::info;

use crate::db::DbPool;
use crate::entities::{Entity, FieldValue, Writable};
use crate::error::{AppError, AppResult};

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_value(query: SqliteQuery<'_>, value: FieldValue) -> SqliteQuery<'_> {
    match value {
        FieldValue::Text(text) => query.bind(text),
        FieldValue::OptText(text) => query.bind(text),
        FieldValue::OptReal(number) => query.bind(number),
    }
}

fn writable_columns<E: Entity>() -> Vec<&'static str> {
    E::FIELDS.iter().map(|field| field.name).collect()
}

/// Every row, newest first per the entity's ordering. Unpaginated.
pub async fn fetch_all<E: Entity>(pool: &DbPool) -> Result<Vec<E::Row>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        E::COLUMNS,
        E::TABLE,
        E::ORDER_BY
    );

    sqlx::query_as::<_, E::Row>(&sql).fetch_all(pool).await
}

pub async fn fetch_one<E: Entity>(pool: &DbPool, id: i64) -> Result<Option<E::Row>, sqlx::Error> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", E::COLUMNS, E::TABLE);

    sqlx::query_as::<_, E::Row>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// The one existence check used before showing, updating, or deleting a row.
pub async fn get_or_not_found<E: Entity>(pool: &DbPool, id: i64) -> AppResult<E::Row> {
    fetch_one::<E>(pool, id)
        .await?
        .ok_or(AppError::NotFound {
            entity: E::LABEL,
            id,
        })
}

/// Insert a validated record and return its new id.
pub async fn insert<E: Entity>(pool: &DbPool, record: E::Record) -> Result<i64, sqlx::Error> {
    let columns = writable_columns::<E>();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        E::TABLE,
        columns.join(", "),
        placeholders
    );

    let query = record
        .into_values()
        .into_iter()
        .fold(sqlx::query(&sql), bind_value);
    let id = query.execute(pool).await?.last_insert_rowid();

    info!("Inserted {} id={}", E::TABLE, id);
    Ok(id)
}

/// Overwrite every writable column of row `id`.
pub async fn update<E: Entity>(pool: &DbPool, id: i64, record: E::Record) -> Result<(), sqlx::Error> {
    let assignments = writable_columns::<E>()
        .iter()
        .map(|column| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("UPDATE {} SET {} WHERE id = ?", E::TABLE, assignments);

    record
        .into_values()
        .into_iter()
        .fold(sqlx::query(&sql), bind_value)
        .bind(id)
        .execute(pool)
        .await?;

    info!("Updated {} id={}", E::TABLE, id);
    Ok(())
}

pub async fn delete<E: Entity>(pool: &DbPool, id: i64) -> Result<(), sqlx::Error> {
    let sql = format!("DELETE FROM {} WHERE id = ?", E::TABLE);

    sqlx::query(&sql).bind(id).execute(pool).await?;

    info!("Deleted {} id={}", E::TABLE, id);
    Ok(())
}
