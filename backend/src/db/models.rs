use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Kept exactly as submitted.
    pub rating: String,
    pub created: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Lead {
    pub id: i64,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub amount: Option<f64>,
    pub probability: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2id PHC string (`$argon2id$v=19$...`)
    pub password: String,
}
