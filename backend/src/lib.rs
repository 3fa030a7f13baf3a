//! Flaskr backend: contacts and sales leads managed through HTML forms,
//! stored in SQLite.

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod views;

use config::Config;
use db::DbPool;

pub use routes::build_router;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
}
