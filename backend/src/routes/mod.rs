// src/routes/mod.rs

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::json;
use tracing::error;

use crate::auth::AuthContext;
use crate::entities::{ContactEntity, LeadEntity};
use crate::{views, AppState};

pub mod auth;
pub mod crud;

/// Full application router: home, health, auth, and one CRUD block per entity.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(home))
        .route("/health", get(health_check));

    let router = auth::routes(router);
    let router = crud::routes::<ContactEntity>(router);
    let router = crud::routes::<LeadEntity>(router);

    router
        .layer(middleware::from_fn(crate::middleware::log_requests))
        .with_state(state)
}

async fn home(auth: AuthContext) -> Html<String> {
    Html(views::home(&auth))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    // Simple DB check: SELECT 1
    if let Err(err) = sqlx::query("SELECT 1").execute(&state.db).await {
        error!("DB health check failed: {:?}", err);
        return Json(json!({
            "status": "error",
            "db": "down",
        }));
    }

    Json(json!({
        "status": "ok",
        "env": format!("{:?}", state.config.env),
    }))
}
