// src/routes/crud.rs
//
// Handlers shared by every `Entity`:
//
//   GET       {PATH}/               list
//   GET/POST  {PATH}/create         form / insert
//   GET/POST  {PATH}/:id/update     form / overwrite
//   POST      {PATH}/:id/delete     delete
//
// Writes end in a 302 to the collection view. Validation failures
// re-render the form with status 200 and touch nothing. A non-numeric id
// is a 404, but only after the auth gate has run.

use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use tracing::info;

use crate::auth::AuthContext;
use crate::db::store;
use crate::entities::{Entity, FormData};
use crate::error::{found, AppResult};
use crate::views;
use crate::AppState;

/// Add the CRUD routes for `E` to `router`.
pub fn routes<E: Entity>(router: Router<AppState>) -> Router<AppState> {
    let base = E::PATH;

    router
        .route(base, get(to_collection::<E>))
        .route(&format!("{}/", base), get(index::<E>))
        .route(&format!("{}/create", base), get(create_form::<E>).post(create::<E>))
        .route(
            &format!("{}/:id/update", base),
            get(update_form::<E>).post(update::<E>),
        )
        .route(&format!("{}/:id/delete", base), post(delete::<E>))
}

async fn to_collection<E: Entity>() -> Response {
    found(&E::collection_path())
}

pub async fn index<E: Entity>(
    State(state): State<AppState>,
    auth: AuthContext,
) -> AppResult<Html<String>> {
    let rows = store::fetch_all::<E>(&state.db).await?;
    Ok(Html(views::entity_index::<E>(&rows, &auth)))
}

pub async fn create_form<E: Entity>(auth: AuthContext) -> AppResult<Html<String>> {
    auth.check(E::ACCESS)?;
    Ok(Html(views::entity_form::<E>(
        None,
        &FormData::default(),
        None,
        &auth,
    )))
}

pub async fn create<E: Entity>(
    State(state): State<AppState>,
    auth: AuthContext,
    form: Result<Form<FormData>, FormRejection>,
) -> AppResult<Response> {
    auth.check(E::ACCESS)?;
    let Form(form) = form?;

    match E::validate(&form) {
        Ok(record) => {
            store::insert::<E>(&state.db, record).await?;
            Ok(found(&E::collection_path()))
        }
        Err(errors) => {
            info!("Rejected new {}: {}", E::TABLE, errors);
            let page = views::entity_form::<E>(None, &form, Some(&errors), &auth);
            Ok(Html(page).into_response())
        }
    }
}

pub async fn update_form<E: Entity>(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Html<String>> {
    auth.check(E::ACCESS)?;
    let Path(id) = path?;
    let row = store::get_or_not_found::<E>(&state.db, id).await?;

    Ok(Html(views::entity_form::<E>(
        Some(id),
        &E::form_from_row(&row),
        None,
        &auth,
    )))
}

/// The existence check runs before the body is looked at, so a missing id
/// is a 404 whatever was submitted.
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<i64>, PathRejection>,
    form: Result<Form<FormData>, FormRejection>,
) -> AppResult<Response> {
    auth.check(E::ACCESS)?;
    let Path(id) = path?;
    let existing = store::get_or_not_found::<E>(&state.db, id).await?;
    let Form(form) = form?;

    match E::validate(&form) {
        Ok(record) => {
            store::update::<E>(&state.db, id, record).await?;
            Ok(found(&E::collection_path()))
        }
        Err(errors) => {
            info!("Rejected update of {} id={}: {}", E::TABLE, id, errors);
            let values = E::merge_submitted(&existing, &form);
            let page = views::entity_form::<E>(Some(id), &values, Some(&errors), &auth);
            Ok(Html(page).into_response())
        }
    }
}

pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    auth: AuthContext,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Response> {
    auth.check(E::ACCESS)?;
    let Path(id) = path?;
    store::get_or_not_found::<E>(&state.db, id).await?;
    store::delete::<E>(&state.db, id).await?;

    Ok(found(&E::collection_path()))
}
