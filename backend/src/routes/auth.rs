// src/routes/auth.rs

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tracing::info;

use crate::auth::{self, AuthContext};
use crate::error::{found, AppResult, LOGIN_PATH};
use crate::views;
use crate::AppState;

const REGISTER_PATH: &str = "/auth/register";

#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    fn missing_field(&self) -> Option<&'static str> {
        if self.username.is_empty() {
            Some("Username is required.")
        } else if self.password.is_empty() {
            Some("Password is required.")
        } else {
            None
        }
    }
}

pub fn routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(REGISTER_PATH, get(register_form).post(register))
        .route(LOGIN_PATH, get(login_form).post(login))
        .route("/auth/logout", get(logout))
}

async fn register_form(auth: AuthContext) -> Html<String> {
    Html(views::auth_form("Register", REGISTER_PATH, None, "", &auth))
}

async fn register(
    State(state): State<AppState>,
    auth: AuthContext,
    form: Result<Form<Credentials>, FormRejection>,
) -> AppResult<Response> {
    let Form(creds) = form?;

    let error = match creds.missing_field() {
        Some(message) => message.to_string(),
        None => match auth::create_user(&state.db, &creds.username, &creds.password).await? {
            Some(id) => {
                info!("Registered user {} (id={})", creds.username, id);
                return Ok(found(LOGIN_PATH));
            }
            None => format!("User {} is already registered.", creds.username),
        },
    };

    let page = views::auth_form("Register", REGISTER_PATH, Some(&error), &creds.username, &auth);
    Ok(Html(page).into_response())
}

async fn login_form(auth: AuthContext) -> Html<String> {
    Html(views::auth_form("Log In", LOGIN_PATH, None, "", &auth))
}

async fn login(
    State(state): State<AppState>,
    auth: AuthContext,
    form: Result<Form<Credentials>, FormRejection>,
) -> AppResult<Response> {
    let Form(creds) = form?;

    let error = match auth::find_user(&state.db, &creds.username).await? {
        None => "Incorrect username.",
        Some(user) if !auth::verify_password(&user.password, &creds.password) => {
            "Incorrect password."
        }
        Some(user) => {
            let token = auth::create_session(&state.db, user.id).await?;
            info!("User {} logged in", user.username);

            let cookie = auth::session_cookie(&token, state.config.session_cookie_secure);
            return Ok(([(header::SET_COOKIE, cookie)], found("/")).into_response());
        }
    };

    let page = views::auth_form("Log In", LOGIN_PATH, Some(error), &creds.username, &auth);
    Ok(Html(page).into_response())
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(token) = auth::session_token(&headers) {
        auth::delete_session(&state.db, &token).await?;
    }

    Ok((
        [(header::SET_COOKIE, auth::expired_session_cookie())],
        found("/"),
    )
        .into_response())
}
