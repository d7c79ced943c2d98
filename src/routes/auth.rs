//! Session lifecycle: signup, login and logout

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Redirect,
};
use axum_extra::extract::{CookieJar, cookie::Cookie};
use serde::Serialize;
use storefront_user::{LoginInput, RegisterInput};
use time::OffsetDateTime;

use super::AppState;
use crate::auth::{Identity, TOKEN_COOKIE, USER_ID_COOKIE, USERNAME_COOKIE};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub username: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: u64,
}

/// POST /api/v1/signup
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Identity>), AppError> {
    let Json(input) = payload?;

    let credential = state.command.register(input).await?;

    Ok((StatusCode::CREATED, Json(Identity::from(&credential))))
}

/// POST /api/v1/login
///
/// The session cookie expires together with the token it carries.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<LoginResponse>), AppError> {
    let Json(input) = payload?;

    let credential = state.command.login(input).await?;
    let issued = state.tokens.issue(&Identity::from(&credential))?;

    let expires = i64::try_from(issued.claims.exp)
        .ok()
        .and_then(|exp| OffsetDateTime::from_unix_timestamp(exp).ok())
        .ok_or_else(|| {
            AppError::InternalError(format!("unrepresentable expiry {}", issued.claims.exp))
        })?;

    let cookie = Cookie::build((TOKEN_COOKIE, issued.token))
        .path("/")
        .http_only(true)
        .secure(state.config.jwt.secure_cookie)
        .expires(expires)
        .build();

    tracing::info!(user_id = %credential.id, "User logged in successfully");

    Ok((
        StatusCode::ACCEPTED,
        jar.add(cookie),
        Json(LoginResponse {
            user_id: credential.id,
            username: credential.username,
            expires_at: issued.claims.exp,
        }),
    ))
}

/// POST /api/v1/logout
///
/// Only the client's cookies are cleared; an already issued token stays
/// valid until it expires.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let secure = state.config.jwt.secure_cookie;
    let jar = [TOKEN_COOKIE, USERNAME_COOKIE, USER_ID_COOKIE]
        .into_iter()
        .fold(jar, |jar, name| jar.add(expired_cookie(name, secure)));

    (jar, Redirect::to("/api/v1/login"))
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .max_age(time::Duration::ZERO)
        .build()
}
