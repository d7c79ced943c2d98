//! Authentication gate
//!
//! Extracts the session token, verifies it and republishes the verified
//! identity for everything further down the chain. A request that fails any
//! step is answered with 401 here and never forwarded.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{
        HeaderMap, HeaderValue,
        header::{AUTHORIZATION, COOKIE},
    },
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use futures::future::{BoxFuture, FutureExt};

use super::chain::{Interceptor, Next, SharedInterceptor};
use crate::auth::{Identity, TOKEN_COOKIE, TokenCodec, USER_ID_COOKIE, USERNAME_COOKIE};
use crate::error::AppError;

pub struct AuthGate {
    tokens: Arc<TokenCodec>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenCodec>) -> Self {
        Self { tokens }
    }

    pub fn shared(tokens: Arc<TokenCodec>) -> SharedInterceptor {
        Arc::new(Self::new(tokens))
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AppError> {
        let Some(token) = extract_token(headers) else {
            tracing::warn!("No session token found in request");
            return Err(AppError::Unauthorized("missing session token".to_owned()));
        };

        let claims = self.tokens.verify(&token).map_err(|e| {
            tracing::warn!(error = %e, "Rejected session token");
            AppError::from(e)
        })?;

        Ok(Identity::from(claims))
    }
}

impl Interceptor for AuthGate {
    fn intercept(&self, mut req: Request, next: Next) -> BoxFuture<'static, Response> {
        let identity = match self.authenticate(req.headers()) {
            Ok(identity) => identity,
            Err(e) => return futures::future::ready(e.into_response()).boxed(),
        };

        tracing::debug!(user_id = %identity.user_id, "Request authenticated");

        strip_identity_cookies(req.headers_mut());
        req.extensions_mut().insert(identity.clone());

        async move {
            let response = next.run(req).await;

            let jar = CookieJar::new()
                .add(identity_cookie(USERNAME_COOKIE, identity.username))
                .add(identity_cookie(USER_ID_COOKIE, identity.user_id));

            (jar, response).into_response()
        }
        .boxed()
    }
}

/// Token from the `token` cookie, or else from `Authorization: Bearer`
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(TOKEN_COOKIE).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_owned());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

/// Drop client-supplied identity cookies so handlers only ever see the
/// identity derived from the verified token.
fn strip_identity_cookies(headers: &mut HeaderMap) {
    let kept: Vec<String> = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let name = pair.split_once('=').map_or(*pair, |(name, _)| name).trim();
            name != USERNAME_COOKIE && name != USER_ID_COOKIE
        })
        .map(str::to_owned)
        .collect();

    headers.remove(COOKIE);

    if kept.is_empty() {
        return;
    }

    if let Ok(value) = HeaderValue::from_str(&kept.join("; ")) {
        headers.insert(COOKIE, value);
    }
}

fn identity_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value)).path("/").http_only(true).build()
}
