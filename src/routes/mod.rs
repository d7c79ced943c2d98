use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    response::Response,
    routing::{get, post},
};
use futures::future::BoxFuture;
use sqlx::SqlitePool;
use storefront_user::{Command, SqliteCredentialStore};

use crate::auth::TokenCodec;
use crate::config::Config;
use crate::middleware::{AuthGate, SharedInterceptor, chain, endpoint, from_handler, request_log};

mod auth;
mod health;
mod me;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub command: Command,
    pub tokens: Arc<TokenCodec>,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let tokens = Arc::new(TokenCodec::from_config(&config.jwt));
        let command = Command::new(SqliteCredentialStore::new(pool.clone()));

        Self {
            config,
            command,
            tokens,
            pool,
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    let public = [request_log()];
    let guarded = [
        request_log(),
        AuthGate::shared(Arc::clone(&app_state.tokens)),
    ];

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route(
            "/api/v1/signup",
            post(compose(auth::register, &app_state, &public)),
        )
        .route(
            "/api/v1/login",
            post(compose(auth::login, &app_state, &public)),
        )
        .route(
            "/api/v1/logout",
            post(compose(auth::logout, &app_state, &public)),
        )
        .route("/api/v1/me", get(compose(me::me, &app_state, &guarded)))
}

/// Wrap an axum handler with `interceptors`, first one outermost
fn compose<H, T>(
    handler: H,
    app_state: &AppState,
    interceptors: &[SharedInterceptor],
) -> impl Fn(Request) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
where
    H: axum::handler::Handler<T, AppState>,
    T: 'static,
{
    endpoint(chain(from_handler(handler, app_state.clone()), interceptors))
}
