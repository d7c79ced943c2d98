#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use storefront::{
    AppState,
    config::{Config, DatabaseConfig, JwtConfig, ObservabilityConfig, ServerConfig},
};
use temp_dir::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key_minimum_32_characters_long";

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let url = format!("sqlite:{}", dir.child("db.sqlite3").to_string_lossy());

    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: url.to_owned(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: SECRET.to_owned(),
            ttl_hours: 72,
            issuer: "storefront".to_owned(),
            secure_cookie: false,
        },
        observability: ObservabilityConfig::default(),
    };

    let pool = storefront::db::create_pool(&url, 1).await?;
    storefront::db::migrate(&pool).await?;

    let router = storefront::router(AppState::new(config, pool.clone()));

    Ok(TestApp {
        router,
        pool,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> anyhow::Result<Response<Body>> {
        Ok(self.router.clone().oneshot(req).await?)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> anyhow::Result<Response<Body>> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> anyhow::Result<Response<Body>> {
        self.post_json(
            "/api/v1/signup",
            serde_json::json!({"username": username, "email": email, "password": password}),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<Response<Body>> {
        self.post_json(
            "/api/v1/login",
            serde_json::json!({"email": email, "password": password}),
        )
        .await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> anyhow::Result<Response<Body>> {
        self.send(
            Request::builder()
                .uri(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())?,
        )
        .await
    }
}

pub async fn body_json(response: Response<Body>) -> anyhow::Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn set_cookies<B>(response: &Response<B>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_owned)
        .collect()
}

/// `name=value` of the `Set-Cookie` entry for `name`
pub fn cookie_pair<B>(response: &Response<B>, name: &str) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|cookie| cookie.starts_with(&format!("{name}=")))
        .and_then(|cookie| cookie.split(';').next().map(str::to_owned))
}
