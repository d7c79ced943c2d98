mod helpers;

use axum::{body::Body, http::{Request, StatusCode}};
use helpers::{body_json, setup_test_app};

#[tokio::test]
async fn test_probes() -> anyhow::Result<()> {
    let app = setup_test_app().await?;

    let response = app
        .send(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?["status"], "ok");

    let response = app
        .send(Request::builder().uri("/ready").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?["status"], "ready");

    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_not_found() -> anyhow::Result<()> {
    let app = setup_test_app().await?;

    let response = app
        .send(Request::builder().uri("/api/v1/products").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
