use axum::{Extension, Json};

use crate::auth::Identity;

/// GET /api/v1/me - identity published by the gate
pub async fn me(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}
