use std::time::Instant;

use axum::{extract::Request, http::HeaderValue};
use tracing::Instrument;
use ulid::Ulid;

use super::chain::{Next, SharedInterceptor, from_fn};

/// Identifier assigned to each request by [`request_log`]
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Interceptor tagging each request with an id and logging its outcome
///
/// Headers are not logged: they carry the session cookie.
pub fn request_log() -> SharedInterceptor {
    from_fn(|mut req: Request, next: Next| async move {
        let request_id = Ulid::new().to_string();
        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            uri = %req.uri(),
        );

        span.in_scope(|| tracing::info!("Request received"));
        req.extensions_mut().insert(RequestId(request_id.to_owned()));

        let started = Instant::now();
        let mut response = next.run(req).instrument(span.clone()).await;

        span.in_scope(|| {
            tracing::info!(
                status = response.status().as_u16(),
                latency_ms = started.elapsed().as_millis() as u64,
                "Request completed"
            )
        });

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    })
}
