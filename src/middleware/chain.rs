//! Ordered composition of interceptors around a terminal handler
//!
//! `chain(h, &[m0, m1, m2])` behaves like `m0(m1(m2(h)))`: the first
//! interceptor sees the request first and can answer without letting anything
//! further in the chain run.

use std::{future::Future, sync::Arc};

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use futures::future::{BoxFuture, FutureExt};

/// A request handler, either terminal or already wrapped by interceptors
pub type Handler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

pub type SharedInterceptor = Arc<dyn Interceptor>;

/// The remainder of the chain as seen by an interceptor
///
/// `run` consumes `self`, so the inner stage is invoked at most once. Dropping
/// `Next` without running it ends the chain.
pub struct Next {
    inner: Handler,
}

impl Next {
    pub async fn run(self, req: Request) -> Response {
        (self.inner)(req).await
    }
}

/// Cross-cutting behaviour wrapped around a handler
pub trait Interceptor: Send + Sync + 'static {
    fn intercept(&self, req: Request, next: Next) -> BoxFuture<'static, Response>;
}

/// Wrap `handler` with `interceptors`, first interceptor outermost
///
/// An empty slice returns `handler` itself.
pub fn chain(handler: Handler, interceptors: &[SharedInterceptor]) -> Handler {
    interceptors
        .iter()
        .rev()
        .fold(handler, |inner, interceptor| {
            let interceptor = Arc::clone(interceptor);
            let wrapped: Handler = Arc::new(move |req: Request| {
                interceptor.intercept(
                    req,
                    Next {
                        inner: Arc::clone(&inner),
                    },
                )
            });
            wrapped
        })
}

struct FromFn<F>(F);

impl<F, Fut> Interceptor for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn intercept(&self, req: Request, next: Next) -> BoxFuture<'static, Response> {
        (self.0)(req, next).boxed()
    }
}

/// Build an interceptor from an async function of `(Request, Next)`
pub fn from_fn<F, Fut>(f: F) -> SharedInterceptor
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(FromFn(f))
}

/// Build a terminal handler from an async function of `Request`
pub fn handler_fn<F, Fut, R>(f: F) -> Handler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    Arc::new(move |req: Request| f(req).map(IntoResponse::into_response).boxed())
}

/// Use an axum handler, extractors included, as the terminal handler
pub fn from_handler<H, T, S>(handler: H, state: S) -> Handler
where
    H: axum::handler::Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    Arc::new(move |req: Request| handler.clone().call(req, state.clone()).boxed())
}

/// Expose a composed handler to an axum `Router`
pub fn endpoint(
    handler: Handler,
) -> impl Fn(Request) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static {
    move |req: Request| handler(req)
}
