pub mod auth;
pub mod chain;
pub mod logging;

pub use auth::AuthGate;
pub use chain::{
    Handler, Interceptor, Next, SharedInterceptor, chain, endpoint, from_fn, from_handler,
    handler_fn,
};
pub use logging::{RequestId, request_log};
