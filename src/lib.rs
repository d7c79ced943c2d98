pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;

pub use routes::{AppState, router};
