//! Stateless session authentication
//!
//! Sessions are HS256 JWTs carried in an HTTP-only cookie. The server keeps no
//! session store: a token is valid when its signature, issuer and expiry check
//! out.

pub mod identity;
pub mod token;

pub use identity::Identity;
pub use token::{IssuedToken, SessionClaims, TokenCodec, TokenError};

/// Cookie carrying the signed session token
pub const TOKEN_COOKIE: &str = "token";

/// Cookie re-emitted by the gate with the verified username
pub const USERNAME_COOKIE: &str = "username";

/// Cookie re-emitted by the gate with the verified user id
pub const USER_ID_COOKIE: &str = "userID";
