use axum::extract::Request;
use serde::Serialize;
use storefront_user::{Credential, Role};

use super::SessionClaims;

/// Verified identity of the caller
///
/// Only the authentication gate inserts this into request extensions, always
/// from a token it has just verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    /// Identity published by the gate for this request, if any
    pub fn from_request(req: &Request) -> Option<&Identity> {
        req.extensions().get::<Identity>()
    }
}

impl From<&Credential> for Identity {
    fn from(credential: &Credential) -> Self {
        Self {
            user_id: credential.id.to_owned(),
            username: credential.username.to_owned(),
            email: credential.email.to_owned(),
            role: credential.role,
        }
    }
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        }
    }
}
