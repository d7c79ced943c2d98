//! Session token issuance and verification

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use storefront_user::Role;
use thiserror::Error;
use time::OffsetDateTime;

use super::Identity;
use crate::config::JwtConfig;

/// The only algorithm tokens are signed and accepted with
const ALGORITHM: Algorithm = Algorithm::HS256;
const ALGORITHM_NAME: &str = "HS256";

/// JOSE header as sent, before `jsonwebtoken` narrows `alg` to the algorithms it knows
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Claims embedded in every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Issuer
    pub iss: String,
    /// Issued at (UTC timestamp)
    pub iat: u64,
    /// Expiration time (UTC timestamp)
    pub exp: u64,
}

/// A freshly signed token together with the claims it carries
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,

    #[error("token expired")]
    Expired,

    #[error("malformed token")]
    Malformed,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies session tokens with a server-held HMAC secret
///
/// Built once at startup and shared read-only between requests.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.set_issuer(&[issuer.as_str()]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer,
            ttl,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.as_bytes(), config.ttl(), &config.issuer)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `identity` that expires `ttl` from now
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, TokenError> {
        let now = now_timestamp();
        let claims = SessionClaims {
            user_id: identity.user_id.to_owned(),
            username: identity.username.to_owned(),
            email: identity.email.to_owned(),
            role: identity.role,
            iss: self.issuer.to_owned(),
            iat: now,
            exp: now.saturating_add(self.ttl.as_secs()),
        };

        let token = self.sign(&claims)?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify signature, algorithm, issuer and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        if header_algorithm(token)? != ALGORITHM_NAME {
            return Err(TokenError::Invalid);
        }

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidSignature
                | ErrorKind::InvalidIssuer
                | ErrorKind::ImmatureSignature => TokenError::Invalid,
                _ => TokenError::Malformed,
            })?;

        // The decoder tolerates `exp == now`; a session ends at its expiry instant.
        if token_data.claims.exp <= now_timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }

    fn sign(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

/// `alg` of the token header; `none` and unknown names are returned as is
fn header_algorithm(token: &str) -> Result<String, TokenError> {
    let segment = token.split('.').next().unwrap_or_default();
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

    Ok(header.alg)
}

fn now_timestamp() -> u64 {
    OffsetDateTime::now_utc().unix_timestamp().max(0) as u64
}
