use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use crate::{
    Credential, CredentialStore, Role, UserError, UserResult,
    password::{hash_password, verify_dummy, verify_password},
};

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid username regex"));

#[derive(Validate, Deserialize)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 32), regex(path = *USERNAME_REGEX))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Validate, Deserialize)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Register and login on top of a [`CredentialStore`]
#[derive(Clone)]
pub struct Command {
    store: Arc<dyn CredentialStore>,
}

impl Command {
    pub fn new(store: impl CredentialStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Hashes the password and persists a new credential with the `user` role.
    ///
    /// Nothing is written unless validation and hashing both succeed.
    pub async fn register(&self, input: RegisterInput) -> UserResult<Credential> {
        input.validate()?;

        let password_hash = hash_password(&input.password)?;

        let credential = Credential {
            id: Ulid::new().to_string(),
            username: input.username,
            email: normalize_email(&input.email),
            password_hash,
            role: Role::User,
        };

        self.store.insert(&credential).await?;

        tracing::info!(user_id = %credential.id, "Credential registered");

        Ok(credential)
    }

    /// Checks an email/password pair against the stored credential.
    ///
    /// Unknown email, lookup failure and wrong password all surface as
    /// [`UserError::InvalidCredentials`].
    pub async fn login(&self, input: LoginInput) -> UserResult<Credential> {
        input.validate()?;

        let email = normalize_email(&input.email);

        let credential = match self.store.find_by_email(&email).await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                tracing::warn!(email = %email, "Login attempt for unknown email");
                verify_dummy(&input.password);
                return Err(UserError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(error = %e, "Credential lookup failed during login");
                verify_dummy(&input.password);
                return Err(UserError::InvalidCredentials);
            }
        };

        if !verify_password(&credential.password_hash, &input.password) {
            tracing::warn!(user_id = %credential.id, "Login attempt with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        Ok(credential)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
