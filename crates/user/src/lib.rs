//! Credential ownership for storefront: the user model, password hashing,
//! the storage collaborator and the register/login commands built on them.

mod command;
mod error;
pub mod password;
mod store;
mod types;

pub use command::{Command, LoginInput, RegisterInput};
pub use error::{UserError, UserResult};
pub use store::{CredentialStore, SqliteCredentialStore};
pub use types::{Credential, Role};
