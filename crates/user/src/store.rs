use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use storefront_db::table::User;
use time::OffsetDateTime;

use crate::{Credential, Role, UserError, UserResult};

/// Storage collaborator for credentials
///
/// Authentication only needs these two operations; everything else about
/// user records belongs to the CRUD side of the application.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> UserResult<Option<Credential>>;

    /// Fails with [`UserError::EmailAlreadyExists`] when the email is taken.
    async fn insert(&self, credential: &Credential) -> UserResult<()>;
}

#[derive(FromRow)]
struct CredentialRow {
    id: String,
    username: String,
    email: String,
    password: String,
    role: sqlx::types::Text<Role>,
}

impl From<CredentialRow> for Credential {
    fn from(row: CredentialRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password,
            role: row.role.0,
        }
    }
}

#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_by_email(&self, email: &str) -> UserResult<Option<Credential>> {
        let statement = Query::select()
            .columns([
                User::Id,
                User::Username,
                User::Email,
                User::Password,
                User::Role,
            ])
            .from(User::Table)
            .and_where(Expr::col(User::Email).eq(email))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, CredentialRow, _>(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Credential::from))
    }

    async fn insert(&self, credential: &Credential) -> UserResult<()> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let statement = Query::insert()
            .into_table(User::Table)
            .columns([
                User::Id,
                User::Username,
                User::Email,
                User::Password,
                User::Role,
                User::CreatedAt,
            ])
            .values_panic([
                credential.id.to_owned().into(),
                credential.username.to_owned().into(),
                credential.email.to_owned().into(),
                credential.password_hash.to_owned().into(),
                credential.role.to_string().into(),
                now.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.pool).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(UserError::EmailAlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }
}
