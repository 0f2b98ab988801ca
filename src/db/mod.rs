pub mod health;
pub mod queries;

#[cfg(test)]
pub mod memory;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool};

pub use health::DbStatus;
pub use queries::questoes::{NovaQuestao, Questao, QuestaoStore};
pub use queries::usuarios::{AtualizaUsuario, NovoUsuario, Usuario, UsuarioStore};

/// SQLSTATE reported by PostgreSQL for a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Name of the unique constraint guarding `usuarios.email`.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "usuarios_email_key";

/// A statement rejected by the database, or a failure to reach it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct StorageError {
    pub code: Option<String>,
    pub constraint: Option<String>,
    pub message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            constraint: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_owned());
        self
    }

    pub fn with_constraint(mut self, constraint: &str) -> Self {
        self.constraint = Some(constraint.to_owned());
        self
    }

    pub fn is_email_conflict(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION)
            && self.constraint.as_deref() == Some(EMAIL_UNIQUE_CONSTRAINT)
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(error: sqlx::Error) -> Self {
        match error.as_database_error() {
            Some(db_error) => StorageError {
                code: db_error.code().map(|code| code.into_owned()),
                constraint: db_error.constraint().map(str::to_owned),
                message: db_error.message().to_owned(),
            },
            None => StorageError::new(error.to_string()),
        }
    }
}

/// Shared handle to the database.
///
/// Built once at startup and cloned into every handler; clones share the
/// same underlying pool. Statements run in autocommit mode, no transaction
/// is ever opened.
#[derive(Clone, Debug)]
pub struct Gateway {
    pool: PgPool,
}

impl Gateway {
    /// Creates the pool without opening a connection, so an unreachable
    /// database does not stop the process from starting. Only a malformed
    /// connection string is reported here. A statement waits at most
    /// `acquire_timeout` for a connection before failing.
    pub fn connect(
        url: &SecretString,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(url.expose_secret())?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs `sql` with positional text parameters and decodes every row.
    pub async fn query<'q, T>(&self, sql: &'q str, params: &[&'q str]) -> Result<Vec<T>, StorageError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut query = sqlx::query_as::<_, T>(sql);
        for param in params {
            query = query.bind(*param);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Like [`Gateway::query`] for statements that always yield one row,
    /// such as `INSERT ... RETURNING`.
    pub async fn query_one<'q, T>(&self, sql: &'q str, params: &[&'q str]) -> Result<T, StorageError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut query = sqlx::query_as::<_, T>(sql);
        for param in params {
            query = query.bind(*param);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    /// Runs a statement that returns no rows, yielding the affected count.
    pub async fn execute<'q>(&self, sql: &'q str, params: &[&'q str]) -> Result<u64, StorageError> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }
        Ok(query.execute(&self.pool).await?.rows_affected())
    }

    /// No-op round trip used by the startup health check.
    pub async fn ping(&self) -> Result<(), StorageError> {
        self.execute("SELECT 1", &[]).await.map(|_| ())
    }
}
