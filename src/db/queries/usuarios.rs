use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Gateway, StorageError};

/// Status given to a user created without one.
pub const STATUS_ATIVO: &str = "Ativo";

/// A user as exposed to clients. `senha` is never selected.
///
/// `data_criacao` is read through a `timestamptz` cast so tables declaring the
/// column as `TIMESTAMP` decode the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub data_criacao: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub status: String,
}

/// Columns a user update may touch; `senha` and `data_criacao` are fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct AtualizaUsuario {
    pub nome: String,
    pub email: String,
    pub status: String,
}

#[async_trait]
pub trait UsuarioStore: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<Usuario>, StorageError>;

    async fn find(&self, id: &str) -> Result<Option<Usuario>, StorageError>;

    async fn insert(&self, usuario: &NovoUsuario) -> Result<Usuario, StorageError>;

    async fn update(&self, id: &str, usuario: &AtualizaUsuario) -> Result<Usuario, StorageError>;

    async fn delete(&self, id: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl UsuarioStore for Gateway {
    async fn list(&self) -> Result<Vec<Usuario>, StorageError> {
        self.query(
            "SELECT id, nome, email, data_criacao::timestamptz AS data_criacao, status FROM usuarios ORDER BY id DESC",
            &[],
        )
        .await
    }

    async fn find(&self, id: &str) -> Result<Option<Usuario>, StorageError> {
        let rows = self
            .query(
                "SELECT id, nome, email, data_criacao::timestamptz AS data_criacao, status FROM usuarios WHERE id = $1::int",
                &[id],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, usuario: &NovoUsuario) -> Result<Usuario, StorageError> {
        self.query_one(
            r#"
            INSERT INTO usuarios (nome, email, senha, data_criacao, status)
            VALUES ($1, $2, $3, NOW(), $4)
            RETURNING id, nome, email, data_criacao::timestamptz AS data_criacao, status
            "#,
            &[
                usuario.nome.as_str(),
                usuario.email.as_str(),
                usuario.senha.as_str(),
                usuario.status.as_str(),
            ],
        )
        .await
    }

    async fn update(&self, id: &str, usuario: &AtualizaUsuario) -> Result<Usuario, StorageError> {
        self.query_one(
            r#"
            UPDATE usuarios SET nome = $1, email = $2, status = $3 WHERE id = $4::int
            RETURNING id, nome, email, data_criacao::timestamptz AS data_criacao, status
            "#,
            &[
                usuario.nome.as_str(),
                usuario.email.as_str(),
                usuario.status.as_str(),
                id,
            ],
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.execute("DELETE FROM usuarios WHERE id = $1::int", &[id])
            .await?;
        Ok(())
    }
}
