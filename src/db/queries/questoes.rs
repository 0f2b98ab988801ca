use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::db::{Gateway, StorageError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Questao {
    pub id: i32,
    pub enunciado: String,
    pub disciplina: String,
    pub tema: String,
    pub nivel: String,
}

/// Every column of a question except the generated id.
#[derive(Debug, Clone, PartialEq)]
pub struct NovaQuestao {
    pub enunciado: String,
    pub disciplina: String,
    pub tema: String,
    pub nivel: String,
}

/// Storage operations behind the `/questoes` handlers.
///
/// `id` is passed through untouched; the database decides whether it is a
/// valid integer.
#[async_trait]
pub trait QuestaoStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Questao>, StorageError>;

    async fn find(&self, id: &str) -> Result<Option<Questao>, StorageError>;

    async fn insert(&self, questao: &NovaQuestao) -> Result<(), StorageError>;

    async fn update(&self, id: &str, questao: &NovaQuestao) -> Result<(), StorageError>;

    async fn delete(&self, id: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl QuestaoStore for Gateway {
    async fn list(&self) -> Result<Vec<Questao>, StorageError> {
        self.query("SELECT * FROM questoes", &[]).await
    }

    async fn find(&self, id: &str) -> Result<Option<Questao>, StorageError> {
        let rows = self
            .query("SELECT * FROM questoes WHERE id = $1::int", &[id])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, questao: &NovaQuestao) -> Result<(), StorageError> {
        self.execute(
            r#"
            INSERT INTO questoes (enunciado, disciplina, tema, nivel) VALUES ($1, $2, $3, $4)
            "#,
            &[
                questao.enunciado.as_str(),
                questao.disciplina.as_str(),
                questao.tema.as_str(),
                questao.nivel.as_str(),
            ],
        )
        .await?;
        Ok(())
    }

    async fn update(&self, id: &str, questao: &NovaQuestao) -> Result<(), StorageError> {
        self.execute(
            r#"
            UPDATE questoes SET enunciado = $1, disciplina = $2, tema = $3, nivel = $4 WHERE id = $5::int
            "#,
            &[
                questao.enunciado.as_str(),
                questao.disciplina.as_str(),
                questao.tema.as_str(),
                questao.nivel.as_str(),
                id,
            ],
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.execute("DELETE FROM questoes WHERE id = $1::int", &[id])
            .await?;
        Ok(())
    }
}
