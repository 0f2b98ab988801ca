//! In-memory storage for handler tests.
//!
//! Reproduces the database behaviour handlers depend on: generated ids,
//! `NOW()` timestamps, the `usuarios_email_key` unique constraint and the
//! cast error raised for non-numeric ids.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{
    AtualizaUsuario, NovaQuestao, NovoUsuario, Questao, QuestaoStore, StorageError, Usuario,
    UsuarioStore, EMAIL_UNIQUE_CONSTRAINT, UNIQUE_VIOLATION,
};

const INVALID_TEXT_REPRESENTATION: &str = "22P02";

#[derive(Debug, Default)]
struct Tables {
    next_id: i32,
    questoes: Vec<Questao>,
    usuarios: Vec<(Usuario, String)>,
}

#[derive(Debug, Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
    unavailable: bool,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every statement fails, as if the database went away.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Stored password for the user, for assertions only.
    pub fn senha(&self, id: i32) -> Option<String> {
        let tables = self.tables.lock().unwrap();
        tables
            .usuarios
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(_, senha)| senha.clone())
    }

    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StorageError> {
        if self.unavailable {
            return Err(StorageError::new("connection refused"));
        }
        self.tables
            .lock()
            .map_err(|_| StorageError::new("lock poisoned"))
    }
}

fn parse_id(id: &str) -> Result<i32, StorageError> {
    id.trim().parse().map_err(|_| {
        StorageError::new(format!("invalid input syntax for type integer: \"{id}\""))
            .with_code(INVALID_TEXT_REPRESENTATION)
    })
}

fn email_conflict() -> StorageError {
    StorageError::new(
        "duplicate key value violates unique constraint \"usuarios_email_key\"",
    )
    .with_code(UNIQUE_VIOLATION)
    .with_constraint(EMAIL_UNIQUE_CONSTRAINT)
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.usuarios
            .iter()
            .any(|(u, _)| u.email == email && Some(u.id) != except)
    }
}

#[async_trait]
impl QuestaoStore for MemoryDb {
    async fn list(&self) -> Result<Vec<Questao>, StorageError> {
        Ok(self.tables()?.questoes.clone())
    }

    async fn find(&self, id: &str) -> Result<Option<Questao>, StorageError> {
        let id = parse_id(id)?;
        Ok(self.tables()?.questoes.iter().find(|q| q.id == id).cloned())
    }

    async fn insert(&self, questao: &NovaQuestao) -> Result<(), StorageError> {
        let mut tables = self.tables()?;
        let id = tables.next_id();
        tables.questoes.push(Questao {
            id,
            enunciado: questao.enunciado.clone(),
            disciplina: questao.disciplina.clone(),
            tema: questao.tema.clone(),
            nivel: questao.nivel.clone(),
        });
        Ok(())
    }

    async fn update(&self, id: &str, questao: &NovaQuestao) -> Result<(), StorageError> {
        let id = parse_id(id)?;
        let mut tables = self.tables()?;
        if let Some(row) = tables.questoes.iter_mut().find(|q| q.id == id) {
            row.enunciado = questao.enunciado.clone();
            row.disciplina = questao.disciplina.clone();
            row.tema = questao.tema.clone();
            row.nivel = questao.nivel.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let id = parse_id(id)?;
        self.tables()?.questoes.retain(|q| q.id != id);
        Ok(())
    }
}

#[async_trait]
impl UsuarioStore for MemoryDb {
    async fn list(&self) -> Result<Vec<Usuario>, StorageError> {
        let tables = self.tables()?;
        let mut usuarios: Vec<Usuario> = tables.usuarios.iter().map(|(u, _)| u.clone()).collect();
        usuarios.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(usuarios)
    }

    async fn find(&self, id: &str) -> Result<Option<Usuario>, StorageError> {
        let id = parse_id(id)?;
        Ok(self
            .tables()?
            .usuarios
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn insert(&self, usuario: &NovoUsuario) -> Result<Usuario, StorageError> {
        let mut tables = self.tables()?;
        if tables.email_taken(&usuario.email, None) {
            return Err(email_conflict());
        }
        let row = Usuario {
            id: tables.next_id(),
            nome: usuario.nome.clone(),
            email: usuario.email.clone(),
            data_criacao: Utc::now(),
            status: usuario.status.clone(),
        };
        tables.usuarios.push((row.clone(), usuario.senha.clone()));
        Ok(row)
    }

    async fn update(&self, id: &str, usuario: &AtualizaUsuario) -> Result<Usuario, StorageError> {
        let id = parse_id(id)?;
        let mut tables = self.tables()?;
        if tables.email_taken(&usuario.email, Some(id)) {
            return Err(email_conflict());
        }
        let (row, _) = tables
            .usuarios
            .iter_mut()
            .find(|(u, _)| u.id == id)
            .ok_or_else(|| StorageError::new("no rows returned by a query that expected to return at least one row"))?;
        row.nome = usuario.nome.clone();
        row.email = usuario.email.clone();
        row.status = usuario.status.clone();
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let id = parse_id(id)?;
        self.tables()?.usuarios.retain(|(u, _)| u.id != id);
        Ok(())
    }
}
