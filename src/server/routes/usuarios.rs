use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{queries::usuarios::STATUS_ATIVO, AtualizaUsuario, NovoUsuario, StorageError, Usuario},
    server::{
        app::{AppState, Usuarios},
        deserializers::deserialize_present_text,
        error::ApiError,
        extractors::JsonBody,
    },
    telemetry::count_request,
};

use super::ApiResponse;

const RESOURCE: &str = "usuarios";
const CAMPOS_OBRIGATORIOS: &str = "Todos os campos (nome, email, senha) são obrigatórios.";
const NAO_ENCONTRADO: &str = "Usuário não encontrado";
const EMAIL_EM_USO: &str = "O e-mail fornecido já está em uso.";
const EMAIL_EM_USO_POR_OUTRO: &str = "O e-mail fornecido já está em uso por outro usuário.";

#[derive(Deserialize, Debug, Default)]
struct NovoUsuarioBody {
    #[serde(default, deserialize_with = "deserialize_present_text")]
    nome: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present_text")]
    email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present_text")]
    senha: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present_text")]
    status: Option<String>,
}

impl NovoUsuarioBody {
    fn into_novo(self) -> Option<NovoUsuario> {
        Some(NovoUsuario {
            nome: self.nome?,
            email: self.email?,
            senha: self.senha?,
            status: self.status.unwrap_or_else(|| STATUS_ATIVO.to_owned()),
        })
    }
}

// senha is not updatable through this route
#[derive(Deserialize, Debug, Default)]
struct AtualizaUsuarioBody {
    #[serde(default, deserialize_with = "deserialize_present_text")]
    nome: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present_text")]
    email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present_text")]
    status: Option<String>,
}

impl AtualizaUsuarioBody {
    fn merge_into(self, atual: Usuario) -> AtualizaUsuario {
        AtualizaUsuario {
            nome: self.nome.unwrap_or(atual.nome),
            email: self.email.unwrap_or(atual.email),
            status: self.status.unwrap_or(atual.status),
        }
    }
}

fn conflict_or_storage(
    mensagem: &'static str,
    action: &'static str,
) -> impl FnOnce(StorageError) -> ApiError {
    move |source| {
        if source.is_email_conflict() {
            tracing::warn!("Email already registered while {action}: {source}");
            ApiError::Conflict(mensagem)
        } else {
            ApiError::Storage { action, source }
        }
    }
}

async fn find_existing(store: &Usuarios, id: &str, action: &'static str) -> ApiResponse<Usuario> {
    store
        .find(id)
        .await
        .map_err(ApiError::storage(action))?
        .ok_or(ApiError::NotFound(NAO_ENCONTRADO))
}

async fn list_usuarios(State(store): State<Usuarios>) -> ApiResponse<Json<Vec<Usuario>>> {
    count_request(RESOURCE, "list");
    let usuarios = store
        .list()
        .await
        .map_err(ApiError::storage("listing users"))?;
    Ok(Json(usuarios))
}

#[tracing::instrument(skip_all, fields(id = %id))]
async fn get_usuario(
    State(store): State<Usuarios>,
    Path(id): Path<String>,
) -> ApiResponse<Json<Usuario>> {
    count_request(RESOURCE, "get");
    let usuario = find_existing(&store, &id, "fetching user").await?;
    Ok(Json(usuario))
}

async fn create_usuario(
    State(store): State<Usuarios>,
    JsonBody(body): JsonBody<NovoUsuarioBody>,
) -> ApiResponse<(StatusCode, Json<Value>)> {
    count_request(RESOURCE, "create");
    let novo = body
        .into_novo()
        .ok_or(ApiError::Validation(CAMPOS_OBRIGATORIOS))?;
    let usuario = store
        .insert(&novo)
        .await
        .map_err(conflict_or_storage(EMAIL_EM_USO, "inserting user"))?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "mensagem": "Usuário criado com sucesso!", "data": usuario })),
    ))
}

#[tracing::instrument(skip_all, fields(id = %id))]
async fn update_usuario(
    State(store): State<Usuarios>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<AtualizaUsuarioBody>,
) -> ApiResponse<Json<Value>> {
    count_request(RESOURCE, "update");
    let atual = find_existing(&store, &id, "updating user").await?;
    let usuario = store
        .update(&id, &body.merge_into(atual))
        .await
        .map_err(conflict_or_storage(EMAIL_EM_USO_POR_OUTRO, "updating user"))?;
    Ok(Json(json!({ "message": "Usuário atualizado com sucesso!", "data": usuario })))
}

#[tracing::instrument(skip_all, fields(id = %id))]
async fn delete_usuario(
    State(store): State<Usuarios>,
    Path(id): Path<String>,
) -> ApiResponse<Json<Value>> {
    count_request(RESOURCE, "delete");
    find_existing(&store, &id, "deleting user").await?;
    store
        .delete(&id)
        .await
        .map_err(ApiError::storage("deleting user"))?;
    Ok(Json(json!({ "mensagem": "Usuário excluido com sucesso!!" })))
}

pub fn usuarios_router(state: AppState) -> Router {
    Router::new()
        .route("/usuarios", get(list_usuarios).post(create_usuario))
        .route(
            "/usuarios/{id}",
            get(get_usuario).put(update_usuario).delete(delete_usuario),
        )
        .with_state(state)
}
