use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{NovaQuestao, Questao},
    server::{
        app::{AppState, Questoes},
        deserializers::deserialize_present_text,
        error::ApiError,
        extractors::JsonBody,
    },
    telemetry::count_request,
};

use super::ApiResponse;

const RESOURCE: &str = "questoes";
const CAMPOS_OBRIGATORIOS: &str =
    "Todos os campos (enunciado, disciplina, tema, nivel) são obrigatórios.";
const NAO_ENCONTRADA: &str = "Questão não encontrada";

#[derive(Deserialize, Debug, Default)]
struct QuestaoBody {
    #[serde(default, deserialize_with = "deserialize_present_text")]
    enunciado: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present_text")]
    disciplina: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present_text")]
    tema: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present_text")]
    nivel: Option<String>,
}

impl QuestaoBody {
    fn into_nova(self) -> Option<NovaQuestao> {
        Some(NovaQuestao {
            enunciado: self.enunciado?,
            disciplina: self.disciplina?,
            tema: self.tema?,
            nivel: self.nivel?,
        })
    }

    /// Fields left out keep the stored value, so the row is always
    /// rewritten in full.
    fn merge_into(self, atual: Questao) -> NovaQuestao {
        NovaQuestao {
            enunciado: self.enunciado.unwrap_or(atual.enunciado),
            disciplina: self.disciplina.unwrap_or(atual.disciplina),
            tema: self.tema.unwrap_or(atual.tema),
            nivel: self.nivel.unwrap_or(atual.nivel),
        }
    }
}

async fn find_existing(store: &Questoes, id: &str, action: &'static str) -> ApiResponse<Questao> {
    store
        .find(id)
        .await
        .map_err(ApiError::storage(action))?
        .ok_or(ApiError::NotFound(NAO_ENCONTRADA))
}

async fn list_questoes(State(store): State<Questoes>) -> ApiResponse<Json<Vec<Questao>>> {
    count_request(RESOURCE, "list");
    let questoes = store
        .list()
        .await
        .map_err(ApiError::storage("listing questions"))?;
    Ok(Json(questoes))
}

#[tracing::instrument(skip_all, fields(id = %id))]
async fn get_questao(
    State(store): State<Questoes>,
    Path(id): Path<String>,
) -> ApiResponse<Json<Vec<Questao>>> {
    count_request(RESOURCE, "get");
    let questao = find_existing(&store, &id, "fetching question").await?;
    Ok(Json(vec![questao]))
}

async fn create_questao(
    State(store): State<Questoes>,
    JsonBody(body): JsonBody<QuestaoBody>,
) -> ApiResponse<(StatusCode, Json<Value>)> {
    count_request(RESOURCE, "create");
    let nova = body
        .into_nova()
        .ok_or(ApiError::Validation(CAMPOS_OBRIGATORIOS))?;
    store
        .insert(&nova)
        .await
        .map_err(ApiError::storage("inserting question"))?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "mensagem": "Questão criada com sucesso!" })),
    ))
}

#[tracing::instrument(skip_all, fields(id = %id))]
async fn update_questao(
    State(store): State<Questoes>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<QuestaoBody>,
) -> ApiResponse<Json<Value>> {
    count_request(RESOURCE, "update");
    let atual = find_existing(&store, &id, "updating question").await?;
    store
        .update(&id, &body.merge_into(atual))
        .await
        .map_err(ApiError::storage("updating question"))?;
    Ok(Json(json!({ "message": "Questão atualizada com sucesso!" })))
}

#[tracing::instrument(skip_all, fields(id = %id))]
async fn delete_questao(
    State(store): State<Questoes>,
    Path(id): Path<String>,
) -> ApiResponse<Json<Value>> {
    count_request(RESOURCE, "delete");
    find_existing(&store, &id, "deleting question").await?;
    store
        .delete(&id)
        .await
        .map_err(ApiError::storage("deleting question"))?;
    Ok(Json(json!({ "mensagem": "Questão excluida com sucesso!!" })))
}

pub fn questoes_router(state: AppState) -> Router {
    Router::new()
        .route("/questoes", get(list_questoes).post(create_questao))
        .route(
            "/questoes/{id}",
            get(get_questao).put(update_questao).delete(delete_questao),
        )
        .with_state(state)
}
