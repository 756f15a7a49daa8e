use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::{blocking, detail_sheet, export_table, ApiError, LangQuery, NextNumber};
use crate::db::DecisionTable;
use crate::export::{DetailSheet, ExportTable};
use crate::model::{Decision, DecisionFilter, DecisionForm, Stored};
use crate::registry::Registry;

pub fn routes() -> Router<Registry> {
    Router::new()
        .route("/decisions", post(create_decision).get(list_decisions))
        .route("/decisions/search", post(search_decisions))
        .route("/decisions/next-number", get(next_number))
        .route("/decisions/export", get(export))
        .route(
            "/decisions/{id}",
            get(get_decision).put(update_decision).delete(delete_decision),
        )
        .route("/decisions/{id}/print", get(print))
}

async fn create_decision(
    State(registry): State<Registry>,
    body: Result<Json<DecisionForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Stored<Decision>>), ApiError> {
    let Json(form) = body?;
    let decision = blocking(move || registry.create::<DecisionTable>(form)).await?;
    Ok((StatusCode::CREATED, Json(decision)))
}

async fn list_decisions(
    State(registry): State<Registry>,
) -> Result<Json<Vec<Stored<Decision>>>, ApiError> {
    let decisions = blocking(move || registry.list::<DecisionTable>()).await?;
    Ok(Json(decisions))
}

async fn search_decisions(
    State(registry): State<Registry>,
    body: Result<Json<DecisionFilter>, JsonRejection>,
) -> Result<Json<Vec<Decision>>, ApiError> {
    let Json(filter) = body?;
    let rows = blocking(move || registry.search::<DecisionTable>(&filter)).await?;
    Ok(Json(rows))
}

async fn get_decision(
    State(registry): State<Registry>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Stored<Decision>>, ApiError> {
    let Path(id) = path?;
    let decision = blocking(move || registry.get::<DecisionTable>(&id)).await?;
    Ok(Json(decision))
}

async fn update_decision(
    State(registry): State<Registry>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<DecisionForm>, JsonRejection>,
) -> Result<Json<Stored<Decision>>, ApiError> {
    let Path(id) = path?;
    let Json(form) = body?;
    let decision = blocking(move || registry.update::<DecisionTable>(&id, form)).await?;
    Ok(Json(decision))
}

async fn delete_decision(
    State(registry): State<Registry>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    blocking(move || registry.delete::<DecisionTable>(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn next_number(State(registry): State<Registry>) -> Result<Json<NextNumber>, ApiError> {
    let next_number = blocking(move || registry.peek_next_number::<DecisionTable>()).await?;
    Ok(Json(NextNumber { next_number }))
}

async fn export(
    State(registry): State<Registry>,
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<Json<ExportTable>, ApiError> {
    let Query(LangQuery { lang }) = query?;
    Ok(Json(export_table::<DecisionTable>(registry, lang).await?))
}

async fn print(
    State(registry): State<Registry>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<Json<DetailSheet>, ApiError> {
    let Path(id) = path?;
    let Query(LangQuery { lang }) = query?;
    Ok(Json(detail_sheet::<DecisionTable>(registry, id, lang).await?))
}
