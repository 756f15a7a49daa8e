//! Incoming and outgoing mail endpoints.
//!
//! `{type}` path segments accept `incoming`/`outgoing` as well as the legacy
//! `arrivee`/`depart`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;

use super::{blocking, detail_sheet, export_table, ApiError, LangQuery, NextNumber};
use crate::db::{IncomingTable, OutgoingTable};
use crate::export::{DetailSheet, ExportTable};
use crate::model::{
    Courier, CourierForm, CourierType, IncomingFilter, IncomingForm, IncomingMail, OutgoingFilter,
    OutgoingForm, OutgoingMail,
};
use crate::registry::Registry;

pub fn routes() -> Router<Registry> {
    Router::new()
        .route("/couriers", post(create_courier).get(list_couriers))
        .route("/couriers/arrivee/search", post(search_incoming))
        .route("/couriers/depart/search", post(search_outgoing))
        .route("/couriers/type/{type}", get(list_by_type))
        .route("/couriers/type/{type}/next-number", get(next_number))
        .route("/couriers/type/{type}/export", get(export))
        .route(
            "/couriers/type/{type}/{id}",
            get(get_courier).put(update_courier).delete(delete_courier),
        )
        .route("/couriers/type/{type}/{id}/print", get(print))
}

fn courier_type(raw: &str) -> Result<CourierType, ApiError> {
    CourierType::parse(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown courier type '{}'", raw)))
}

fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn create_courier(
    State(registry): State<Registry>,
    body: Result<Json<CourierForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Courier>), ApiError> {
    let Json(form) = body?;
    let courier = blocking(move || registry.create_courier(form)).await?;
    Ok((StatusCode::CREATED, Json(courier)))
}

async fn list_couriers(State(registry): State<Registry>) -> Result<Json<Vec<Courier>>, ApiError> {
    let couriers = blocking(move || registry.list_couriers()).await?;
    Ok(Json(couriers))
}

async fn list_by_type(
    State(registry): State<Registry>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Courier>>, ApiError> {
    let Path(kind) = path?;
    let kind = courier_type(&kind)?;
    let couriers: Vec<Courier> = blocking(move || {
        Ok(match kind {
            CourierType::Incoming => registry
                .list::<IncomingTable>()?
                .into_iter()
                .map(Courier::Incoming)
                .collect(),
            CourierType::Outgoing => registry
                .list::<OutgoingTable>()?
                .into_iter()
                .map(Courier::Outgoing)
                .collect(),
        })
    })
    .await?;
    Ok(Json(couriers))
}

async fn search_incoming(
    State(registry): State<Registry>,
    body: Result<Json<IncomingFilter>, JsonRejection>,
) -> Result<Json<Vec<IncomingMail>>, ApiError> {
    let Json(filter) = body?;
    let rows = blocking(move || registry.search::<IncomingTable>(&filter)).await?;
    Ok(Json(rows))
}

async fn search_outgoing(
    State(registry): State<Registry>,
    body: Result<Json<OutgoingFilter>, JsonRejection>,
) -> Result<Json<Vec<OutgoingMail>>, ApiError> {
    let Json(filter) = body?;
    let rows = blocking(move || registry.search::<OutgoingTable>(&filter)).await?;
    Ok(Json(rows))
}

async fn get_courier(
    State(registry): State<Registry>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Courier>, ApiError> {
    let Path((kind, id)) = path?;
    let kind = courier_type(&kind)?;
    let courier = blocking(move || match kind {
        CourierType::Incoming => registry.get::<IncomingTable>(&id).map(Courier::Incoming),
        CourierType::Outgoing => registry.get::<OutgoingTable>(&id).map(Courier::Outgoing),
    })
    .await?;
    Ok(Json(courier))
}

async fn update_courier(
    State(registry): State<Registry>,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Courier>, ApiError> {
    let Path((kind, id)) = path?;
    let kind = courier_type(&kind)?;
    let Json(value) = body?;
    let courier = match kind {
        CourierType::Incoming => {
            let form: IncomingForm = from_value(value)?;
            blocking(move || registry.update::<IncomingTable>(&id, form).map(Courier::Incoming))
                .await?
        }
        CourierType::Outgoing => {
            let form: OutgoingForm = from_value(value)?;
            blocking(move || registry.update::<OutgoingTable>(&id, form).map(Courier::Outgoing))
                .await?
        }
    };
    Ok(Json(courier))
}

async fn delete_courier(
    State(registry): State<Registry>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((kind, id)) = path?;
    let kind = courier_type(&kind)?;
    blocking(move || match kind {
        CourierType::Incoming => registry.delete::<IncomingTable>(&id),
        CourierType::Outgoing => registry.delete::<OutgoingTable>(&id),
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn next_number(
    State(registry): State<Registry>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<NextNumber>, ApiError> {
    let Path(kind) = path?;
    let kind = courier_type(&kind)?;
    let next_number = blocking(move || match kind {
        CourierType::Incoming => registry.peek_next_number::<IncomingTable>(),
        CourierType::Outgoing => registry.peek_next_number::<OutgoingTable>(),
    })
    .await?;
    Ok(Json(NextNumber { next_number }))
}

async fn export(
    State(registry): State<Registry>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<Json<ExportTable>, ApiError> {
    let Path(kind) = path?;
    let kind = courier_type(&kind)?;
    let Query(LangQuery { lang }) = query?;
    let table = match kind {
        CourierType::Incoming => export_table::<IncomingTable>(registry, lang).await?,
        CourierType::Outgoing => export_table::<OutgoingTable>(registry, lang).await?,
    };
    Ok(Json(table))
}

async fn print(
    State(registry): State<Registry>,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<Json<DetailSheet>, ApiError> {
    let Path((kind, id)) = path?;
    let kind = courier_type(&kind)?;
    let Query(LangQuery { lang }) = query?;
    let sheet = match kind {
        CourierType::Incoming => detail_sheet::<IncomingTable>(registry, id, lang).await?,
        CourierType::Outgoing => detail_sheet::<OutgoingTable>(registry, id, lang).await?,
    };
    Ok(Json(sheet))
}
