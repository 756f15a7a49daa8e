//! HTTP-level tests of the `/api` router.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{DecisionBuilder, IncomingBuilder, OutgoingBuilder, TestHarness};

#[tokio::test]
async fn test_health() {
    let h = TestHarness::new();
    let (status, body) = h.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_create_incoming_assigns_numbers() {
    let h = TestHarness::new();

    let (status, first) = h.post("/api/couriers", IncomingBuilder::new().courier()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["type"], "incoming");
    assert_eq!(first["bo_number"], "1");
    assert_eq!(first["sender"], "ACME");
    assert_eq!(first["subject"], "Demande");
    assert_eq!(first["arrival_date"], "2026-01-05");
    assert!(first["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(first["created_at"].is_string());

    let (status, second) = h.post("/api/couriers", IncomingBuilder::new().courier()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["bo_number"], "2");
    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_client_supplied_number_is_ignored() {
    let h = TestHarness::new();
    let body = OutgoingBuilder::new().set("number", "77").courier();
    let (status, created) = h.post("/api/couriers", body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "outgoing");
    assert_eq!(created["number"], "1");
}

#[tokio::test]
async fn test_legacy_type_names() {
    let h = TestHarness::new();
    let body = IncomingBuilder::new().courier();
    let mut body = body.as_object().cloned().unwrap();
    body.insert("type".into(), json!("arrivee"));
    let (status, created) = h.post("/api/couriers", body.into()).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = h.get(&format!("/api/couriers/type/arrivee/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], id);
}

#[tokio::test]
async fn test_missing_required_field_is_422() {
    let h = TestHarness::new();
    let body = IncomingBuilder::new().without("recipient").courier();
    let (status, error) = h.post("/api/couriers", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["field"], "recipient");

    let (_, next) = h.get("/api/couriers/type/incoming/next-number").await;
    assert_eq!(next["nextNumber"], "1");
}

#[tokio::test]
async fn test_invalid_date_is_422() {
    let h = TestHarness::new();
    let (status, error) = h
        .post("/api/decisions", DecisionBuilder::new().set("date", "someday").body())
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["field"], "date");
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let h = TestHarness::new();
    let (status, error) = h.send_raw(Method::POST, "/api/decisions", "{ not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unknown_courier_type_is_400() {
    let h = TestHarness::new();
    let (status, error) = h.get("/api/couriers/type/parcel").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "BAD_REQUEST");

    let mut body = IncomingBuilder::new().body();
    body["type"] = json!("parcel");
    let (status, _) = h.post("/api/couriers", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_id_is_404() {
    let h = TestHarness::new();
    let (status, error) = h.get("/api/decisions/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");

    let (status, _) = h
        .put("/api/couriers/type/outgoing/does-not-exist", json!({ "subject": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = h.delete("/api/couriers/type/incoming/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_merges_partial_body() {
    let h = TestHarness::new();
    let (_, created) = h
        .post(
            "/api/couriers",
            IncomingBuilder::new().set("nature", "Lettre").courier(),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = h
        .put(
            &format!("/api/couriers/type/incoming/{}", id),
            json!({ "subject": "Relance", "bo_number": "99" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["subject"], "Relance");
    assert_eq!(updated["sender"], "ACME");
    assert_eq!(updated["nature"], "Lettre");
    assert_eq!(updated["bo_number"], created["bo_number"]);
    assert_eq!(updated["created_at"], created["created_at"]);
}

#[tokio::test]
async fn test_delete_returns_204() {
    let h = TestHarness::new();
    let (_, created) = h.post("/api/decisions", DecisionBuilder::new().body()).await;
    let uri = format!("/api/decisions/{}", created["id"].as_str().unwrap());

    let (status, body) = h.delete(&uri).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = h.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_couriers_mixes_directions() {
    let h = TestHarness::new();
    h.post("/api/couriers", IncomingBuilder::new().courier()).await;
    h.post("/api/couriers", OutgoingBuilder::new().courier()).await;

    let (status, all) = h.get("/api/couriers").await;
    assert_eq!(status, StatusCode::OK);
    let types: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["incoming", "outgoing"]);

    let (_, outgoing) = h.get("/api/couriers/type/depart").await;
    assert_eq!(outgoing.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_next_number_per_kind() {
    let h = TestHarness::new();
    h.post("/api/decisions", DecisionBuilder::new().body()).await;
    h.post("/api/decisions", DecisionBuilder::new().body()).await;

    let (status, next) = h.get("/api/decisions/next-number").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(next, json!({ "nextNumber": "3" }));

    let (_, next) = h.get("/api/couriers/type/outgoing/next-number").await;
    assert_eq!(next["nextNumber"], "1");
}

#[tokio::test]
async fn test_export_in_arabic() {
    let h = TestHarness::new();
    h.post(
        "/api/decisions",
        DecisionBuilder::new().set("observation", "Adoptée").body(),
    )
    .await;

    let (status, table) = h.get("/api/decisions/export?lang=ar").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["language"], "ar");
    assert_eq!(table["columns"].as_array().unwrap().len(), 4);
    assert_eq!(table["rows"][0], json!(["1", "01/02/2026", "Budget", "Adoptée"]));
    assert!(table["generatedOn"].is_string());
}

#[tokio::test]
async fn test_export_defaults_to_french() {
    let h = TestHarness::new();
    h.post("/api/couriers", IncomingBuilder::new().courier()).await;

    let (status, table) = h.get("/api/couriers/type/incoming/export").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["language"], "fr");
    assert_eq!(table["title"], "Liste des Courriers Arrivée");
    let row = table["rows"][0].as_array().unwrap();
    assert_eq!(row.len(), 10);
    // reference_date is empty
    assert_eq!(row[9], "N/A");
    assert_eq!(row[5], "-");
}

#[tokio::test]
async fn test_export_rejects_unknown_language() {
    let h = TestHarness::new();
    let (status, _) = h.get("/api/decisions/export?lang=de").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_print_sheet() {
    let h = TestHarness::new();
    let (_, created) = h.post("/api/couriers", OutgoingBuilder::new().courier()).await;
    let id = created["id"].as_str().unwrap();

    let (status, sheet) = h
        .get(&format!("/api/couriers/type/outgoing/{}/print?lang=fr", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sheet["title"], "Détails du courrier");
    assert_eq!(sheet["number"], "1");
    assert!(!sheet["rows"].as_array().unwrap().is_empty());

    let (status, _) = h.get("/api/decisions/missing/print").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lang_query_is_case_insensitive() {
    let h = TestHarness::new();
    h.post("/api/decisions", DecisionBuilder::new().body()).await;

    let (status, table) = h.get("/api/decisions/export?lang=AR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["language"], "ar");
    assert_eq!(table["title"], "قائمة القرارات");
}

#[tokio::test]
async fn test_undecodable_path_is_coded_400() {
    let h = TestHarness::new();
    let (status, error) = h.get("/api/decisions/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "BAD_REQUEST");

    let (status, error) = h.delete("/api/couriers/type/incoming/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_both_arrival_date_keys_is_coded_400() {
    let h = TestHarness::new();
    let body = IncomingBuilder::new().set("arrival_date", "2026-01-06").courier();
    let (status, error) = h.post("/api/couriers", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "BAD_REQUEST");

    let (_, next) = h.get("/api/couriers/type/incoming/next-number").await;
    assert_eq!(next["nextNumber"], "1");
}
