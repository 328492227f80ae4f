//! In-memory fake of the Square Connect endpoints the client exercises.
//!
//! Everything under `/v1`, `/v2` and `/receipts` requires
//! `Authorization: Bearer <token>`; `/images` is public like any CDN.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::warn;
use uuid::Uuid;

pub const DEFAULT_TOKEN: &str = "test-token";

/// Served for any receipt id except `no-chip`.
pub const RECEIPT_AID: &str = "A0000000031010";
pub const RECEIPT_NAME: &str = "JANE DOE";

/// Bytes served for every image except `missing.*`.
pub const IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Merchant {
    pub id: String,
    pub name: String,
    pub country_code: String,
}

pub type Db = Arc<RwLock<HashMap<String, Value>>>;

#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    items: Db,
    customers: Db,
}

pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        items: Db::default(),
        customers: Db::default(),
    };

    let api = Router::new()
        .route("/v1/me", get(merchant_profile))
        .route("/v1/{location}/items", get(list_items).post(create_item))
        .route(
            "/v1/{location}/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/v1/{location}/items/{id}/image", post(upload_item_image))
        .route("/v1/{location}/payments", get(list_payments))
        .route("/v2/locations/{location}/transactions", get(list_transactions))
        .route("/v2/customers", get(list_customers).post(create_customer))
        .route("/v2/customers/{id}", get(get_customer).delete(delete_customer))
        .route("/receipts/{id}", get(receipt_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/images/{name}", get(image))
        .merge(api)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_token(listener, DEFAULT_TOKEN).await
}

pub async fn run_with_token(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_token(token)).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.token);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if presented != Some(expected.as_str()) {
        warn!(path = %request.uri().path(), "rejected request without a valid bearer token");
        return error(StatusCode::UNAUTHORIZED, "unauthorized", "invalid access token").into_response();
    }
    next.run(request).await
}

fn error(status: StatusCode, kind: &str, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "type": kind, "message": message })))
}

fn not_found() -> (StatusCode, Json<Value>) {
    error(StatusCode::NOT_FOUND, "not_found", "resource not found")
}

async fn merchant_profile() -> Json<Merchant> {
    Json(Merchant {
        id: "M1".to_string(),
        name: "Corner Cafe".to_string(),
        country_code: "US".to_string(),
    })
}

// --- items ---

async fn list_items(State(state): State<AppState>) -> Json<Vec<Value>> {
    let items = state.items.read().await;
    Json(items.values().cloned().collect())
}

async fn create_item(
    State(state): State<AppState>,
    Path(_location): Path<String>,
    Json(mut item): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(fields) = item.as_object_mut() else {
        return Err(error(StatusCode::BAD_REQUEST, "bad_request", "item must be an object"));
    };
    let id = Uuid::new_v4().to_string();
    fields.insert("id".to_string(), Value::String(id.clone()));
    state.items.write().await.insert(id, item.clone());
    Ok(Json(item))
}

async fn get_item(
    State(state): State<AppState>,
    Path((_location, id)): Path<(String, String)>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let items = state.items.read().await;
    items.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_item(
    State(state): State<AppState>,
    Path((_location, id)): Path<(String, String)>,
    Json(changes): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut items = state.items.write().await;
    let item = items.get_mut(&id).ok_or_else(not_found)?;
    if let (Some(target), Some(changes)) = (item.as_object_mut(), changes.as_object()) {
        for (key, value) in changes {
            if key != "id" {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(Json(item.clone()))
}

async fn delete_item(
    State(state): State<AppState>,
    Path((_location, id)): Path<(String, String)>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut items = state.items.write().await;
    items.remove(&id).map(Json).ok_or_else(not_found)
}

async fn upload_item_image(
    State(state): State<AppState>,
    Path((_location, id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data; boundary="));
    if !is_multipart {
        return Err(error(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported_media_type",
            "expected multipart/form-data",
        ));
    }
    if !contains(&body, b"name=\"image_data\"") || !contains(&body, IMAGE_BYTES) {
        return Err(error(StatusCode::BAD_REQUEST, "bad_request", "missing image_data part"));
    }
    if !state.items.read().await.contains_key(&id) {
        return Err(not_found());
    }
    Ok(Json(json!({
        "id": Uuid::new_v4().to_string(),
        "url": format!("https://images.example.test/{id}.png"),
    })))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

// --- payments & transactions ---

async fn list_payments(Path(location): Path<String>, RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!([{ "id": "P1", "location_id": location, "query": query }]))
}

async fn list_transactions(Path(location): Path<String>, RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({
        "transactions": [{ "id": "T1", "location_id": location, "query": query }],
        "cursor": null,
    }))
}

// --- customers ---

async fn list_customers(State(state): State<AppState>) -> Json<Value> {
    let customers = state.customers.read().await;
    Json(json!({ "customers": customers.values().cloned().collect::<Vec<_>>() }))
}

async fn create_customer(State(state): State<AppState>, Json(input): Json<Value>) -> Json<Value> {
    let id = Uuid::new_v4().to_string();
    let mut customer = json!({ "id": id });
    if let (Some(target), Some(fields)) = (customer.as_object_mut(), input.as_object()) {
        for (key, value) in fields {
            target.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
    state.customers.write().await.insert(id, customer.clone());
    Json(json!({ "customer": customer }))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let customers = state.customers.read().await;
    customers
        .get(&id)
        .map(|customer| Json(json!({ "customer": customer })))
        .ok_or_else(not_found)
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut customers = state.customers.write().await;
    customers.remove(&id).map(|_| Json(json!({}))).ok_or_else(not_found)
}

// --- receipts & images ---

async fn receipt_page(Path(id): Path<String>) -> Html<String> {
    let chip = if id == "no-chip" {
        String::new()
    } else {
        format!(r#"<div class="chip-application-id">Visa Credit AID: {RECEIPT_AID}</div>"#)
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html><head><title>Receipt {id}</title></head>
<body>
  <div class="receipt">
    <h1>$4.50</h1>
    {chip}
    <div class="name_on_card">{RECEIPT_NAME}</div>
  </div>
</body></html>"#
    ))
}

async fn image(Path(name): Path<String>) -> Response {
    if name.starts_with("missing.") {
        return StatusCode::NOT_FOUND.into_response();
    }
    ([(header::CONTENT_TYPE, "image/png")], IMAGE_BYTES).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_serializes_to_json() {
        let merchant = Merchant {
            id: "M1".to_string(),
            name: "Corner Cafe".to_string(),
            country_code: "US".to_string(),
        };
        let json = serde_json::to_value(&merchant).unwrap();
        assert_eq!(json["id"], "M1");
        assert_eq!(json["country_code"], "US");
    }

    #[test]
    fn contains_finds_subslices() {
        assert!(contains(b"--b\r\nname=\"image_data\"", b"name=\"image_data\""));
        assert!(!contains(b"short", b"much longer needle"));
    }

    #[test]
    fn error_body_has_type_and_message() {
        let (status, Json(body)) = not_found();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["type"], "not_found");
    }
}
