//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `SquareClient` over
//! real HTTP with the default `UreqTransport`. Validates request building,
//! status normalization and the receipt and image paths together with the
//! actual server.

#![cfg(feature = "ureq")]

use std::net::SocketAddr;

use serde_json::json;
use square_connect::{ClientConfig, QueryParams, SquareClient, SquareError, UreqTransport};

const TOKEN: &str = "T1";

/// Start a mock server on a random port and return its address.
fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_token(listener, TOKEN).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: SocketAddr, debug: bool) -> SquareClient<UreqTransport> {
    let config = ClientConfig::new("L1", TOKEN)
        .with_api_host(format!("http://{addr}"))
        .with_extended_debug_info(debug);
    SquareClient::with_default_transport(config)
}

#[test]
fn item_lifecycle() {
    let addr = spawn_server();
    let client = client(addr, false);

    // Step 1: list, should be empty.
    let items = client.list_items().unwrap();
    assert_eq!(items, json!([]));

    // Step 2: create an item.
    let created = client.create_item(&json!({"name": "Latte"})).unwrap();
    assert_eq!(created["name"], "Latte");
    let id = created["id"].as_str().unwrap().to_string();

    // Step 3: get it back.
    let fetched = client.get_item(&id).unwrap();
    assert_eq!(fetched, created);

    // Step 4: update the name.
    let updated = client.update_item(&id, &json!({"name": "Flat White"})).unwrap();
    assert_eq!(updated["name"], "Flat White");
    assert_eq!(updated["id"], id.as_str());

    // Step 5: upload an image fetched from the server's image route.
    let image_url = format!("http://{addr}/images/latte.png");
    let raw = client.upload_item_image(&id, &image_url, "png").unwrap();
    let uploaded: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(uploaded["url"].as_str().unwrap().contains(&id));

    // Step 6: delete.
    client.delete_item(&id).unwrap();

    // Step 7: get after delete gives a normalized 404 without a body.
    let err = client.get_item(&id).unwrap_err();
    let normalized = err.as_normalized().unwrap();
    assert_eq!(normalized.status_code, 404);
    assert_eq!(normalized.message, "Not Found");
    assert!(normalized.body.is_none());
}

#[test]
fn debug_mode_echoes_error_body() {
    let addr = spawn_server();
    let err = client(addr, true).get_item("nope").unwrap_err();
    let body = err.as_normalized().unwrap().body.clone().unwrap();
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["type"], "not_found");
}

#[test]
fn wrong_token_is_normalized_401() {
    let addr = spawn_server();
    let config = ClientConfig::new("L1", "wrong").with_api_host(format!("http://{addr}"));
    let err = SquareClient::with_default_transport(config)
        .get_merchant_profile()
        .unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert_eq!(
        err.to_string(),
        r#"{"statusCode":401,"message":"Unauthorized"}"#
    );
}

#[test]
fn merchant_profile() {
    let addr = spawn_server();
    let merchant = client(addr, false).get_merchant_profile().unwrap();
    assert_eq!(merchant["id"], "M1");
}

#[test]
fn transactions_and_payments_forward_query_verbatim() {
    let addr = spawn_server();
    let client = client(addr, false);

    let params = QueryParams::new()
        .with("begin_time", "2016-01-15T00:00:00Z")
        .with("sort_order", "ASC");
    let transactions = client.list_transactions(Some(&params)).unwrap();
    assert_eq!(transactions[0]["location_id"], "L1");
    assert_eq!(
        transactions[0]["query"],
        "begin_time=2016-01-15T00:00:00Z&sort_order=ASC"
    );

    let payments = client.list_payments(None).unwrap();
    assert_eq!(payments[0]["id"], "P1");
    assert!(payments[0]["query"].is_null());
}

#[test]
fn customer_lifecycle() {
    let addr = spawn_server();
    let client = client(addr, false);

    let created = client.create_customer(&json!({"given_name": "Jane"})).unwrap();
    let id = created["customer"]["id"].as_str().unwrap().to_string();

    let fetched = client.get_customer(&id).unwrap();
    assert_eq!(fetched["customer"]["given_name"], "Jane");

    let listed = client.list_customers().unwrap();
    assert_eq!(listed["customers"].as_array().unwrap().len(), 1);

    client.delete_customer(&id).unwrap();
    assert_eq!(client.get_customer(&id).unwrap_err().status_code(), Some(404));
}

#[test]
fn receipt_details_are_scraped() {
    let addr = spawn_server();
    let client = client(addr, false);

    let info = client
        .get_customer_info_from_receipt(&format!("http://{addr}/receipts/abc"))
        .unwrap();
    assert_eq!(info.aid.as_deref(), Some(mock_server::RECEIPT_AID));
    assert_eq!(info.name_on_card, mock_server::RECEIPT_NAME);

    let info = client
        .get_customer_info_from_receipt(&format!("http://{addr}/receipts/no-chip"))
        .unwrap();
    assert_eq!(info.aid, None);
    assert_eq!(info.name_on_card, mock_server::RECEIPT_NAME);
}

#[test]
fn image_upload_aborts_when_image_is_missing() {
    let addr = spawn_server();
    let client = client(addr, false);
    let created = client.create_item(&json!({"name": "Mocha"})).unwrap();
    let id = created["id"].as_str().unwrap();

    let err = client
        .upload_item_image(id, &format!("http://{addr}/images/missing.png"), "png")
        .unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[test]
fn connection_refused_is_transport_error() {
    // Bind and drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let err = client(addr, true).list_items().unwrap_err();
    assert!(matches!(err, SquareError::Transport(_)), "got {err:?}");
    assert_eq!(err.status_code(), None);
}
