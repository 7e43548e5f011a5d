use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, ErrorKind, ErrorResponse, build_router,
    category::{Category, CategoryId},
    endpoints,
    item::{Item, ItemId},
    shopping_list::ListEntry,
};

/// A test server for the full app, backed by a fresh in-memory database.
pub(crate) fn get_test_server() -> TestServer {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    let state = AppState::new(connection).expect("Could not create app state");

    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

#[track_caller]
pub(crate) fn assert_error_kind(response: &TestResponse, kind: ErrorKind) {
    response.assert_status(kind.status_code());

    let body = response.json::<ErrorResponse>();
    assert_eq!(
        body.error, kind,
        "want error kind {kind:?}, got {:?} with message {:?}",
        body.error, body.message
    );
}

pub(crate) async fn create_category_via_api(server: &TestServer, name: &str) -> Category {
    let response = server
        .post(endpoints::CATEGORIES)
        .json(&json!({ "navn": name }))
        .await;
    response.assert_status(StatusCode::CREATED);

    response.json::<Category>()
}

pub(crate) async fn create_item_via_api(
    server: &TestServer,
    name: &str,
    category_id: CategoryId,
) -> Item {
    let response = server
        .post(endpoints::ITEMS)
        .json(&json!({ "navn": name, "kategori_id": category_id }))
        .await;
    response.assert_status(StatusCode::CREATED);

    response.json::<Item>()
}

pub(crate) async fn add_to_list_via_api(server: &TestServer, item_id: ItemId) -> ListEntry {
    let response = server
        .post(endpoints::ADD_TO_LIST)
        .json(&json!({ "vare_id": item_id }))
        .await;
    response.assert_status(StatusCode::CREATED);

    response.json::<ListEntry>()
}
