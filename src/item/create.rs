//! Item creation endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    Error,
    extract::AppJson,
    item::{Item, ItemName, ItemState, create_item, domain::NewItemData},
};

/// Handle a request to add an item to the catalog.
///
/// Responds with `201 Created` and the new item.
pub async fn create_item_endpoint(
    State(state): State<ItemState>,
    AppJson(data): AppJson<NewItemData>,
) -> Result<(StatusCode, Json<Item>), Error> {
    let name = ItemName::new(&data.name)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let item = create_item(
        Item::build(name, data.category_id).note(data.note.as_deref()),
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(item)))
}
