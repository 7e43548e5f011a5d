//! Endpoint for putting an item on the shopping list.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    Error,
    extract::AppJson,
    shopping_list::{ListEntry, ShoppingListState, add_item_to_list, domain::AddToListData},
};

/// Handle a request to put a catalog item on the shopping list.
///
/// Responds with `201 Created` and the new entry, or `409 Conflict` if the
/// item is already on the list.
pub async fn add_to_list_endpoint(
    State(state): State<ShoppingListState>,
    AppJson(data): AppJson<AddToListData>,
) -> Result<(StatusCode, Json<ListEntry>), Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = add_item_to_list(data.item_id, data.note.as_deref(), &connection)?;

    Ok((StatusCode::CREATED, Json(entry)))
}
