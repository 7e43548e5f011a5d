//! Endpoints for removing entries from the shopping list.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    Error,
    extract::AppPath,
    shopping_list::{ListEntryId, ShoppingListState, clear_purchased, remove_list_entry},
};

/// Handle a request to remove a single entry, active or purchased.
pub async fn remove_list_entry_endpoint(
    AppPath(entry_id): AppPath<ListEntryId>,
    State(state): State<ShoppingListState>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = remove_list_entry(entry_id, &connection)?;

    Ok(Json(json!({
        "message": format!("\"{}\" was removed from the shopping list", entry.item_name)
    })))
}

/// Handle a request to remove every purchased entry.
///
/// Responds with the number of removed entries, which may be zero.
pub async fn clear_purchased_endpoint(
    State(state): State<ShoppingListState>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let removed = clear_purchased(&connection)?;

    Ok(Json(json!({ "antal_fjernet": removed })))
}
