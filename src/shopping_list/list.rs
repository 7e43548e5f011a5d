//! Endpoints for reading the shopping list.

use axum::{Json, extract::State};

use crate::{
    Error,
    extract::AppPath,
    shopping_list::{ListEntry, ListEntryId, ShoppingListState, get_list_entry, get_shopping_list},
};

/// Handle a request for the whole shopping list, oldest entry first.
pub async fn get_shopping_list_endpoint(
    State(state): State<ShoppingListState>,
) -> Result<Json<Vec<ListEntry>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_shopping_list(&connection).map(Json)
}

/// Handle a request for a single list entry.
pub async fn get_list_entry_endpoint(
    AppPath(entry_id): AppPath<ListEntryId>,
    State(state): State<ShoppingListState>,
) -> Result<Json<ListEntry>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_list_entry(entry_id, &connection).map(Json)
}
