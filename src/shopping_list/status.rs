//! Endpoints for moving list entries between active and purchased.

use axum::{Json, extract::State};

use crate::{
    Error,
    extract::AppPath,
    shopping_list::{ListEntry, ListEntryId, ShoppingListState, mark_purchased, reactivate},
};

/// Handle a request to mark an active entry as purchased.
pub async fn mark_purchased_endpoint(
    AppPath(entry_id): AppPath<ListEntryId>,
    State(state): State<ShoppingListState>,
) -> Result<Json<ListEntry>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    mark_purchased(entry_id, &connection).map(Json)
}

/// Handle a request to move a purchased entry back to active.
pub async fn reactivate_endpoint(
    AppPath(entry_id): AppPath<ListEntryId>,
    State(state): State<ShoppingListState>,
) -> Result<Json<ListEntry>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    reactivate(entry_id, &connection).map(Json)
}
