//! Endpoint for editing a list entry.

use axum::{Json, extract::State};

use crate::{
    Error,
    extract::{AppJson, AppPath},
    shopping_list::{
        ListEntry, ListEntryId, ListEntryUpdate, ShoppingListState, domain::ListEntryUpdateData,
        update_list_entry,
    },
};

/// Handle a request to change a list entry's note and/or status.
pub async fn update_list_entry_endpoint(
    AppPath(entry_id): AppPath<ListEntryId>,
    State(state): State<ShoppingListState>,
    AppJson(data): AppJson<ListEntryUpdateData>,
) -> Result<Json<ListEntry>, Error> {
    let update = ListEntryUpdate {
        note: data.note,
        status: data.status,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_list_entry(entry_id, update, &connection).map(Json)
}
