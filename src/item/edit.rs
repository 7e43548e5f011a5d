//! Item update endpoint.

use axum::{Json, extract::State};

use crate::{
    Error,
    extract::{AppJson, AppPath},
    item::{Item, ItemId, ItemName, ItemState, ItemUpdate, domain::ItemUpdateData, update_item},
};

/// Handle a request to change an item's name, category or note.
pub async fn update_item_endpoint(
    AppPath(item_id): AppPath<ItemId>,
    State(state): State<ItemState>,
    AppJson(data): AppJson<ItemUpdateData>,
) -> Result<Json<Item>, Error> {
    let update = ItemUpdate {
        name: data.name.as_deref().map(ItemName::new).transpose()?,
        category_id: data.category_id,
        note: data.note,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_item(item_id, update, &connection).map(Json)
}
