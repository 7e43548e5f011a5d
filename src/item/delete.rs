//! Item deletion endpoint.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    Error,
    extract::AppPath,
    item::{ItemId, ItemState, delete_item},
};

/// Handle item deletion. Items referenced by the shopping list are not deleted.
pub async fn delete_item_endpoint(
    AppPath(item_id): AppPath<ItemId>,
    State(state): State<ItemState>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let item = delete_item(item_id, &connection)?;

    Ok(Json(json!({
        "message": format!("Item \"{}\" was deleted", item.name)
    })))
}
