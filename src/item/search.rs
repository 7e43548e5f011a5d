//! Item search and lookup endpoints.

use axum::{Json, extract::State};

use crate::{
    Error,
    category::CategoryId,
    extract::{AppPath, AppQuery},
    item::{
        Item, ItemId, ItemState, domain::ItemSearchParams, get_item, get_items_in_category,
        search_items,
    },
};

/// Search the catalog by name and category.
///
/// Each result says whether the item is on the shopping list, so clients can
/// hide items that are already on it.
pub async fn search_items_endpoint(
    State(state): State<ItemState>,
    AppQuery(params): AppQuery<ItemSearchParams>,
) -> Result<Json<Vec<Item>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    search_items(&params.q, &params.category_ids, &connection)
        .inspect_err(|error| tracing::error!("Failed to search items: {error}"))
        .map(Json)
}

/// Get a single item.
pub async fn get_item_endpoint(
    AppPath(item_id): AppPath<ItemId>,
    State(state): State<ItemState>,
) -> Result<Json<Item>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_item(item_id, &connection).map(Json)
}

/// Get the items in a category.
pub async fn get_items_in_category_endpoint(
    AppPath(category_id): AppPath<CategoryId>,
    State(state): State<ItemState>,
) -> Result<Json<Vec<Item>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_items_in_category(category_id, &connection).map(Json)
}
