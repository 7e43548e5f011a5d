//! Endpoint for reading the purchase history.

use axum::{Json, extract::State};

use crate::{
    Error,
    extract::AppQuery,
    shopping_list::{
        DEFAULT_HISTORY_LIMIT, HistoryRecord, MAX_HISTORY_LIMIT, ShoppingListState,
        domain::HistoryParams, get_purchase_history,
    },
};

/// Handle a request for the most recent purchases, newest first.
///
/// `?limit=n` picks how many records to return, between 1 and [MAX_HISTORY_LIMIT].
pub async fn get_history_endpoint(
    State(state): State<ShoppingListState>,
    AppQuery(params): AppQuery<HistoryParams>,
) -> Result<Json<Vec<HistoryRecord>>, Error> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(Error::InvalidHistoryLimit {
            got: limit,
            max: MAX_HISTORY_LIMIT,
        });
    }

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_purchase_history(limit, &connection).map(Json)
}
